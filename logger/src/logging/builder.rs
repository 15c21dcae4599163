//! 설정 기반 로거 생성
//!
//! 레벨 파싱 → 포매터 선택 → 출력 작성기 구성 → 순환 파일 래핑 순서로
//! 설정 하나에서 로거 하나를 만듭니다.

use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, warn};

use crate::logging::config::LogConfig;
use crate::logging::formatter::{parse_level, LevelRange, LogFormatter};
use crate::logging::global;
use crate::logging::logger::{Core, Logger, Tee};
use crate::logging::rotation::{ensure_log_file, RotatingFileWriter, RotationPolicy};
use crate::logging::writer::MultiWriter;

/// 설정으로 로거 생성
///
/// 파일 관련 실패는 전파하지 않습니다. 생성된 로거는 전역 로거로도 등록됩니다.
pub fn build_logger(config: &LogConfig) -> Logger {
    let sink = compose_sink(config);
    build_logger_with_writer(config, sink)
}

/// 지정한 출력 작성기로 로거 생성
pub fn build_logger_with_writer(config: &LogConfig, sink: Box<dyn Write + Send>) -> Logger {
    if let Err(e) = config.validate() {
        warn!(suffix = %config.suffix, error = %e, "로거 설정이 불완전함");
    }

    let min_level = parse_level(&config.level);
    // min_level 이상 Fatal 이하만 기록
    let filter = LevelRange::at_least(min_level);
    let formatter = LogFormatter::from_config(config);

    let cores = vec![Core::new(filter, formatter, sink)];
    // 호출 위치는 show_line과 무관하게 항상 수집, 출력 여부는 caller_key로 결정
    let logger = Logger::new(Tee::new(cores)).with_caller(true);

    global::replace_globals(logger.clone());

    debug!(
        suffix = %config.suffix,
        level = %min_level,
        format = ?config.log_format(),
        file_path = %config.file_path,
        log_in_console = config.log_in_console,
        "로거 생성됨"
    );

    logger
}

/// 순환 파일 작성기 구성, 필요하면 표준 출력과 묶음
pub fn compose_sink(config: &LogConfig) -> Box<dyn Write + Send> {
    ensure_log_file(Path::new(&config.file_path));

    let file = RotatingFileWriter::new(&config.file_path, RotationPolicy::from_config(config));

    if config.log_in_console {
        Box::new(MultiWriter::new(vec![Box::new(io::stdout()), Box::new(file)]))
    } else {
        Box::new(file)
    }
}
