//! 이름 있는 구조화 로거 레지스트리
//!
//! 접미사(suffix)로 구분되는 로거를 프로세스 전역 레지스트리에 등록하고 조회합니다.
//!
//! # 주요 기능
//! - **레벨 필터링**: debug / info / warn / error / panic / fatal
//! - **출력 형식**: JSON 또는 탭 구분 콘솔 형식
//! - **파일 순환**: 크기 기준 순환, 백업 개수/보관 기간 정리, gzip 압축
//! - **콘솔 동시 출력**: 파일과 표준 출력에 함께 기록
//! - **포맷 문자열 API**: `infof`, `infow` 등
//!
//! # 사용 예시
//! ```no_run
//! use logger::logging::{init_registry, Field};
//!
//! let registry = init_registry(None);
//! let config = registry.make_default_config("", "app.log", "api");
//! registry.make_logger(config);
//!
//! if let Some(log) = registry.get_logger("[api]") {
//!     log.info("서버 시작", &[Field::int("port", 8080)]);
//! }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod formatter;
pub mod global;
pub mod logger;
pub mod path;
pub mod registry;
pub mod rotation;
pub mod writer;

pub use builder::build_logger;
pub use config::{LevelEncoding, LogConfig, LogFormat};
pub use error::{LogError, LogResult};
pub use formatter::{parse_level, Field, LogEntry, LogFormatter, LogLevel};
pub use global::replace_globals;
pub use logger::{Logger, SugaredLogger};
pub use path::default_log_path;
pub use registry::{init_registry, registry, LoggerRegistry, PathResolver};
pub use rotation::{RotatingFileWriter, RotationPolicy};
pub use writer::{InMemoryLogWriter, MultiWriter};

/// 기본 설정으로 로거를 등록하고 포맷 문자열 버전을 반환
///
/// 전역 레지스트리가 없으면 기본 경로 해석기로 초기화합니다.
///
/// # Examples
/// ```no_run
/// use logger::logging::init_logging;
///
/// if let Some(log) = init_logging("", "worker.log", "worker") {
///     log.infof(format_args!("작업자 {} 시작", 3));
/// }
/// ```
pub fn init_logging(path: &str, file_name: &str, suffix: &str) -> Option<SugaredLogger> {
    let registry = init_registry(None);
    let config = registry.make_default_config(path, file_name, suffix);
    let key = config.suffix.clone();
    registry.make_logger(config);
    registry.get_sugared_logger(&key)
}
