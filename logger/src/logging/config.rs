//! 로거 설정 관리
//!
//! 이름 있는 로거 하나의 동작(레벨, 출력 형식, 파일 순환, 콘솔 출력)을 기술하는
//! 설정 값과, 설정 문자열에서 파생되는 출력 형식/레벨 인코딩 열거형을 담당합니다.

use serde::{Deserialize, Serialize};

use crate::logging::error::{LogError, LogResult};

/// 로그 출력 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 한 줄에 하나의 JSON 객체
    Json,
    /// 사람이 읽기 쉬운 탭 구분 형식
    Console,
}

impl LogFormat {
    /// 설정 문자열을 출력 형식으로 변환 (`"json"` 외에는 모두 Console)
    pub fn parse(format: &str) -> Self {
        if format == "json" {
            LogFormat::Json
        } else {
            LogFormat::Console
        }
    }
}

/// 레벨 문자열 인코딩 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEncoding {
    /// 소문자 (기본값)
    Lowercase,
    /// 소문자 + ANSI 색상
    LowercaseColor,
    /// 대문자
    Capital,
    /// 대문자 + ANSI 색상
    CapitalColor,
}

impl LevelEncoding {
    /// 설정 문자열을 인코딩 방식으로 변환. 알 수 없는 값은 Lowercase
    pub fn parse(name: &str) -> Self {
        match name {
            "LowercaseLevelEncoder" => LevelEncoding::Lowercase,
            "LowercaseColorLevelEncoder" => LevelEncoding::LowercaseColor,
            "CapitalLevelEncoder" => LevelEncoding::Capital,
            "CapitalColorLevelEncoder" => LevelEncoding::CapitalColor,
            _ => LevelEncoding::Lowercase,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelEncoding::Lowercase => "LowercaseLevelEncoder",
            LevelEncoding::LowercaseColor => "LowercaseColorLevelEncoder",
            LevelEncoding::Capital => "CapitalLevelEncoder",
            LevelEncoding::CapitalColor => "CapitalColorLevelEncoder",
        }
    }
}

/// 로거 설정
///
/// `suffix`는 레지스트리 키이면서 해당 로거의 타임스탬프 뒤에 그대로 붙는 문자열입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LogConfig {
    /// 최소 로그 레벨 (debug, info, warn, error, panic, fatal)
    pub level: String,

    /// 출력 형식 (json, console)
    pub format: String,

    /// 로그 접미사 / 레지스트리 키
    pub suffix: String,

    /// 호출 위치 표시
    pub show_line: bool,

    /// 레벨 인코딩 방식
    pub encode_level: String,

    /// 스택트레이스 키 (빈 문자열이면 출력 안 함)
    pub stacktrace_key: String,

    /// 콘솔 동시 출력
    pub log_in_console: bool,

    /// 로그 파일 경로
    pub file_path: String,

    /// 순환 전 최대 파일 크기 (MB)
    #[serde(alias = "MaxSize")]
    pub max_size: u64,

    /// 보관할 이전 파일 최대 개수
    #[serde(alias = "MaxBackups")]
    pub max_backups: u32,

    /// 이전 파일 최대 보관 일수
    #[serde(alias = "MaxAge")]
    pub max_age: u32,

    /// 이전 파일 gzip 압축 여부
    #[serde(alias = "Compress")]
    pub compress: bool,

    /// 호출 위치 키 (설정해야 파일명과 행 번호가 출력됨)
    #[serde(alias = "CallerKey")]
    pub caller_key: String,
}

impl LogConfig {
    /// JSON 문자열에서 설정 로드
    pub fn from_json(json: &str) -> LogResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 환경변수로 설정 덮어쓰기
    ///
    /// 파싱할 수 없는 값은 무시합니다.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("LOG_LEVEL") {
            self.level = val;
        }

        if let Ok(val) = std::env::var("LOG_FORMAT") {
            self.format = val;
        }

        if let Ok(val) = std::env::var("LOG_ENCODE_LEVEL") {
            self.encode_level = val;
        }

        if let Ok(val) = std::env::var("LOG_IN_CONSOLE") {
            self.log_in_console = val.to_lowercase() == "true";
        }

        if let Ok(val) = std::env::var("LOG_MAX_SIZE") {
            if let Ok(size) = val.parse() {
                self.max_size = size;
            }
        }

        if let Ok(val) = std::env::var("LOG_MAX_BACKUPS") {
            if let Ok(count) = val.parse() {
                self.max_backups = count;
            }
        }

        if let Ok(val) = std::env::var("LOG_MAX_AGE") {
            if let Ok(days) = val.parse() {
                self.max_age = days;
            }
        }

        if let Ok(val) = std::env::var("LOG_COMPRESS") {
            self.compress = val.to_lowercase() == "true";
        }

        self
    }

    /// 설정 유효성 검증
    ///
    /// 로거 생성은 검증 결과와 무관하게 진행되며, 실패는 경고로만 기록됩니다.
    pub fn validate(&self) -> LogResult<()> {
        if self.suffix.is_empty() {
            return Err(LogError::config("suffix must not be empty"));
        }

        if self.file_path.is_empty() {
            return Err(LogError::config("file-path must not be empty"));
        }

        Ok(())
    }

    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.format)
    }

    pub fn level_encoding(&self) -> LevelEncoding {
        LevelEncoding::parse(&self.encode_level)
    }
}
