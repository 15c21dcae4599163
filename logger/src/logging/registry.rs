//! 이름 있는 로거 레지스트리
//!
//! 접미사(suffix)를 키로 로거를 저장하고 조회합니다. 프로세스 전역 레지스트리는
//! 최초 호출 시 한 번만 생성되며, 이후 호출은 인자를 무시하고 같은 인스턴스를 반환합니다.

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::logging::builder::build_logger;
use crate::logging::config::LogConfig;
use crate::logging::logger::{Logger, SugaredLogger};
use crate::logging::path::default_log_path;

/// 경로 해석 함수: `(path, file_name) -> 로그 파일 경로`
pub type PathResolver = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

static REGISTRY: OnceCell<LoggerRegistry> = OnceCell::new();

/// 전역 레지스트리 초기화 (한 번만 실행)
///
/// `resolver`가 `None`이면 [`default_log_path`]를 사용합니다.
pub fn init_registry(resolver: Option<PathResolver>) -> &'static LoggerRegistry {
    REGISTRY.get_or_init(|| {
        debug!(custom_resolver = resolver.is_some(), "로거 레지스트리 초기화");
        LoggerRegistry::new(resolver)
    })
}

/// 초기화된 전역 레지스트리 (초기화 전에는 None)
pub fn registry() -> Option<&'static LoggerRegistry> {
    REGISTRY.get()
}

/// 접미사 → 로거 저장소
pub struct LoggerRegistry {
    loggers: DashMap<String, Logger>,
    path_resolver: PathResolver,
}

impl LoggerRegistry {
    /// 전역 인스턴스와 별개인 레지스트리 생성
    pub fn new(resolver: Option<PathResolver>) -> Self {
        Self {
            loggers: DashMap::new(),
            path_resolver: resolver.unwrap_or_else(|| Arc::new(default_log_path)),
        }
    }

    /// 설정으로 로거를 만들어 `config.suffix` 키로 저장 (기존 항목은 교체)
    pub fn make_logger(&self, config: LogConfig) {
        let logger = build_logger(&config);
        if self.loggers.insert(config.suffix.clone(), logger).is_some() {
            debug!(suffix = %config.suffix, "기존 로거 교체됨");
        }
    }

    pub fn get_logger(&self, suffix: &str) -> Option<Logger> {
        self.loggers.get(suffix).map(|entry| entry.value().clone())
    }

    pub fn get_sugared_logger(&self, suffix: &str) -> Option<SugaredLogger> {
        self.get_logger(suffix).map(|logger| logger.sugar())
    }

    /// 기본 설정 생성. 접미사는 `[suffix]` 형태로 감쌈
    pub fn make_default_config(&self, path: &str, file_name: &str, suffix: &str) -> LogConfig {
        LogConfig {
            level: "info".to_string(),
            format: "console".to_string(),
            suffix: format!("[{}]", suffix),
            show_line: false,
            // 파일에서는 색상 코드가 깨지므로 색상 없는 대문자
            encode_level: "CapitalLevelEncoder".to_string(),
            stacktrace_key: "stacktrace".to_string(),
            log_in_console: true,
            file_path: (self.path_resolver)(path, file_name),
            max_size: 10,
            max_backups: 200,
            max_age: 30,
            compress: false,
            caller_key: String::new(),
        }
    }

    pub fn contains(&self, suffix: &str) -> bool {
        self.loggers.contains_key(suffix)
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }

    /// 등록된 접미사 목록 (정렬됨)
    pub fn suffixes(&self) -> Vec<String> {
        let mut suffixes: Vec<String> = self.loggers.iter().map(|e| e.key().clone()).collect();
        suffixes.sort();
        suffixes
    }
}

impl fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("suffixes", &self.suffixes())
            .finish()
    }
}
