//! 전역 로거
//!
//! 가장 최근에 생성된 로거가 프로세스 전역 로거가 됩니다. 초기값은 아무것도
//! 기록하지 않는 로거입니다.

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::logging::logger::{Logger, SugaredLogger};

static GLOBAL_LOGGER: Lazy<RwLock<Logger>> = Lazy::new(|| RwLock::new(Logger::nop()));

/// 전역 로거 교체. 이전 전역 로거를 반환
pub fn replace_globals(logger: Logger) -> Logger {
    std::mem::replace(&mut *GLOBAL_LOGGER.write(), logger)
}

/// 현재 전역 로거
pub fn logger() -> Logger {
    GLOBAL_LOGGER.read().clone()
}

/// 현재 전역 로거의 포맷 문자열 버전
pub fn sugared() -> SugaredLogger {
    GLOBAL_LOGGER.read().sugar()
}
