//! 로거 에러 타입
//!
//! 내부 헬퍼(파일 순환, 설정 파싱)가 반환하는 에러를 정의합니다.
//! 레지스트리의 공개 연산은 실패를 호출자에게 전파하지 않고 기본값으로 대체합니다.

use thiserror::Error;

/// 로거 내부 에러
#[derive(Error, Debug)]
pub enum LogError {
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),

    #[error("설정 오류: {message}")]
    Config { message: String },

    #[error("파싱 오류: {message} (입력: {input})")]
    Parse { message: String, input: String },

    #[error("JSON 오류: {0}")]
    Json(#[from] serde_json::Error),
}

impl LogError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>, input: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            input: input.into(),
        }
    }
}

/// Result 타입 별칭
pub type LogResult<T> = Result<T, LogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LogError::config("file-path가 비어있음");
        assert_eq!(err.to_string(), "설정 오류: file-path가 비어있음");

        let err = LogError::parse("알 수 없는 레벨", "verbose");
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "없음");
        let err: LogError = io.into();
        assert!(matches!(err, LogError::Io(_)));
    }
}
