//! 로그 포매터
//!
//! 로그 레벨, 구조화 필드, 로그 항목 정의와 JSON/콘솔 인코딩을 담당합니다.

use chrono::{DateTime, Local};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::logging::config::{LevelEncoding, LogConfig, LogFormat};
use crate::logging::error::LogError;

/// 타임스탬프 형식 (밀리초까지)
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

const COLOR_RESET: &str = "\x1b[0m";

/// 로그 레벨 열거형
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// 디버깅 정보
    Debug = -1,
    /// 일반 정보
    Info = 0,
    /// 경고 상황
    Warn = 1,
    /// 오류 상황
    Error = 2,
    /// 기록 후 panic
    Panic = 4,
    /// 기록 후 프로세스 종료
    Fatal = 5,
}

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Panic,
        LogLevel::Fatal,
    ];

    pub fn as_lowercase(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Panic => "panic",
            LogLevel::Fatal => "fatal",
        }
    }

    pub fn as_capital(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Panic => "PANIC",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// ANSI 색상 코드 반환
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[35m", // 자홍색
            LogLevel::Info => "\x1b[34m",  // 파란색
            LogLevel::Warn => "\x1b[33m",  // 노란색
            LogLevel::Error | LogLevel::Panic | LogLevel::Fatal => "\x1b[31m", // 빨간색
        }
    }

    /// 인코딩 방식에 따라 레벨 문자열 생성
    pub fn encode(&self, encoding: LevelEncoding) -> String {
        match encoding {
            LevelEncoding::Lowercase => self.as_lowercase().to_string(),
            LevelEncoding::Capital => self.as_capital().to_string(),
            LevelEncoding::LowercaseColor => {
                format!("{}{}{}", self.color_code(), self.as_lowercase(), COLOR_RESET)
            }
            LevelEncoding::CapitalColor => {
                format!("{}{}{}", self.color_code(), self.as_capital(), COLOR_RESET)
            }
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_lowercase())
    }
}

/// 엄격한 파싱: 정확히 일치하는 소문자 이름만 허용
impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "panic" => Ok(LogLevel::Panic),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(LogError::parse("unknown log level", s)),
        }
    }
}

/// 설정 문자열을 로그 레벨로 변환
///
/// 알 수 없는 값이나 빈 문자열은 `Info`로 처리합니다.
pub fn parse_level(level: &str) -> LogLevel {
    level.parse().unwrap_or(LogLevel::Info)
}

/// 상한이 있는 레벨 필터: `min <= level <= max`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRange {
    pub min: LogLevel,
    pub max: LogLevel,
}

impl LevelRange {
    /// `min` 이상, 가장 높은 레벨(Fatal) 이하
    pub fn at_least(min: LogLevel) -> Self {
        Self {
            min,
            max: LogLevel::Fatal,
        }
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.min <= level && level <= self.max
    }
}

/// 구조화된 키/값 필드
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, value)
    }

    pub fn uint(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, value)
    }

    pub fn float(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, value)
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, value)
    }

    /// 경과 시간은 초 단위 숫자로 기록
    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, value.as_secs_f64())
    }

    pub fn error(key: impl Into<String>, err: &dyn std::error::Error) -> Self {
        Self::string(key, err.to_string())
    }

    /// 직렬화 가능한 임의 값. 직렬화 실패 시 에러 문자열을 기록
    pub fn any<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Self {
        let value = serde_json::to_value(value).unwrap_or_else(|e| Value::String(e.to_string()));
        Self::new(key, value)
    }
}

impl From<(&str, &str)> for Field {
    fn from((key, value): (&str, &str)) -> Self {
        Field::string(key, value)
    }
}

/// 구조화된 로그 항목
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub time: DateTime<Local>,
    pub level: LogLevel,
    /// 로거 이름 (named 로거에서만 설정)
    pub logger_name: Option<String>,
    pub message: String,
    pub fields: Vec<Field>,
    /// 호출 위치 (`file:line`)
    pub caller: Option<String>,
    pub stacktrace: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            time: Local::now(),
            level,
            logger_name: None,
            message: message.into(),
            fields: Vec::new(),
            caller: None,
            stacktrace: None,
        }
    }

    pub fn with_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn with_caller<S: Into<String>>(mut self, caller: S) -> Self {
        self.caller = Some(caller.into());
        self
    }
}

/// 출력 키 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderKeys {
    pub message: String,
    pub level: String,
    pub time: String,
    pub name: String,
    /// 빈 문자열이면 호출 위치 출력 안 함
    pub caller: String,
    /// 빈 문자열이면 스택트레이스 출력 안 함
    pub stacktrace: String,
}

impl Default for EncoderKeys {
    fn default() -> Self {
        Self {
            message: "message".to_string(),
            level: "level".to_string(),
            time: "time".to_string(),
            name: "logger".to_string(),
            caller: String::new(),
            stacktrace: String::new(),
        }
    }
}

/// 로그 포매터
///
/// 타임스탬프 접미사는 포매터마다 따로 보관하므로 다른 로거의 생성이
/// 이미 만들어진 로거의 출력에 영향을 주지 않습니다.
#[derive(Debug, Clone)]
pub struct LogFormatter {
    format: LogFormat,
    level_encoding: LevelEncoding,
    keys: EncoderKeys,
    time_suffix: String,
}

impl LogFormatter {
    pub fn new(
        format: LogFormat,
        level_encoding: LevelEncoding,
        keys: EncoderKeys,
        time_suffix: impl Into<String>,
    ) -> Self {
        Self {
            format,
            level_encoding,
            keys,
            time_suffix: time_suffix.into(),
        }
    }

    pub fn from_config(config: &LogConfig) -> Self {
        let keys = EncoderKeys {
            caller: config.caller_key.clone(),
            stacktrace: config.stacktrace_key.clone(),
            ..Default::default()
        };
        Self::new(
            config.log_format(),
            config.level_encoding(),
            keys,
            config.suffix.clone(),
        )
    }

    pub fn keys(&self) -> &EncoderKeys {
        &self.keys
    }

    pub fn time_suffix(&self) -> &str {
        &self.time_suffix
    }

    /// 타임스탬프 + 접미사
    pub fn format_time(&self, time: &DateTime<Local>) -> String {
        let mut rendered = time.format(TIME_FORMAT).to_string();
        rendered.push_str(&self.time_suffix);
        rendered
    }

    /// 로그 항목을 한 줄(개행 포함)로 포매팅
    pub fn format(&self, entry: &LogEntry) -> String {
        let mut line = match self.format {
            LogFormat::Json => self.format_json(entry),
            LogFormat::Console => self.format_console(entry),
        };
        line.push('\n');
        line
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        let record = JsonRecord {
            formatter: self,
            entry,
        };
        serde_json::to_string(&record).unwrap_or_else(|e| {
            warn!(error = %e, "로그 항목 JSON 직렬화 실패");
            serde_json::json!({
                "level": entry.level.as_lowercase(),
                "message": entry.message,
                "encode_error": e.to_string(),
            })
            .to_string()
        })
    }

    fn format_console(&self, entry: &LogEntry) -> String {
        let mut parts = vec![
            self.format_time(&entry.time),
            entry.level.encode(self.level_encoding),
        ];
        if let Some(name) = &entry.logger_name {
            parts.push(name.clone());
        }
        if let Some(caller) = &entry.caller {
            if !self.keys.caller.is_empty() {
                parts.push(caller.clone());
            }
        }
        parts.push(entry.message.clone());

        if !entry.fields.is_empty() {
            let context = entry
                .fields
                .iter()
                .map(|f| format!("{}:{}", Value::String(f.key.clone()), f.value))
                .collect::<Vec<_>>()
                .join(",");
            parts.push(format!("{{{}}}", context));
        }

        let mut formatted = parts.join("\t");

        if let Some(stack) = &entry.stacktrace {
            if !self.keys.stacktrace.is_empty() {
                formatted.push('\n');
                formatted.push_str(stack);
            }
        }

        formatted
    }
}

/// JSON 출력용 로그 항목 뷰
///
/// 키 순서: level, time, logger, caller, message, 필드, stacktrace.
/// 키가 빈 문자열인 항목은 출력하지 않습니다.
struct JsonRecord<'a> {
    formatter: &'a LogFormatter,
    entry: &'a LogEntry,
}

impl Serialize for JsonRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let keys = &self.formatter.keys;
        let entry = self.entry;
        let mut map = serializer.serialize_map(None)?;

        put(&mut map, &keys.level, &entry.level.encode(self.formatter.level_encoding))?;
        put(&mut map, &keys.time, &self.formatter.format_time(&entry.time))?;
        if let Some(name) = &entry.logger_name {
            put(&mut map, &keys.name, name)?;
        }
        if let Some(caller) = &entry.caller {
            put(&mut map, &keys.caller, caller)?;
        }
        put(&mut map, &keys.message, &entry.message)?;
        for field in &entry.fields {
            put(&mut map, &field.key, &field.value)?;
        }
        if let Some(stack) = &entry.stacktrace {
            put(&mut map, &keys.stacktrace, stack)?;
        }

        map.end()
    }
}

fn put<M, V>(map: &mut M, key: &str, value: &V) -> Result<(), M::Error>
where
    M: SerializeMap,
    V: Serialize + ?Sized,
{
    if key.is_empty() {
        return Ok(());
    }
    map.serialize_entry(key, value)
}
