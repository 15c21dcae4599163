//! 로거 핸들
//!
//! 레벨 필터, 포매터, 출력 작성기를 묶은 코어와, 코어 묶음(Tee)을 공유하는
//! 일반 로거(`Logger`) / 포맷 문자열 로거(`SugaredLogger`)를 제공합니다.

use parking_lot::Mutex;
use serde_json::Value;
use std::backtrace::Backtrace;
use std::fmt;
use std::io::{self, Write};
use std::panic::Location;
use std::sync::Arc;
use tracing::warn;

use crate::logging::formatter::{Field, LevelRange, LogEntry, LogFormatter, LogLevel};

/// 레벨 필터 + 포매터 + 출력 작성기
pub struct Core {
    filter: LevelRange,
    formatter: LogFormatter,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Core {
    pub fn new(filter: LevelRange, formatter: LogFormatter, sink: Box<dyn Write + Send>) -> Self {
        Self {
            filter,
            formatter,
            sink: Mutex::new(sink),
        }
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.filter.enabled(level)
    }

    pub fn formatter(&self) -> &LogFormatter {
        &self.formatter
    }

    fn write(&self, entry: &LogEntry) -> io::Result<()> {
        let line = self.formatter.format(entry);
        self.sink.lock().write_all(line.as_bytes())
    }

    fn sync(&self) -> io::Result<()> {
        self.sink.lock().flush()
    }
}

impl fmt::Debug for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Core")
            .field("filter", &self.filter)
            .field("formatter", &self.formatter)
            .finish()
    }
}

/// 여러 코어로 같은 항목을 보내는 묶음
#[derive(Debug, Default)]
pub struct Tee {
    cores: Vec<Core>,
}

impl Tee {
    pub fn new(cores: Vec<Core>) -> Self {
        Self { cores }
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.cores.iter().any(|core| core.enabled(level))
    }

    pub fn cores(&self) -> &[Core] {
        &self.cores
    }

    fn write(&self, entry: &LogEntry) {
        for core in self.cores.iter().filter(|core| core.enabled(entry.level)) {
            if let Err(e) = core.write(entry) {
                warn!(error = %e, level = %entry.level, "로그 항목 작성 실패");
            }
        }
    }

    fn sync(&self) -> io::Result<()> {
        let mut first_error = None;
        for core in &self.cores {
            if let Err(e) = core.sync() {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// 구조화 필드만 받는 로거
///
/// 복제본은 같은 코어(필터, 포매터, 출력)를 공유합니다.
#[derive(Clone)]
pub struct Logger {
    core: Arc<Tee>,
    name: Option<String>,
    fields: Vec<Field>,
    add_caller: bool,
    stacktrace_level: Option<LogLevel>,
}

impl Logger {
    pub fn new(core: Tee) -> Self {
        Self {
            core: Arc::new(core),
            name: None,
            fields: Vec::new(),
            add_caller: false,
            stacktrace_level: None,
        }
    }

    /// 아무것도 기록하지 않는 로거
    pub fn nop() -> Self {
        Self::new(Tee::default())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn core(&self) -> &Tee {
        &self.core
    }

    /// 두 핸들이 같은 코어를 공유하는지 여부
    pub fn shares_core_with(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.core.enabled(level)
    }

    /// 호출 위치 기록 여부 설정
    pub fn with_caller(mut self, enabled: bool) -> Self {
        self.add_caller = enabled;
        self
    }

    /// 지정 레벨 이상에서 스택트레이스 기록
    pub fn with_stacktrace(mut self, level: LogLevel) -> Self {
        self.stacktrace_level = Some(level);
        self
    }

    /// 필드가 미리 붙은 하위 로거
    pub fn with(&self, fields: &[Field]) -> Logger {
        let mut child = self.clone();
        child.fields.extend_from_slice(fields);
        child
    }

    /// 이름이 붙은 하위 로거. 이미 이름이 있으면 `.`으로 연결
    pub fn named(&self, name: &str) -> Logger {
        let mut child = self.clone();
        child.name = match (&self.name, name.is_empty()) {
            (_, true) => self.name.clone(),
            (Some(parent), false) => Some(format!("{}.{}", parent, name)),
            (None, false) => Some(name.to_string()),
        };
        child
    }

    pub fn sugar(&self) -> SugaredLogger {
        SugaredLogger { base: self.clone() }
    }

    /// 모든 출력 버퍼 비우기
    pub fn sync(&self) -> io::Result<()> {
        self.core.sync()
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: &str, fields: &[Field]) {
        if !self.enabled(level) {
            return;
        }
        self.write_entry(level, message, fields, Location::caller());
    }

    #[track_caller]
    pub fn debug(&self, message: &str, fields: &[Field]) {
        self.log(LogLevel::Debug, message, fields);
    }

    #[track_caller]
    pub fn info(&self, message: &str, fields: &[Field]) {
        self.log(LogLevel::Info, message, fields);
    }

    #[track_caller]
    pub fn warn(&self, message: &str, fields: &[Field]) {
        self.log(LogLevel::Warn, message, fields);
    }

    #[track_caller]
    pub fn error(&self, message: &str, fields: &[Field]) {
        self.log(LogLevel::Error, message, fields);
    }

    /// 기록 후 panic (레벨 필터와 무관하게 panic)
    #[track_caller]
    pub fn panic(&self, message: &str, fields: &[Field]) -> ! {
        self.log(LogLevel::Panic, message, fields);
        panic!("{}", message);
    }

    /// 기록 후 프로세스 종료 (종료 코드 1)
    #[track_caller]
    pub fn fatal(&self, message: &str, fields: &[Field]) -> ! {
        self.log(LogLevel::Fatal, message, fields);
        let _ = self.sync();
        std::process::exit(1);
    }

    fn write_entry(
        &self,
        level: LogLevel,
        message: &str,
        fields: &[Field],
        location: &'static Location<'static>,
    ) {
        let mut entry = LogEntry::new(level, message)
            .with_fields(self.fields.iter().cloned())
            .with_fields(fields.iter().cloned());
        entry.logger_name = self.name.clone();

        if self.add_caller {
            entry.caller = Some(format!("{}:{}", location.file(), location.line()));
        }

        if matches!(self.stacktrace_level, Some(min) if level >= min) {
            entry.stacktrace = Some(Backtrace::force_capture().to_string());
        }

        self.core.write(&entry);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("add_caller", &self.add_caller)
            .field("stacktrace_level", &self.stacktrace_level)
            .field("cores", &self.core.cores.len())
            .finish()
    }
}

/// 포맷 문자열과 느슨한 키/값 쌍을 받는 로거
///
/// - `info(msg)`: Display 값 그대로 기록
/// - `infof(format_args!(..))`: 포맷 문자열
/// - `infow(msg, [(key, value), ..])`: 메시지 + 키/값 쌍
#[derive(Clone, Debug)]
pub struct SugaredLogger {
    base: Logger,
}

macro_rules! sugared_level {
    ($level:expr, $plain:ident, $formatted:ident, $with_pairs:ident) => {
        #[track_caller]
        pub fn $plain(&self, message: impl fmt::Display) {
            if self.base.enabled($level) {
                self.base.log($level, &message.to_string(), &[]);
            }
        }

        #[track_caller]
        pub fn $formatted(&self, args: fmt::Arguments<'_>) {
            if self.base.enabled($level) {
                self.base.log($level, &fmt::format(args), &[]);
            }
        }

        #[track_caller]
        pub fn $with_pairs<K, V>(&self, message: &str, pairs: impl IntoIterator<Item = (K, V)>)
        where
            K: Into<String>,
            V: Into<Value>,
        {
            if self.base.enabled($level) {
                let fields = to_fields(pairs);
                self.base.log($level, message, &fields);
            }
        }
    };
}

impl SugaredLogger {
    sugared_level!(LogLevel::Debug, debug, debugf, debugw);
    sugared_level!(LogLevel::Info, info, infof, infow);
    sugared_level!(LogLevel::Warn, warn, warnf, warnw);
    sugared_level!(LogLevel::Error, error, errorf, errorw);

    #[track_caller]
    pub fn panic(&self, message: impl fmt::Display) -> ! {
        self.base.panic(&message.to_string(), &[])
    }

    #[track_caller]
    pub fn panicf(&self, args: fmt::Arguments<'_>) -> ! {
        self.base.panic(&fmt::format(args), &[])
    }

    #[track_caller]
    pub fn panicw<K, V>(&self, message: &str, pairs: impl IntoIterator<Item = (K, V)>) -> !
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.base.panic(message, &to_fields(pairs))
    }

    #[track_caller]
    pub fn fatal(&self, message: impl fmt::Display) -> ! {
        self.base.fatal(&message.to_string(), &[])
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.base.fatal(&fmt::format(args), &[])
    }

    #[track_caller]
    pub fn fatalw<K, V>(&self, message: &str, pairs: impl IntoIterator<Item = (K, V)>) -> !
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.base.fatal(message, &to_fields(pairs))
    }

    pub fn with<K, V>(&self, pairs: impl IntoIterator<Item = (K, V)>) -> SugaredLogger
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.base.with(&to_fields(pairs)).sugar()
    }

    pub fn named(&self, name: &str) -> SugaredLogger {
        self.base.named(name).sugar()
    }

    pub fn sync(&self) -> io::Result<()> {
        self.base.sync()
    }

    /// 일반 로거로 되돌리기
    pub fn desugar(&self) -> Logger {
        self.base.clone()
    }
}

fn to_fields<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Vec<Field>
where
    K: Into<String>,
    V: Into<Value>,
{
    pairs.into_iter().map(|(k, v)| Field::new(k, v)).collect()
}
