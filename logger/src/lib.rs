pub mod logging;

pub use logging::{
    init_logging, init_registry, Field, LogConfig, LogError, LogLevel, LogResult, Logger,
    LoggerRegistry, SugaredLogger,
};
