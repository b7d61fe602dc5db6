//! Colorized, pattern-formatted console appender.
//!
//! Patterns mix literal text with `%{field[:[-]width][ argument]}`
//! placeholders, e.g. the default `[%{type:-7}] <%{function}> %{message}\n`.

pub mod appender;

pub use appender::config::AppenderConfig;
pub use appender::console::{ConsoleAppender, StreamSink, DEFAULT_FORMAT};
pub use appender::error::ConfigError;
pub use appender::logger::setup_logger;
pub use appender::pattern::FormatPattern;
pub use appender::presentation::{Environment, ProcessEnvironment, MESSAGE_PATTERN_ENV};
pub use appender::record::{LogLevel, LogRecord};
pub use appender::render::{ChronoTimestamp, TimestampFormatter};
