use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Severity of a log record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl LogLevel {
    pub fn name(self) -> &'static str {
        match self {
            LogLevel::Trace => "Trace",
            LogLevel::Debug => "Debug",
            LogLevel::Info => "Info",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
            LogLevel::Fatal => "Fatal",
        }
    }

    pub fn letter(self) -> char {
        match self {
            LogLevel::Trace => 't',
            LogLevel::Debug => 'd',
            LogLevel::Info => 'i',
            LogLevel::Warning => 'w',
            LogLevel::Error => 'e',
            LogLevel::Fatal => 'f',
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warning,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Trace => LogLevel::Trace,
        }
    }
}

/// One log record as handed to an appender.
///
/// Fields borrow from the call site; an appender consumes the record once
/// and never keeps it.
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub file: &'a str,
    pub line: u32,
    pub function: &'a str,
    pub category: &'a str,
    pub message: &'a str,
}

impl<'a> LogRecord<'a> {
    /// Record stamped with the current local time and empty source location.
    pub fn new(level: LogLevel, message: &'a str) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            file: "",
            line: 0,
            function: "",
            category: "",
            message,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_location(mut self, file: &'a str, line: u32) -> Self {
        self.file = file;
        self.line = line;
        self
    }

    pub fn with_function(mut self, function: &'a str) -> Self {
        self.function = function;
        self
    }

    pub fn with_category(mut self, category: &'a str) -> Self {
        self.category = category;
        self
    }
}
