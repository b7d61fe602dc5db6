use std::path::PathBuf;

use clap::Parser;

/// Prints a message through the console appender
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliArgs {
    /// JSON appender config, defaults to the user config dir
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Pattern overriding the configured one
    #[arg(short, long)]
    pub format: Option<String>,

    /// Ignore LOG_MESSAGE_PATTERN
    #[arg(long)]
    pub ignore_env_pattern: bool,

    /// Drop records below this level
    #[arg(long, value_enum)]
    pub details_level: Option<CliLevel>,

    /// Level of the emitted message
    #[arg(short, long, value_enum, default_value = "info")]
    pub level: CliLevel,

    /// Category of the emitted message
    #[arg(short, long, default_value = "console-appender")]
    pub target: String,

    pub message: Vec<String>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum CliLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl From<CliLevel> for console_appender::LogLevel {
    fn from(level: CliLevel) -> Self {
        use console_appender::LogLevel;
        match level {
            CliLevel::Trace => LogLevel::Trace,
            CliLevel::Debug => LogLevel::Debug,
            CliLevel::Info => LogLevel::Info,
            CliLevel::Warning => LogLevel::Warning,
            CliLevel::Error => LogLevel::Error,
            CliLevel::Fatal => LogLevel::Fatal,
        }
    }
}
