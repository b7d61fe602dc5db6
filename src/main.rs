use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use console_appender::{setup_logger, AppenderConfig, ConsoleAppender, LogLevel, LogRecord};

use crate::cli::CliArgs;

mod cli;

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let mut config = match args.config.as_deref() {
        Some(path) => AppenderConfig::load_from_file(path)
            .with_context(|| format!("Load config failed: {}", path.display()))?,
        None => match AppenderConfig::default_path() {
            Some(path) => AppenderConfig::load_or_default(&path)
                .with_context(|| format!("Load config failed: {}", path.display()))?,
            None => AppenderConfig::default(),
        },
    };

    if let Some(format) = args.format {
        config.format = format;
    }
    if args.ignore_env_pattern {
        config.ignore_environment_pattern = true;
    }
    if let Some(level) = args.details_level {
        config.details_level = level.into();
    }

    let message = args.message.join(" ");
    let target = args.target.as_str();
    let level = LogLevel::from(args.level);
    let appender = ConsoleAppender::new();
    appender.apply_config(&config);

    // the log facade has no fatal level
    if level == LogLevel::Fatal {
        let record = LogRecord::new(level, &message)
            .with_location(file!(), line!())
            .with_function(module_path!())
            .with_category(target);
        appender.append(&record);
        return Ok(());
    }

    setup_logger(appender, LevelFilter::Trace)?;
    match level {
        LogLevel::Trace => log::trace!(target: target, "{message}"),
        LogLevel::Debug => log::debug!(target: target, "{message}"),
        LogLevel::Info => log::info!(target: target, "{message}"),
        LogLevel::Warning => log::warn!(target: target, "{message}"),
        LogLevel::Error | LogLevel::Fatal => log::error!(target: target, "{message}"),
    }

    Ok(())
}
