//! Installs a console appender behind the `log` facade

use anyhow::{Context, Result};
use log::LevelFilter;

use crate::appender::console::ConsoleAppender;

pub fn setup_logger(appender: ConsoleAppender, level: LevelFilter) -> Result<()> {
    let appender: Box<dyn log::Log> = Box::new(appender);

    fern::Dispatch::new()
        .level(level)
        .chain(appender)
        .apply()
        .context("a global logger is already installed")?;

    Ok(())
}
