use std::io;
use thiserror::Error;

/// Errors while loading an appender configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IOError: {:?}", .0)]
    IOError(#[from] io::Error),

    #[error("Invalid config: {}", .0)]
    InvalidConfig(#[from] serde_json::Error),
}
