pub mod config;
pub mod console;
pub mod error;
pub mod logger;
pub mod pattern;
pub mod presentation;
pub mod record;
pub mod render;
