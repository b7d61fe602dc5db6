//!
//! # Presentation policy
//! Picks the terminal color for a level and the pattern an appender
//! should render with.
//!

use std::sync::Arc;

use crossterm::style::Color;
use parking_lot::RwLock;

use crate::appender::pattern::FormatPattern;
use crate::appender::record::LogLevel;

/// Environment variable that overrides the configured pattern.
pub const MESSAGE_PATTERN_ENV: &str = "LOG_MESSAGE_PATTERN";

/// Foreground color for `level`. crossterm writes these as 256-color
/// palette indices 0-7 (`ESC[38;5;Nm`), not basic SGR 30-37 codes.
pub fn style_for(level: LogLevel) -> Color {
    match level {
        LogLevel::Trace => Color::DarkMagenta,
        LogLevel::Debug => Color::DarkGreen,
        // 256-color palette index 7 (white), not the basic SGR 37 code
        LogLevel::Info => Color::Grey,
        LogLevel::Warning => Color::DarkYellow,
        LogLevel::Error => Color::DarkRed,
        LogLevel::Fatal => Color::DarkRed,
    }
}

/// Source of process-wide settings such as [`MESSAGE_PATTERN_ENV`].
pub trait Environment: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }
}

impl<F> Environment for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn var(&self, key: &str) -> Option<String> {
        self(key)
    }
}

pub struct PresentationPolicy {
    environment: Box<dyn Environment>,
    // last compiled override, recompiled when the variable changes
    env_pattern: RwLock<Option<Arc<FormatPattern>>>,
}

impl PresentationPolicy {
    pub fn new(environment: impl Environment + 'static) -> Self {
        Self {
            environment: Box::new(environment),
            env_pattern: RwLock::new(None),
        }
    }

    /// The override pattern, if the environment currently sets a non-empty one.
    ///
    /// The variable is read on every call. Its value gets a trailing newline.
    pub fn environment_pattern(&self) -> Option<Arc<FormatPattern>> {
        let mut source = self
            .environment
            .var(MESSAGE_PATTERN_ENV)
            .filter(|value| !value.is_empty())?;
        source.push('\n');

        if let Some(cached) = self.env_pattern.read().as_ref() {
            if cached.source() == source {
                return Some(cached.clone());
            }
        }

        let compiled = Arc::new(FormatPattern::compile(&source));
        *self.env_pattern.write() = Some(compiled.clone());
        Some(compiled)
    }

    pub fn effective_pattern(
        &self,
        configured: &Arc<FormatPattern>,
        ignore_environment: bool,
    ) -> Arc<FormatPattern> {
        if ignore_environment {
            return configured.clone();
        }

        self.environment_pattern()
            .unwrap_or_else(|| configured.clone())
    }
}

impl Default for PresentationPolicy {
    fn default() -> Self {
        Self::new(ProcessEnvironment)
    }
}
