//!
//! # Console appender
//! Writes colorized, pattern-formatted records to standard error.
//!

use std::io::{self, Stderr, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crossterm::queue;
use crossterm::style::{Print, ResetColor, SetForegroundColor};
use parking_lot::{Mutex, MutexGuard, RwLock};

use crate::appender::config::AppenderConfig;
use crate::appender::pattern::FormatPattern;
use crate::appender::presentation::{style_for, Environment, PresentationPolicy};
use crate::appender::record::{LogLevel, LogRecord};
use crate::appender::render::{logging_start, ChronoTimestamp, TimestampFormatter};

pub const DEFAULT_FORMAT: &str = "[%{type:-7}] <%{function}> %{message}\n";

/// A destination stream shared by every appender writing to it.
///
/// The lock is held for a whole color + text + reset sequence.
pub struct StreamSink<W> {
    stream: Mutex<W>,
}

impl<W: Write> StreamSink<W> {
    pub fn new(stream: W) -> Self {
        Self { stream: Mutex::new(stream) }
    }

    pub fn lock(&self) -> MutexGuard<'_, W> {
        self.stream.lock()
    }
}

/// The process-wide standard error sink.
pub fn stderr_sink() -> Arc<StreamSink<Stderr>> {
    static STDERR: OnceLock<Arc<StreamSink<Stderr>>> = OnceLock::new();
    STDERR.get_or_init(|| Arc::new(StreamSink::new(io::stderr()))).clone()
}

pub struct ConsoleAppender<W = Stderr> {
    format: RwLock<Arc<FormatPattern>>,
    ignore_env_pattern: AtomicBool,
    details_level: RwLock<LogLevel>,
    policy: PresentationPolicy,
    timestamps: Box<dyn TimestampFormatter>,
    sink: Arc<StreamSink<W>>,
}

impl ConsoleAppender<Stderr> {
    pub fn new() -> Self {
        Self::with_sink(stderr_sink())
    }
}

impl Default for ConsoleAppender<Stderr> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> ConsoleAppender<W> {
    pub fn with_sink(sink: Arc<StreamSink<W>>) -> Self {
        logging_start();
        Self {
            format: RwLock::new(Arc::new(FormatPattern::compile(DEFAULT_FORMAT))),
            ignore_env_pattern: AtomicBool::new(false),
            details_level: RwLock::new(LogLevel::Trace),
            policy: PresentationPolicy::default(),
            timestamps: Box::new(ChronoTimestamp),
            sink,
        }
    }

    /// Replaces the source of the pattern override, the process environment by default.
    pub fn with_environment(mut self, environment: impl Environment + 'static) -> Self {
        self.policy = PresentationPolicy::new(environment);
        self
    }

    pub fn with_timestamp_formatter(mut self, timestamps: impl TimestampFormatter + 'static) -> Self {
        self.timestamps = Box::new(timestamps);
        self
    }

    pub fn set_format(&self, format: &str) {
        *self.format.write() = Arc::new(FormatPattern::compile(format));
    }

    /// The configured pattern source, ignoring any environment override.
    pub fn format(&self) -> String {
        self.format.read().source().to_string()
    }

    /// When set, the environment override is never consulted.
    pub fn ignore_environment_pattern(&self, ignore: bool) {
        self.ignore_env_pattern.store(ignore, Ordering::Relaxed);
    }

    pub fn set_details_level(&self, level: LogLevel) {
        *self.details_level.write() = level;
    }

    pub fn details_level(&self) -> LogLevel {
        *self.details_level.read()
    }

    pub fn apply_config(&self, config: &AppenderConfig) {
        self.set_format(&config.format);
        self.ignore_environment_pattern(config.ignore_environment_pattern);
        self.set_details_level(config.details_level);
    }

    /// Pattern used for the next record, taking the environment override into account.
    pub fn effective_pattern(&self) -> Arc<FormatPattern> {
        let configured = self.format.read().clone();
        self.policy
            .effective_pattern(&configured, self.ignore_env_pattern.load(Ordering::Relaxed))
    }

    /// Renders `record` without color codes.
    pub fn formatted_string(&self, record: &LogRecord<'_>) -> String {
        self.effective_pattern().render(record, self.timestamps.as_ref())
    }

    /// Writes `record` to the sink. Write failures are dropped.
    pub fn append(&self, record: &LogRecord<'_>) {
        if record.level < self.details_level() {
            return;
        }

        let text = self.formatted_string(record);
        let mut stream = self.sink.lock();
        let _ = queue!(
            stream,
            SetForegroundColor(style_for(record.level)),
            Print(text),
            ResetColor
        );
        let _ = stream.flush();
    }
}

impl<W: Write + Send + 'static> log::Log for ConsoleAppender<W> {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        LogLevel::from(metadata.level()) >= self.details_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = record.args().to_string();
        let entry = LogRecord::new(record.level().into(), &message)
            .with_location(record.file().unwrap_or_default(), record.line().unwrap_or_default())
            .with_function(record.module_path().unwrap_or_default())
            .with_category(record.target());
        self.append(&entry);
    }

    fn flush(&self) {
        let _ = self.sink.lock().flush();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::thread;

    use crossterm::style::Color;

    use super::*;

    fn captured() -> (Arc<StreamSink<Vec<u8>>>, ConsoleAppender<Vec<u8>>) {
        let sink = Arc::new(StreamSink::new(Vec::new()));
        let appender = ConsoleAppender::with_sink(sink.clone()).with_environment(|_: &str| None::<String>);
        (sink, appender)
    }

    fn output(sink: &StreamSink<Vec<u8>>) -> String {
        String::from_utf8(sink.lock().clone()).unwrap()
    }

    fn color(level: LogLevel) -> String {
        SetForegroundColor(style_for(level)).to_string()
    }

    fn reset() -> String {
        ResetColor.to_string()
    }

    #[test]
    fn writes_color_text_and_reset() {
        let (sink, appender) = captured();
        let record = LogRecord::new(LogLevel::Warning, "disk low").with_function("doWork");
        appender.append(&record);

        assert_eq!(
            output(&sink),
            format!("{}[Warning] <doWork> disk low\n{}", color(LogLevel::Warning), reset())
        );
    }

    #[test]
    fn every_level_is_colored_and_reset() {
        let levels = [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warning,
            LogLevel::Error,
            LogLevel::Fatal,
        ];

        for level in levels {
            let (sink, appender) = captured();
            appender.set_format("%{typeOne}");
            appender.append(&LogRecord::new(level, ""));
            assert_eq!(
                output(&sink),
                format!("{}{}{}", color(level), level.letter(), reset())
            );
        }

        assert_eq!(color(LogLevel::Error), color(LogLevel::Fatal));
        assert_eq!(color(LogLevel::Info), SetForegroundColor(Color::Grey).to_string());
    }

    #[test]
    fn set_format_replaces_default() {
        let (sink, appender) = captured();
        assert_eq!(appender.format(), DEFAULT_FORMAT);

        appender.set_format("%{category}|%{message}");
        appender.append(&LogRecord::new(LogLevel::Info, "hi").with_category("net"));
        assert_eq!(output(&sink), format!("{}net|hi{}", color(LogLevel::Info), reset()));
    }

    #[test]
    fn environment_override_takes_precedence() {
        let sink = Arc::new(StreamSink::new(Vec::new()));
        let appender = ConsoleAppender::with_sink(sink.clone())
            .with_environment(|_: &str| Some("%{type}: %{message}".to_string()));

        appender.append(&LogRecord::new(LogLevel::Error, "boom"));
        assert_eq!(output(&sink), format!("{}Error: boom\n{}", color(LogLevel::Error), reset()));

        sink.lock().clear();
        appender.ignore_environment_pattern(true);
        appender.append(&LogRecord::new(LogLevel::Error, "boom"));
        assert_eq!(output(&sink), format!("{}[Error  ] <> boom\n{}", color(LogLevel::Error), reset()));
    }

    #[test]
    fn records_below_details_level_are_dropped() {
        let (sink, appender) = captured();
        appender.set_format("%{message}");
        appender.set_details_level(LogLevel::Warning);

        appender.append(&LogRecord::new(LogLevel::Info, "quiet"));
        assert!(output(&sink).is_empty());

        appender.append(&LogRecord::new(LogLevel::Fatal, "loud"));
        assert_eq!(output(&sink), format!("{}loud{}", color(LogLevel::Fatal), reset()));
    }

    #[test]
    fn apply_config_sets_every_option() {
        let (sink, appender) = captured();
        let appender = appender.with_environment(|_: &str| Some("env".to_string()));
        appender.apply_config(&AppenderConfig {
            format: "%{Type}".to_string(),
            ignore_environment_pattern: true,
            details_level: LogLevel::Debug,
        });

        assert_eq!(appender.details_level(), LogLevel::Debug);
        appender.append(&LogRecord::new(LogLevel::Trace, "dropped"));
        appender.append(&LogRecord::new(LogLevel::Debug, "kept"));
        assert_eq!(output(&sink), format!("{}DEBUG{}", color(LogLevel::Debug), reset()));
    }

    struct FixedTimestamp;

    impl TimestampFormatter for FixedTimestamp {
        fn format(&self, _timestamp: &chrono::DateTime<chrono::Local>, _spec: Option<&str>) -> String {
            "12:00".to_string()
        }
    }

    #[test]
    fn timestamps_use_the_configured_formatter() {
        let (sink, appender) = captured();
        let appender = appender.with_timestamp_formatter(FixedTimestamp);
        appender.set_format("%{time} %{message}");

        let record = LogRecord::new(LogLevel::Debug, "tick");
        assert_eq!(appender.formatted_string(&record), "12:00 tick");
        appender.append(&record);
        assert_eq!(output(&sink), format!("{}12:00 tick{}", color(LogLevel::Debug), reset()));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn write_errors_are_swallowed() {
        let appender = ConsoleAppender::with_sink(Arc::new(StreamSink::new(BrokenPipe)));
        appender.append(&LogRecord::new(LogLevel::Fatal, "nobody listens"));
    }

    #[test]
    fn log_facade_records_are_mapped() {
        let (sink, appender) = captured();
        appender.set_format("%{type} %{category} %{function} %{file}:%{line} %{message}");

        log::Log::log(
            &appender,
            &log::Record::builder()
                .level(log::Level::Warn)
                .target("inventory")
                .module_path(Some("shop::stock"))
                .file(Some("src/stock.rs"))
                .line(Some(7))
                .args(format_args!("{} items", 3))
                .build(),
        );

        assert_eq!(
            output(&sink),
            format!(
                "{}Warning inventory shop::stock stock.rs:7 3 items{}",
                color(LogLevel::Warning),
                reset()
            )
        );
    }

    #[test]
    fn concurrent_appends_never_interleave() {
        let (sink, appender) = captured();
        appender.set_format("%{message}\n");
        let appender = Arc::new(appender);

        let messages: Vec<char> = ('a'..='z').collect();
        let handles: Vec<_> = messages
            .iter()
            .map(|&message| {
                let appender = appender.clone();
                thread::spawn(move || {
                    let text = message.to_string();
                    for _ in 0..20 {
                        appender.append(&LogRecord::new(LogLevel::Info, &text));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let out = output(&sink);
        let prefix = color(LogLevel::Info);
        let chunks: Vec<&str> = out.split_terminator(reset().as_str()).collect();
        assert_eq!(chunks.len(), messages.len() * 20);

        let mut seen = HashSet::new();
        for chunk in chunks {
            let line = chunk.strip_prefix(prefix.as_str()).unwrap();
            let mut chars = line.chars();
            let message = chars.next().unwrap();
            assert_eq!(chars.as_str(), "\n");
            seen.insert(message);
        }
        assert_eq!(seen.len(), messages.len());
    }
}
