use std::borrow::Cow;
use std::fmt::Write;
use std::sync::OnceLock;

use chrono::{DateTime, Local};

use crate::appender::pattern::{Align, Field, FormatPattern, Padding, Placeholder, Segment};
use crate::appender::record::LogRecord;

pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const DATE_FORMAT: &str = "%Y-%m-%d";

static LOGGING_START: OnceLock<DateTime<Local>> = OnceLock::new();

/// Instant the first appender was created. `%{time process}` counts from here.
pub fn logging_start() -> DateTime<Local> {
    *LOGGING_START.get_or_init(Local::now)
}

/// Formats record timestamps for the `time` and `date` fields.
pub trait TimestampFormatter: Send + Sync {
    /// `spec` is the placeholder argument, `None` when absent.
    fn format(&self, timestamp: &DateTime<Local>, spec: Option<&str>) -> String;
}

/// strftime formatting through chrono.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChronoTimestamp;

impl TimestampFormatter for ChronoTimestamp {
    fn format(&self, timestamp: &DateTime<Local>, spec: Option<&str>) -> String {
        let mut out = String::new();
        match spec {
            Some("process") => {
                let elapsed = timestamp.signed_duration_since(logging_start());
                let millis = elapsed.num_milliseconds().max(0);
                let _ = write!(out, "{}.{:03}", millis / 1000, millis % 1000);
            }
            spec => {
                // chrono reports unknown specifiers as a fmt error
                if write!(out, "{}", timestamp.format(spec.unwrap_or(DEFAULT_TIME_FORMAT))).is_err() {
                    out.clear();
                }
            }
        }
        out
    }
}

impl FormatPattern {
    /// Substitutes every placeholder with the matching field of `record`.
    pub fn render(&self, record: &LogRecord<'_>, timestamps: &dyn TimestampFormatter) -> String {
        let mut out = String::with_capacity(self.source().len() + record.message.len());

        for segment in self.segments() {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(placeholder) => {
                    let value = resolve(placeholder, record, timestamps);
                    pad_into(&mut out, &value, placeholder.padding);
                }
            }
        }

        out
    }
}

fn resolve<'r>(
    placeholder: &Placeholder,
    record: &LogRecord<'r>,
    timestamps: &dyn TimestampFormatter,
) -> Cow<'r, str> {
    match &placeholder.field {
        Field::Type => Cow::Borrowed(record.level.name()),
        Field::TypeUpper => Cow::Owned(record.level.name().to_uppercase()),
        Field::TypeOne => Cow::Owned(record.level.letter().to_string()),
        Field::TypeOneUpper => Cow::Owned(record.level.letter().to_ascii_uppercase().to_string()),
        Field::FileName => Cow::Borrowed(file_name(record.file)),
        Field::FilePath => Cow::Borrowed(record.file),
        Field::Line => Cow::Owned(record.line.to_string()),
        Field::Function => Cow::Borrowed(record.function),
        Field::Category => Cow::Borrowed(record.category),
        Field::Message => Cow::Borrowed(record.message),
        Field::Time => Cow::Owned(timestamps.format(&record.timestamp, placeholder.argument.as_deref())),
        Field::Date => Cow::Owned(timestamps.format(&record.timestamp, Some(DATE_FORMAT))),
        Field::AppName => Cow::Borrowed(app_name()),
        Field::Pid => Cow::Owned(std::process::id().to_string()),
        Field::ThreadId => {
            let thread = std::thread::current();
            Cow::Owned(match thread.name() {
                Some(name) => name.to_string(),
                None => format!("{:?}", thread.id()),
            })
        }
        Field::Unknown(_) => Cow::Borrowed(""),
    }
}

// pads by hand, runtime fmt widths are capped at u16::MAX
fn pad_into(out: &mut String, value: &str, padding: Option<Padding>) {
    let Some(Padding { width, align }) = padding else {
        out.push_str(value);
        return;
    };

    let fill = width.saturating_sub(value.chars().count());
    let spaces = std::iter::repeat(' ').take(fill);
    match align {
        Align::Left => {
            out.push_str(value);
            out.extend(spaces);
        }
        Align::Right => {
            out.extend(spaces);
            out.push_str(value);
        }
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn app_name() -> &'static str {
    static APP_NAME: OnceLock<String> = OnceLock::new();
    APP_NAME.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
            .unwrap_or_default()
    })
}
