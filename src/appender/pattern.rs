//!
//! # Pattern compiler
//! Turns a format string such as `[%{type:-7}] %{message}` into a list of
//! literal and placeholder segments.
//!

/// Record field a placeholder refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Type,
    TypeUpper,
    TypeOne,
    TypeOneUpper,
    FileName,
    FilePath,
    Line,
    Function,
    Category,
    Message,
    Time,
    Date,
    AppName,
    Pid,
    ThreadId,
    Unknown(String),
}

impl Field {
    pub fn from_name(name: &str) -> Self {
        match name {
            "type" => Field::Type,
            "Type" => Field::TypeUpper,
            "typeOne" => Field::TypeOne,
            "TypeOne" => Field::TypeOneUpper,
            "file" => Field::FileName,
            "File" => Field::FilePath,
            "line" => Field::Line,
            "function" => Field::Function,
            "category" => Field::Category,
            "message" => Field::Message,
            "time" => Field::Time,
            "date" => Field::Date,
            "appname" => Field::AppName,
            "pid" => Field::Pid,
            "threadid" => Field::ThreadId,
            other => Field::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Pad on the right.
    Left,
    /// Pad on the left.
    Right,
}

/// Minimum width of a substituted field. Never truncates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub width: usize,
    pub align: Align,
}

impl Padding {
    /// Parses `[-]N`. Anything else yields `None`.
    pub fn parse(spec: &str) -> Option<Self> {
        let (align, digits) = match spec.strip_prefix('-') {
            Some(digits) => (Align::Left, digits),
            None => (Align::Right, spec),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        digits.parse().ok().map(|width| Padding { width, align })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub field: Field,
    pub padding: Option<Padding>,
    pub argument: Option<String>,
}

impl Placeholder {
    /// Parses the text between `%{` and `}`: `name[:[-]N][ argument]`.
    pub fn parse(inner: &str) -> Self {
        let (head, argument) = match inner.split_once(' ') {
            Some((head, argument)) => {
                let argument = argument.trim();
                (head, (!argument.is_empty()).then(|| argument.to_string()))
            }
            None => (inner, None),
        };

        let (name, padding) = match head.split_once(':') {
            Some((name, spec)) => (name, Padding::parse(spec)),
            None => (head, None),
        };

        Self {
            field: Field::from_name(name),
            padding,
            argument,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// A compiled format string. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatPattern {
    source: String,
    segments: Vec<Segment>,
}

impl FormatPattern {
    pub fn compile(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find("%{") {
            let inner_start = start + 2;
            // unterminated placeholder: the remainder stays literal
            let Some(len) = rest[inner_start..].find('}') else {
                break;
            };

            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let inner = &rest[inner_start..inner_start + len];
            segments.push(Segment::Placeholder(Placeholder::parse(inner)));
            rest = &rest[inner_start + len + 1..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Self {
            source: source.to_string(),
            segments,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}
