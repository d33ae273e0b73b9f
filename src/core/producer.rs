//! Field producers evaluated on every enabled log call
//!
//! A level's pipeline is an ordered list of producers. Each one yields one
//! field per record: the current time, the level name, the call's message,
//! or a literal field fixed at configuration time.
//!
//! ```
//! use rust_field_logger::{FieldProducer, TimestampFormat};
//!
//! let pipeline = [
//!     FieldProducer::datetime(TimestampFormat::DateTime),
//!     FieldProducer::level().key("severity").upper(),
//!     FieldProducer::message(),
//! ];
//! assert_eq!(pipeline[1].output_key(), "severity");
//! ```

use super::encoder::UNSUPPORTED_VALUE;
use super::field::Field;
use super::log_level::LogLevel;
use super::timestamp::{CompiledTimestamp, TimestampFormat};
use chrono::{Local, Utc};
use std::borrow::Cow;
use std::fmt::Write;

pub const DEFAULT_DATETIME_KEY: &str = "time";
pub const DEFAULT_LEVEL_KEY: &str = "level";
pub const DEFAULT_MESSAGE_KEY: &str = "msg";

/// Per-call inputs available to producers
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub level: LogLevel,
    pub message: &'a str,
}

/// Case applied to produced text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Case {
    #[default]
    Unchanged,
    Upper,
    Lower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    #[default]
    Utc,
    Local,
}

#[derive(Debug, Clone, PartialEq)]
enum ProducerKind {
    Datetime { format: CompiledTimestamp, clock: Clock },
    Level { colored: bool },
    Message,
    Literal(Field<'static>),
}

/// One entry of a level's field pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct FieldProducer {
    kind: ProducerKind,
    key: Option<Cow<'static, str>>,
    case: Case,
}

impl FieldProducer {
    fn with_kind(kind: ProducerKind) -> Self {
        Self {
            kind,
            key: None,
            case: Case::Unchanged,
        }
    }

    /// Current time, formatted per `format`. Unix formats yield integers.
    ///
    /// The pattern is parsed here; an invalid one is reported when the
    /// logger is built.
    pub fn datetime(format: TimestampFormat) -> Self {
        Self::with_kind(ProducerKind::Datetime {
            format: CompiledTimestamp::new(format),
            clock: Clock::Utc,
        })
    }

    /// Current time using a strftime pattern
    pub fn datetime_pattern(pattern: impl Into<String>) -> Self {
        Self::datetime(TimestampFormat::Custom(pattern.into()))
    }

    /// Level name; lower case unless [`FieldProducer::upper`] is applied
    pub fn level() -> Self {
        Self::with_kind(ProducerKind::Level { colored: false })
    }

    /// The message passed to the log call
    pub fn message() -> Self {
        Self::with_kind(ProducerKind::Message)
    }

    /// A literal field repeated on every record, e.g. service name
    pub fn field(field: Field<'_>) -> Self {
        Self::with_kind(ProducerKind::Literal(field.into_owned()))
    }

    /// Override the output key
    #[must_use]
    pub fn key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        match &mut self.kind {
            ProducerKind::Literal(field) => field.key = key.into(),
            _ => self.key = Some(key.into()),
        }
        self
    }

    #[must_use]
    pub fn upper(mut self) -> Self {
        self.case = Case::Upper;
        self
    }

    #[must_use]
    pub fn lower(mut self) -> Self {
        self.case = Case::Lower;
        self
    }

    /// Use the local time zone instead of UTC (datetime producers only)
    #[must_use]
    pub fn local(mut self) -> Self {
        if let ProducerKind::Datetime { clock, .. } = &mut self.kind {
            *clock = Clock::Local;
        }
        self
    }

    /// Wrap the level name in its ANSI color (level producers only).
    /// Backends that refuse ANSI receive the plain name.
    #[must_use]
    pub fn colored(mut self) -> Self {
        if let ProducerKind::Level { colored } = &mut self.kind {
            *colored = true;
        }
        self
    }

    /// Key written for this producer's field
    pub fn output_key(&self) -> &str {
        if let Some(key) = &self.key {
            return key;
        }
        match &self.kind {
            ProducerKind::Datetime { .. } => DEFAULT_DATETIME_KEY,
            ProducerKind::Level { .. } => DEFAULT_LEVEL_KEY,
            ProducerKind::Message => DEFAULT_MESSAGE_KEY,
            ProducerKind::Literal(field) => field.key(),
        }
    }

    /// Check the producer's own configuration
    pub(crate) fn validate(&self) -> Result<(), String> {
        match &self.kind {
            ProducerKind::Datetime { format, .. } => format.validate(),
            _ => Ok(()),
        }
    }

    /// Evaluate the producer and hand the resulting field to `sink`.
    ///
    /// `scratch` holds any text the field borrows; it is overwritten.
    pub(crate) fn produce<R>(
        &self,
        record: &Record<'_>,
        scratch: &mut String,
        sink: impl FnOnce(&Field<'_>) -> R,
    ) -> R {
        let key = self.output_key();
        match &self.kind {
            ProducerKind::Literal(field) => sink(field),
            ProducerKind::Message => {
                let message = self.apply_case(record.message, scratch);
                sink(&Field::string(key, message))
            }
            ProducerKind::Level { colored } => {
                let name = match self.case {
                    Case::Upper => record.level.to_str(),
                    Case::Lower | Case::Unchanged => record.level.to_lowercase_str(),
                };
                if *colored {
                    scratch.clear();
                    let color = record.level.color_code();
                    let _ = write!(scratch, "\x1b[{}m{}\x1b[0m", color.to_fg_str(), name);
                    sink(&Field::string(key, scratch.as_str()))
                } else {
                    sink(&Field::string(key, name))
                }
            }
            ProducerKind::Datetime { format, clock } => {
                if format.is_numeric() {
                    let value = match clock {
                        Clock::Utc => format.numeric(&Utc::now()),
                        Clock::Local => format.numeric(&Local::now()),
                    };
                    return match value {
                        Some(value) => sink(&Field::int64(key, value)),
                        None => sink(&Field::string(key, UNSUPPORTED_VALUE)),
                    };
                }
                scratch.clear();
                let written = match clock {
                    Clock::Utc => format.write_to(&Utc::now(), scratch),
                    Clock::Local => format.write_to(&Local::now(), scratch),
                };
                if written.is_err() {
                    scratch.clear();
                    scratch.push_str(UNSUPPORTED_VALUE);
                }
                sink(&Field::string(key, self.apply_case_in_place(scratch)))
            }
        }
    }

    fn apply_case<'s>(&self, text: &'s str, scratch: &'s mut String) -> &'s str {
        match self.case {
            Case::Unchanged => text,
            Case::Upper if !text.bytes().any(|b| b.is_ascii_lowercase()) && text.is_ascii() => text,
            Case::Lower if !text.bytes().any(|b| b.is_ascii_uppercase()) && text.is_ascii() => text,
            Case::Upper => {
                scratch.clear();
                scratch.extend(text.chars().flat_map(char::to_uppercase));
                scratch
            }
            Case::Lower => {
                scratch.clear();
                scratch.extend(text.chars().flat_map(char::to_lowercase));
                scratch
            }
        }
    }

    fn apply_case_in_place<'s>(&self, scratch: &'s mut String) -> &'s str {
        match self.case {
            Case::Unchanged => {}
            Case::Upper => scratch.make_ascii_uppercase(),
            Case::Lower => scratch.make_ascii_lowercase(),
        }
        scratch
    }
}
