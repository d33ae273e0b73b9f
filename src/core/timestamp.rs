//! Timestamp formatting utilities
//!
//! Provides standardized, configurable timestamp formats for the datetime
//! field producer. Supports ISO 8601, RFC 3339, Unix timestamps, and custom
//! strftime patterns.

use chrono::format::{Fixed, Item, Numeric, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// Standardized timestamp format options
///
/// # Examples
///
/// ```
/// use rust_field_logger::TimestampFormat;
/// use chrono::Utc;
///
/// let mut out = String::new();
/// TimestampFormat::Iso8601.write_to(&Utc::now(), &mut out).unwrap();
/// assert!(out.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Date and time separated by a space: `2025-01-08 10:30:45`
    DateTime,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Unix timestamp in microseconds: `1736332245123456`
    UnixMicros,

    /// Custom strftime format
    ///
    /// ```
    /// use rust_field_logger::TimestampFormat;
    ///
    /// // Apache log format
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// assert!(format.validate().is_ok());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Check that a custom pattern only uses recognised strftime specifiers
    pub fn validate(&self) -> Result<(), String> {
        self.compile().validate()
    }

    fn pattern(&self) -> Option<&str> {
        match self {
            TimestampFormat::Iso8601 => Some("%Y-%m-%dT%H:%M:%S%.3fZ"),
            TimestampFormat::Iso8601Micros => Some("%Y-%m-%dT%H:%M:%S%.6fZ"),
            TimestampFormat::Rfc3339 => Some("%Y-%m-%dT%H:%M:%S%:z"),
            TimestampFormat::DateTime => Some("%Y-%m-%d %H:%M:%S"),
            TimestampFormat::Custom(pattern) => Some(pattern),
            TimestampFormat::Unix | TimestampFormat::UnixMillis | TimestampFormat::UnixMicros => {
                None
            }
        }
    }

    /// Parse the pattern once for repeated formatting
    pub fn compile(&self) -> CompiledTimestamp {
        CompiledTimestamp::new(self.clone())
    }

    /// Numeric value for Unix-based formats
    pub fn numeric<Tz: TimeZone>(&self, datetime: &DateTime<Tz>) -> Option<i64> {
        match self {
            TimestampFormat::Unix => Some(datetime.timestamp()),
            TimestampFormat::UnixMillis => Some(datetime.timestamp_millis()),
            TimestampFormat::UnixMicros => Some(datetime.timestamp_micros()),
            _ => None,
        }
    }

    /// Append the formatted timestamp to `out`.
    ///
    /// Parses the pattern on every call; use [`TimestampFormat::compile`]
    /// when formatting repeatedly.
    pub fn write_to<Tz>(&self, datetime: &DateTime<Tz>, out: &mut String) -> fmt::Result
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.compile().write_to(datetime, out)
    }

    /// Check if this is a Unix-based numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TimestampFormat::Unix | TimestampFormat::UnixMillis | TimestampFormat::UnixMicros
        )
    }
}

/// A [`TimestampFormat`] with its strftime pattern already parsed.
///
/// Formatting writes straight into the caller's buffer and does not
/// allocate once the buffer has grown to fit.
///
/// ```
/// use rust_field_logger::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let compiled = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".into()).compile();
/// let at = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// let mut out = String::new();
/// compiled.write_to(&at, &mut out).unwrap();
/// assert_eq!(out, "08/Jan/2025:10:30:45 +0000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTimestamp {
    format: TimestampFormat,
    items: Vec<Item<'static>>,
}

impl CompiledTimestamp {
    pub fn new(format: TimestampFormat) -> Self {
        let items = match format.pattern() {
            Some(pattern) => StrftimeItems::new(pattern).map(|item| item.to_owned()).collect(),
            None => Vec::new(),
        };
        Self { format, items }
    }

    pub fn format(&self) -> &TimestampFormat {
        &self.format
    }

    pub fn validate(&self) -> Result<(), String> {
        match &self.format {
            TimestampFormat::Custom(pattern) if self.items.contains(&Item::Error) => {
                Err(format!("invalid strftime pattern '{}'", pattern))
            }
            _ => Ok(()),
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.format.is_numeric()
    }

    pub fn numeric<Tz: TimeZone>(&self, datetime: &DateTime<Tz>) -> Option<i64> {
        self.format.numeric(datetime)
    }

    /// Append the formatted timestamp to `out`
    pub fn write_to<Tz>(&self, datetime: &DateTime<Tz>, out: &mut String) -> fmt::Result
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        if let Some(value) = self.numeric(datetime) {
            return write!(out, "{}", value);
        }

        // chrono's offset-aware formatting stores the zone name as a String,
        // so only the wall-clock parts go through it
        let naive = datetime.naive_local();
        let mut start = 0;
        for (i, item) in self.items.iter().enumerate() {
            if !is_zoned(item) {
                continue;
            }
            naive.format_with_items(self.items[start..i].iter()).write_to(out)?;
            write_zoned(item, datetime, out)?;
            start = i + 1;
        }
        naive.format_with_items(self.items[start..].iter()).write_to(out)
    }
}

#[derive(Debug, Clone, Copy)]
enum OffsetStyle {
    Hours,
    Minutes,
    MinutesColon,
    SecondsColon,
}

/// Items whose output depends on the time zone
fn is_zoned(item: &Item<'_>) -> bool {
    matches!(
        item,
        Item::Numeric(Numeric::Timestamp, _)
            | Item::Fixed(
                Fixed::TimezoneName
                    | Fixed::TimezoneOffset
                    | Fixed::TimezoneOffsetZ
                    | Fixed::TimezoneOffsetColon
                    | Fixed::TimezoneOffsetColonZ
                    | Fixed::TimezoneOffsetDoubleColon
                    | Fixed::TimezoneOffsetTripleColon
                    | Fixed::RFC2822
                    | Fixed::RFC3339
            )
    )
}

fn write_zoned<Tz>(item: &Item<'_>, datetime: &DateTime<Tz>, out: &mut String) -> fmt::Result
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let offset = datetime.offset().fix();
    match item {
        Item::Numeric(Numeric::Timestamp, _) => write!(out, "{}", datetime.timestamp()),
        Item::Fixed(Fixed::TimezoneName) => write!(out, "{}", datetime.offset()),
        Item::Fixed(Fixed::TimezoneOffset) => write_offset(out, offset, OffsetStyle::Minutes, false),
        Item::Fixed(Fixed::TimezoneOffsetZ) => write_offset(out, offset, OffsetStyle::Minutes, true),
        Item::Fixed(Fixed::TimezoneOffsetColon) => {
            write_offset(out, offset, OffsetStyle::MinutesColon, false)
        }
        Item::Fixed(Fixed::TimezoneOffsetColonZ) => {
            write_offset(out, offset, OffsetStyle::MinutesColon, true)
        }
        Item::Fixed(Fixed::TimezoneOffsetDoubleColon) => {
            write_offset(out, offset, OffsetStyle::SecondsColon, false)
        }
        Item::Fixed(Fixed::TimezoneOffsetTripleColon) => {
            write_offset(out, offset, OffsetStyle::Hours, false)
        }
        Item::Fixed(Fixed::RFC2822) => {
            datetime
                .naive_local()
                .format("%a, %-d %b %Y %H:%M:%S ")
                .write_to(out)?;
            write_offset(out, offset, OffsetStyle::Minutes, false)
        }
        Item::Fixed(Fixed::RFC3339) => {
            datetime
                .naive_local()
                .format("%Y-%m-%dT%H:%M:%S%.f")
                .write_to(out)?;
            write_offset(out, offset, OffsetStyle::MinutesColon, false)
        }
        _ => Err(fmt::Error),
    }
}

fn write_offset(
    out: &mut String,
    offset: FixedOffset,
    style: OffsetStyle,
    zulu: bool,
) -> fmt::Result {
    let total = offset.local_minus_utc();
    if zulu && total == 0 {
        return out.write_char('Z');
    }
    let sign = if total < 0 { '-' } else { '+' };
    let total = total.unsigned_abs();
    let (hours, minutes, seconds) = (total / 3600, total / 60 % 60, total % 60);
    match style {
        OffsetStyle::Hours => write!(out, "{}{:02}", sign, hours),
        OffsetStyle::Minutes => write!(out, "{}{:02}{:02}", sign, hours, minutes),
        OffsetStyle::MinutesColon => write!(out, "{}{:02}:{:02}", sign, hours, minutes),
        OffsetStyle::SecondsColon => {
            write!(out, "{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    fn render(format: &TimestampFormat) -> String {
        let mut out = String::new();
        format.write_to(&fixed_datetime(), &mut out).expect("format");
        out
    }

    #[test]
    fn test_iso8601_format() {
        assert_eq!(render(&TimestampFormat::Iso8601), "2025-01-08T10:30:45.123Z");
    }

    #[test]
    fn test_iso8601_micros_format() {
        assert_eq!(
            render(&TimestampFormat::Iso8601Micros),
            "2025-01-08T10:30:45.123456Z"
        );
    }

    #[test]
    fn test_rfc3339_format() {
        assert_eq!(render(&TimestampFormat::Rfc3339), "2025-01-08T10:30:45+00:00");
    }

    #[test]
    fn test_datetime_format() {
        assert_eq!(render(&TimestampFormat::DateTime), "2025-01-08 10:30:45");
    }

    #[test]
    fn test_rfc3339_keeps_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).expect("offset");
        let local = fixed_datetime().with_timezone(&offset);
        let mut out = String::new();
        TimestampFormat::Rfc3339.write_to(&local, &mut out).unwrap();
        assert_eq!(out, "2025-01-08T12:30:45+02:00");
    }

    #[test]
    fn test_unix_formats() {
        let seconds: i64 = render(&TimestampFormat::Unix).parse().unwrap();
        let millis: i64 = render(&TimestampFormat::UnixMillis).parse().unwrap();
        let micros: i64 = render(&TimestampFormat::UnixMicros).parse().unwrap();
        assert_eq!(seconds, 1736332245);
        assert_eq!(millis, 1736332245123);
        assert_eq!(micros, 1736332245123456);
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string());
        assert_eq!(render(&format), "2025/01/08 10:30");
    }

    #[test]
    fn test_validate() {
        assert!(TimestampFormat::Iso8601.validate().is_ok());
        assert!(TimestampFormat::Custom("%Y-%m-%d".into()).validate().is_ok());
        assert!(TimestampFormat::Custom("%Y-%Q".into()).validate().is_err());
    }

    #[test]
    fn test_offset_specifiers() {
        let offset = FixedOffset::west_opt(5 * 3600 + 30 * 60).expect("offset");
        let local = fixed_datetime().with_timezone(&offset);
        let compiled = TimestampFormat::Custom("%z|%:z|%::z|%:::z|%s".into()).compile();
        let mut out = String::new();
        compiled.write_to(&local, &mut out).unwrap();
        assert_eq!(out, "-0530|-05:30|-05:30:00|-05|1736332245");
    }

    #[test]
    fn test_utc_zone_name_and_rfc_items() {
        let mut out = String::new();
        let compiled = TimestampFormat::Custom("%Z %+".into()).compile();
        compiled.write_to(&fixed_datetime(), &mut out).unwrap();
        assert_eq!(out, "UTC 2025-01-08T10:30:45.123456+00:00");
    }

    #[test]
    fn test_compiled_matches_chrono() {
        let offset = FixedOffset::east_opt(9 * 3600).expect("offset");
        let local = fixed_datetime().with_timezone(&offset);
        for pattern in ["%Y-%m-%dT%H:%M:%S%.3f%:z", "%d/%b/%Y:%H:%M:%S %z", "%a %e %I%p"] {
            let mut out = String::new();
            TimestampFormat::Custom(pattern.into())
                .compile()
                .write_to(&local, &mut out)
                .unwrap();
            assert_eq!(out, local.format(pattern).to_string(), "pattern {}", pattern);
        }
    }

    #[test]
    fn test_is_numeric() {
        assert!(!TimestampFormat::Iso8601.is_numeric());
        assert!(!TimestampFormat::DateTime.is_numeric());
        assert!(TimestampFormat::Unix.is_numeric());
        assert!(TimestampFormat::UnixMillis.is_numeric());
        assert!(TimestampFormat::UnixMicros.is_numeric());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&TimestampFormat::Iso8601).expect("serialize");
        assert_eq!(json, "\"Iso8601\"");

        let format: TimestampFormat =
            serde_json::from_str(r#"{"Custom":"%Y-%m-%d"}"#).expect("deserialize Custom");
        assert_eq!(format, TimestampFormat::Custom("%Y-%m-%d".to_string()));
    }
}
