//! Log level definitions
//!
//! A [`LogLevel`] is a bitmask: every severity owns one bit, so a single value
//! can name one level (`LogLevel::WARN`), several (`LogLevel::WARN | LogLevel::ERROR`)
//! or all of them (`LogLevel::ANY`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogLevel(u8);

impl LogLevel {
    pub const TRACE: LogLevel = LogLevel(1 << 0);
    pub const DEBUG: LogLevel = LogLevel(1 << 1);
    pub const INFO: LogLevel = LogLevel(1 << 2);
    pub const WARN: LogLevel = LogLevel(1 << 3);
    pub const ERROR: LogLevel = LogLevel(1 << 4);
    pub const FATAL: LogLevel = LogLevel(1 << 5);

    /// Wildcard covering every concrete level
    pub const ANY: LogLevel = LogLevel(0b0011_1111);

    /// Number of concrete levels
    pub const COUNT: usize = 6;

    /// Concrete levels in severity order
    pub const ALL: [LogLevel; LogLevel::COUNT] = [
        LogLevel::TRACE,
        LogLevel::DEBUG,
        LogLevel::INFO,
        LogLevel::WARN,
        LogLevel::ERROR,
        LogLevel::FATAL,
    ];

    /// Build a level from raw bits. Bits outside [`LogLevel::ANY`] are kept
    /// so configuration can report them.
    pub const fn from_bits(bits: u8) -> Self {
        LogLevel(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// The empty mask
    pub const fn none() -> Self {
        LogLevel(0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// This mask restricted to known levels
    pub const fn known(self) -> Self {
        LogLevel(self.0 & LogLevel::ANY.0)
    }

    /// Bits of this mask that name no known level
    pub const fn unknown_bits(self) -> u8 {
        self.0 & !LogLevel::ANY.0
    }

    pub const fn contains(self, other: LogLevel) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: LogLevel) -> bool {
        self.0 & other.0 != 0
    }

    /// True for exactly one known level bit
    pub const fn is_concrete(self) -> bool {
        self.0.count_ones() == 1 && self.0 & LogLevel::ANY.0 != 0
    }

    /// True when the known part of this mask covers every level
    pub const fn is_wildcard(self) -> bool {
        self.0 & LogLevel::ANY.0 == LogLevel::ANY.0
    }

    /// Slot of a concrete level in per-level tables
    #[inline]
    pub const fn index(self) -> Option<usize> {
        if self.is_concrete() {
            Some(self.0.trailing_zeros() as usize)
        } else {
            None
        }
    }

    /// Mask of the least severe level in `self` and everything more severe.
    ///
    /// ```
    /// use rust_field_logger::LogLevel;
    ///
    /// let enabled = LogLevel::WARN.and_above();
    /// assert!(enabled.contains(LogLevel::FATAL));
    /// assert!(!enabled.contains(LogLevel::INFO));
    /// ```
    pub const fn and_above(self) -> Self {
        let known = self.0 & LogLevel::ANY.0;
        if known == 0 {
            return LogLevel(0);
        }
        let lowest = known & known.wrapping_neg();
        LogLevel(LogLevel::ANY.0 & !(lowest - 1))
    }

    /// Concrete levels contained in this mask, least severe first
    pub fn iter(self) -> impl Iterator<Item = LogLevel> {
        LogLevel::ALL.into_iter().filter(move |level| self.contains(*level))
    }

    pub fn to_str(&self) -> &'static str {
        match *self {
            LogLevel::TRACE => "TRACE",
            LogLevel::DEBUG => "DEBUG",
            LogLevel::INFO => "INFO",
            LogLevel::WARN => "WARN",
            LogLevel::ERROR => "ERROR",
            LogLevel::FATAL => "FATAL",
            LogLevel::ANY => "ANY",
            _ => "MIXED",
        }
    }

    pub fn to_lowercase_str(&self) -> &'static str {
        match *self {
            LogLevel::TRACE => "trace",
            LogLevel::DEBUG => "debug",
            LogLevel::INFO => "info",
            LogLevel::WARN => "warn",
            LogLevel::ERROR => "error",
            LogLevel::FATAL => "fatal",
            LogLevel::ANY => "any",
            _ => "mixed",
        }
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match *self {
            LogLevel::TRACE => BrightBlack,
            LogLevel::DEBUG => Blue,
            LogLevel::INFO => Green,
            LogLevel::WARN => Yellow,
            LogLevel::ERROR => Red,
            LogLevel::FATAL => BrightRed,
            _ => White,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::INFO
    }
}

impl BitOr for LogLevel {
    type Output = LogLevel;

    fn bitor(self, rhs: LogLevel) -> LogLevel {
        LogLevel(self.0 | rhs.0)
    }
}

impl BitOrAssign for LogLevel {
    fn bitor_assign(&mut self, rhs: LogLevel) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for LogLevel {
    type Output = LogLevel;

    fn bitand(self, rhs: LogLevel) -> LogLevel {
        LogLevel(self.0 & rhs.0)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_concrete() || *self == LogLevel::ANY {
            return f.write_str(self.to_str());
        }
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let mut first = true;
        for level in self.iter() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(level.to_str())?;
            first = false;
        }
        let unknown = self.unknown_bits();
        if unknown != 0 {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{:#04x}", unknown)?;
        }
        Ok(())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    /// Parses a level name (case-insensitive), `ANY`/`*`, or a `|`-separated mask.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mask = LogLevel::none();
        for part in s.split('|') {
            let level = match part.trim().to_uppercase().as_str() {
                "TRACE" => LogLevel::TRACE,
                "DEBUG" => LogLevel::DEBUG,
                "INFO" => LogLevel::INFO,
                "WARN" | "WARNING" => LogLevel::WARN,
                "ERROR" => LogLevel::ERROR,
                "FATAL" => LogLevel::FATAL,
                "ANY" | "*" => LogLevel::ANY,
                _ => return Err(format!("Invalid log level: '{}'", s)),
            };
            mask |= level;
        }
        Ok(mask)
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.to_string()
    }
}
