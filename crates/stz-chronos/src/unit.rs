use std::fmt;
use std::str::FromStr;

use crate::calendar::{MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND, MS_PER_WEEK};
use crate::error::ChronosError;

/// Unit of time used by arithmetic, truncation, comparison and `diff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl Unit {
    pub const ALL: [Self; 8] = [
        Self::Year,
        Self::Month,
        Self::Week,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
        Self::Millisecond,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Millisecond => "millisecond",
        }
    }

    /// Fixed length in milliseconds, or `None` for the calendar units
    /// (month, year) whose length varies.
    #[must_use]
    pub const fn fixed_millis(self) -> Option<i64> {
        match self {
            Self::Year | Self::Month => None,
            Self::Week => Some(MS_PER_WEEK),
            Self::Day => Some(MS_PER_DAY),
            Self::Hour => Some(MS_PER_HOUR),
            Self::Minute => Some(MS_PER_MINUTE),
            Self::Second => Some(MS_PER_SECOND),
            Self::Millisecond => Some(1),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = ChronosError;

    /// Accepts singular and plural names in any case, plus the short forms
    /// `y M w d h m s ms` (`M` is month, `m` is minute).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "y" => return Ok(Self::Year),
            "M" => return Ok(Self::Month),
            "w" => return Ok(Self::Week),
            "d" => return Ok(Self::Day),
            "h" => return Ok(Self::Hour),
            "m" => return Ok(Self::Minute),
            "s" => return Ok(Self::Second),
            "ms" => return Ok(Self::Millisecond),
            _ => {}
        }

        let lower = s.trim().to_ascii_lowercase();
        let singular = lower.strip_suffix('s').unwrap_or(&lower);
        Self::ALL
            .into_iter()
            .find(|unit| unit.as_str() == singular)
            .ok_or_else(|| ChronosError::InvalidUnit(s.to_string()))
    }
}

/// Whether each end of an `is_between` range is open or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Inclusivity {
    /// `()`
    #[default]
    Exclusive,
    /// `[]`
    Inclusive,
    /// `[)`
    StartInclusive,
    /// `(]`
    EndInclusive,
}

impl Inclusivity {
    #[must_use]
    pub const fn includes_start(self) -> bool {
        matches!(self, Self::Inclusive | Self::StartInclusive)
    }

    #[must_use]
    pub const fn includes_end(self) -> bool {
        matches!(self, Self::Inclusive | Self::EndInclusive)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exclusive => "()",
            Self::Inclusive => "[]",
            Self::StartInclusive => "[)",
            Self::EndInclusive => "(]",
        }
    }
}

impl fmt::Display for Inclusivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Inclusivity {
    type Err = ChronosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "()" => Ok(Self::Exclusive),
            "[]" => Ok(Self::Inclusive),
            "[)" => Ok(Self::StartInclusive),
            "(]" => Ok(Self::EndInclusive),
            _ => Err(ChronosError::InvalidInclusivity(s.to_string())),
        }
    }
}
