//! Immutable calendar values with millisecond precision.
//!
//! [`Chronos`] wraps an instant together with a UTC/local mode flag and
//! offers field access, calendar arithmetic, unit-aware comparisons,
//! relative-time phrases and pattern formatting. Every operation returns a
//! new value; bad input yields an *invalid* value rather than an error.
//!
//! ```
//! use stz_chronos::{Unit, utc};
//!
//! let value = utc("2024-06-15T14:30:05.007Z");
//! assert_eq!(value.start_of(Unit::Month).format("YYYY-MM-DD HH:mm"), "2024-06-01 00:00");
//! assert!(!utc("someday").is_valid());
//! ```

pub mod error;
pub mod unit;

mod calendar;
mod chronos;
mod format;
mod parse;
mod relative;

pub use chronos::Chronos;
pub use error::{ChronosError, ChronosResult};
pub use format::DEFAULT_FORMAT;
pub use parse::{DateLike, parse_instant};
pub use relative::relative_phrase;
pub use unit::{Inclusivity, Unit};

/// A local-mode value from any date-like input.
#[must_use]
pub fn chronos(input: impl Into<DateLike>) -> Chronos {
    Chronos::create(input, false)
}

/// The current moment, local mode.
#[must_use]
pub fn now() -> Chronos {
    Chronos::now()
}

/// A UTC-mode value from any date-like input.
#[must_use]
pub fn utc(input: impl Into<DateLike>) -> Chronos {
    Chronos::create(input, true)
}

/// The current moment, UTC mode.
#[must_use]
pub fn utc_now() -> Chronos {
    Chronos::utc_now()
}

/// A local-mode value from seconds since the epoch.
#[must_use]
pub fn unix(seconds: i64) -> Chronos {
    Chronos::from_unix_seconds(seconds)
}
