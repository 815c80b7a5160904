//! Human-readable relative time ("3 days ago", "in an hour").

use stz_core::constants::INVALID_DATE;

use crate::calendar::{MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND, MS_PER_WEEK};
use crate::chronos::Chronos;
use crate::parse::DateLike;

const MS_PER_MONTH: i64 = 30 * MS_PER_DAY;
const MS_PER_YEAR: i64 = 365 * MS_PER_DAY;

/// Below this distance the phrase has no direction.
const JUST_NOW_MS: u64 = 10 * MS_PER_SECOND.unsigned_abs();

/// How a distance below `limit` is phrased.
enum Phrase {
    Fixed(&'static str),
    Count(i64, &'static str),
}

/// Upper bounds (exclusive) in ascending order; anything beyond the last
/// bucket is counted in years.
const BUCKETS: [(i64, Phrase); 12] = [
    (MS_PER_MINUTE, Phrase::Count(MS_PER_SECOND, "seconds")),
    (2 * MS_PER_MINUTE, Phrase::Fixed("a minute")),
    (MS_PER_HOUR, Phrase::Count(MS_PER_MINUTE, "minutes")),
    (2 * MS_PER_HOUR, Phrase::Fixed("an hour")),
    (MS_PER_DAY, Phrase::Count(MS_PER_HOUR, "hours")),
    (2 * MS_PER_DAY, Phrase::Fixed("a day")),
    (MS_PER_WEEK, Phrase::Count(MS_PER_DAY, "days")),
    (2 * MS_PER_WEEK, Phrase::Fixed("a week")),
    (MS_PER_MONTH, Phrase::Count(MS_PER_WEEK, "weeks")),
    (2 * MS_PER_MONTH, Phrase::Fixed("a month")),
    (MS_PER_YEAR, Phrase::Count(MS_PER_MONTH, "months")),
    (2 * MS_PER_YEAR, Phrase::Fixed("a year")),
];

/// ## Summary
/// Phrases a signed distance in milliseconds.
///
/// Positive distances lie in the future (`"in 3 days"`), negative ones in the
/// past (`"3 days ago"`). Anything closer than ten seconds is `"just now"`.
///
/// ```
/// use stz_chronos::relative_phrase;
///
/// assert_eq!(relative_phrase(-9_999), "just now");
/// assert_eq!(relative_phrase(-11_000), "11 seconds ago");
/// assert_eq!(relative_phrase(90 * 60 * 1_000), "in an hour");
/// ```
#[must_use]
pub fn relative_phrase(diff_ms: i64) -> String {
    let distance = diff_ms.unsigned_abs();
    if distance < JUST_NOW_MS {
        return "just now".to_string();
    }

    let text = BUCKETS
        .iter()
        .find(|(limit, _)| distance < limit.unsigned_abs())
        .map_or_else(
            || format!("{} years", distance / MS_PER_YEAR.unsigned_abs()),
            |(_, phrase)| match phrase {
                Phrase::Fixed(text) => (*text).to_string(),
                Phrase::Count(unit, name) => format!("{} {name}", distance / unit.unsigned_abs()),
            },
        );

    if diff_ms > 0 {
        format!("in {text}")
    } else {
        format!("{text} ago")
    }
}

impl Chronos {
    /// ## Summary
    /// Phrases this value relative to `other`: `"in 2 hours"` when this value
    /// is later, `"2 hours ago"` when it is earlier.
    ///
    /// Returns `"Invalid Date"` when either side is invalid.
    #[must_use]
    pub fn from(&self, other: impl Into<DateLike>) -> String {
        let other = other.into().resolve();
        self.value_of()
            .zip(other.value_of())
            .and_then(|(a, b)| a.checked_sub(b))
            .map_or_else(|| INVALID_DATE.to_string(), relative_phrase)
    }

    /// Mirror of [`Chronos::from`]: phrases `other` relative to this value.
    #[must_use]
    pub fn to(&self, other: impl Into<DateLike>) -> String {
        other.into().resolve().from(*self)
    }

    /// This value relative to the current moment.
    ///
    /// ```
    /// use stz_chronos::{Unit, utc_now};
    ///
    /// assert_eq!(utc_now().subtract(3, Unit::Day).from_now(), "3 days ago");
    /// ```
    #[must_use]
    pub fn from_now(&self) -> String {
        self.from(Self::now())
    }

    /// The current moment relative to this value.
    #[must_use]
    pub fn to_now(&self) -> String {
        Self::now().from(*self)
    }
}
