//! The immutable calendar value.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::calendar::{self, CivilFields};
use crate::parse::DateLike;
use crate::unit::{Inclusivity, Unit};

/// An immutable point in time with millisecond precision.
///
/// A `Chronos` pairs an instant with a mode flag: in UTC mode every field
/// accessor, setter and formatter works on UTC calendar fields, in local mode
/// on the host's local calendar. Every operation returns a new value.
///
/// Unparseable input does not fail; it produces an *invalid* value that
/// flows through every operation and is detected with [`Chronos::is_valid`].
/// Invalid values format as `"Invalid Date"`, return `None` from numeric
/// accessors, `NaN` from [`Chronos::diff`] and `false` from comparisons.
///
/// ```
/// use stz_chronos::{Unit, chronos};
///
/// let date = chronos("2024-06-15").to_utc_mode();
/// let next_month = date.add(1, Unit::Month);
/// assert_eq!(date.format("YYYY-MM-DD"), "2024-06-15");
/// assert_eq!(next_month.format("YYYY-MM-DD"), "2024-07-15");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Chronos {
    instant: Option<i64>,
    utc: bool,
}

impl Chronos {
    /// ## Summary
    /// Creates a value from any date-like input in the requested mode.
    ///
    /// An existing `Chronos` input contributes only its instant.
    #[must_use]
    pub fn create(input: impl Into<DateLike>, utc: bool) -> Self {
        Self::from_instant(input.into().into_instant(), utc)
    }

    /// The current moment, local mode.
    #[must_use]
    pub fn now() -> Self {
        Self::create(DateLike::Now, false)
    }

    /// The current moment, UTC mode.
    #[must_use]
    pub fn utc_now() -> Self {
        Self::create(DateLike::Now, true)
    }

    /// ## Summary
    /// Creates a local-mode value from seconds since the epoch.
    #[must_use]
    pub fn from_unix_seconds(seconds: i64) -> Self {
        Self::from_instant(seconds.checked_mul(1_000), false)
    }

    /// An invalid value.
    #[must_use]
    pub const fn invalid() -> Self {
        Self {
            instant: None,
            utc: false,
        }
    }

    pub(crate) fn from_instant(instant: Option<i64>, utc: bool) -> Self {
        Self {
            instant: instant.and_then(calendar::time_clip),
            utc,
        }
    }

    pub(crate) fn fields(&self) -> Option<CivilFields> {
        calendar::decompose(self.instant?, self.utc)
    }

    /// Copies the fields, lets `change` adjust them and wraps the rolled-over
    /// result in a new value with the same mode.
    fn map_fields(&self, change: impl FnOnce(&mut CivilFields) -> Option<()>) -> Self {
        let instant = self.fields().and_then(|mut fields| {
            change(&mut fields)?;
            calendar::compose(&fields, self.utc)
        });
        Self {
            instant,
            utc: self.utc,
        }
    }

    fn field<T: TryFrom<i64>>(&self, read: impl FnOnce(&CivilFields) -> i64) -> Option<T> {
        self.fields().and_then(|fields| T::try_from(read(&fields)).ok())
    }

    // Field accessors

    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.field(|f| f.year)
    }

    /// Month index, 0 (January) to 11.
    #[must_use]
    pub fn month(&self) -> Option<u32> {
        self.field(|f| f.month)
    }

    /// Day of the month, 1 to 31.
    #[must_use]
    pub fn date(&self) -> Option<u32> {
        self.field(|f| f.day)
    }

    /// Day of the week, 0 (Sunday) to 6.
    #[must_use]
    pub fn day(&self) -> Option<u32> {
        self.field(|f| f.weekday)
    }

    #[must_use]
    pub fn hour(&self) -> Option<u32> {
        self.field(|f| f.hour)
    }

    #[must_use]
    pub fn minute(&self) -> Option<u32> {
        self.field(|f| f.minute)
    }

    #[must_use]
    pub fn second(&self) -> Option<u32> {
        self.field(|f| f.second)
    }

    #[must_use]
    pub fn millisecond(&self) -> Option<u32> {
        self.field(|f| f.millisecond)
    }

    // Field setters. Out-of-range values roll over into neighbouring fields.

    #[must_use]
    pub fn set_year(&self, value: i64) -> Self {
        self.map_fields(|f| {
            f.year = value;
            Some(())
        })
    }

    /// Sets the 0-based month; 12 is January of the next year.
    #[must_use]
    pub fn set_month(&self, value: i64) -> Self {
        self.map_fields(|f| {
            f.month = value;
            Some(())
        })
    }

    /// Sets the day of the month; 0 is the last day of the previous month.
    #[must_use]
    pub fn set_date(&self, value: i64) -> Self {
        self.map_fields(|f| {
            f.day = value;
            Some(())
        })
    }

    #[must_use]
    pub fn set_hour(&self, value: i64) -> Self {
        self.map_fields(|f| {
            f.hour = value;
            Some(())
        })
    }

    #[must_use]
    pub fn set_minute(&self, value: i64) -> Self {
        self.map_fields(|f| {
            f.minute = value;
            Some(())
        })
    }

    #[must_use]
    pub fn set_second(&self, value: i64) -> Self {
        self.map_fields(|f| {
            f.second = value;
            Some(())
        })
    }

    #[must_use]
    pub fn set_millisecond(&self, value: i64) -> Self {
        self.map_fields(|f| {
            f.millisecond = value;
            Some(())
        })
    }

    // Arithmetic

    /// ## Summary
    /// Adds `amount` units using calendar-field arithmetic.
    ///
    /// Month and year steps keep the day of the month and roll over when it
    /// does not exist (January 31 plus one month lands in early March).
    /// Negative amounts subtract.
    #[must_use]
    pub fn add(&self, amount: i64, unit: Unit) -> Self {
        self.map_fields(|f| {
            match unit {
                Unit::Year => f.year = f.year.checked_add(amount)?,
                Unit::Month => f.month = f.month.checked_add(amount)?,
                Unit::Week => f.day = f.day.checked_add(amount.checked_mul(7)?)?,
                Unit::Day => f.day = f.day.checked_add(amount)?,
                Unit::Hour => f.hour = f.hour.checked_add(amount)?,
                Unit::Minute => f.minute = f.minute.checked_add(amount)?,
                Unit::Second => f.second = f.second.checked_add(amount)?,
                Unit::Millisecond => f.millisecond = f.millisecond.checked_add(amount)?,
            }
            Some(())
        })
    }

    #[must_use]
    pub fn subtract(&self, amount: i64, unit: Unit) -> Self {
        match amount.checked_neg() {
            Some(negated) => self.add(negated, unit),
            None => Self::from_instant(None, self.utc),
        }
    }

    /// ## Summary
    /// Truncates to the first millisecond of the enclosing `unit`.
    ///
    /// Weeks start on Sunday. `Unit::Millisecond` returns the value as is.
    #[must_use]
    pub fn start_of(&self, unit: Unit) -> Self {
        if unit == Unit::Millisecond {
            return *self;
        }
        self.map_fields(|f| {
            match unit {
                Unit::Year => {
                    f.month = 0;
                    f.day = 1;
                    f.zero_time();
                }
                Unit::Month => {
                    f.day = 1;
                    f.zero_time();
                }
                Unit::Week => {
                    f.day -= f.weekday;
                    f.zero_time();
                }
                Unit::Day => f.zero_time(),
                Unit::Hour => {
                    f.minute = 0;
                    f.second = 0;
                    f.millisecond = 0;
                }
                Unit::Minute => {
                    f.second = 0;
                    f.millisecond = 0;
                }
                Unit::Second | Unit::Millisecond => f.millisecond = 0,
            }
            Some(())
        })
    }

    /// ## Summary
    /// Moves to the last millisecond of the enclosing `unit`.
    ///
    /// Weeks end on Saturday. `Unit::Millisecond` returns the value as is.
    #[must_use]
    pub fn end_of(&self, unit: Unit) -> Self {
        if unit == Unit::Millisecond {
            return *self;
        }
        self.map_fields(|f| {
            match unit {
                Unit::Year => {
                    f.month = 11;
                    f.day = 31;
                    f.max_time();
                }
                Unit::Month => {
                    f.month += 1;
                    f.day = 0;
                    f.max_time();
                }
                Unit::Week => {
                    f.day += 6 - f.weekday;
                    f.max_time();
                }
                Unit::Day => f.max_time(),
                Unit::Hour => {
                    f.minute = 59;
                    f.second = 59;
                    f.millisecond = 999;
                }
                Unit::Minute => {
                    f.second = 59;
                    f.millisecond = 999;
                }
                Unit::Second | Unit::Millisecond => f.millisecond = 999,
            }
            Some(())
        })
    }

    // Comparisons

    /// ## Summary
    /// Whether this value is strictly before `other`.
    ///
    /// With a unit, the whole `unit` containing this value must end before
    /// the `unit` containing `other` starts.
    #[must_use]
    pub fn is_before(&self, other: impl Into<DateLike>, unit: Option<Unit>) -> bool {
        let other = other.into().resolve();
        match unit {
            None => less_than(self.instant, other.instant),
            Some(unit) => less_than(self.end_of(unit).instant, other.start_of(unit).instant),
        }
    }

    /// Mirror of [`Chronos::is_before`].
    #[must_use]
    pub fn is_after(&self, other: impl Into<DateLike>, unit: Option<Unit>) -> bool {
        let other = other.into().resolve();
        match unit {
            None => less_than(other.instant, self.instant),
            Some(unit) => less_than(other.end_of(unit).instant, self.start_of(unit).instant),
        }
    }

    /// ## Summary
    /// Whether both values fall in the same instant, or with a unit, in the
    /// same `unit` (compared by their starts).
    #[must_use]
    pub fn is_same(&self, other: impl Into<DateLike>, unit: Option<Unit>) -> bool {
        let other = other.into().resolve();
        match unit {
            None => equal(self.instant, other.instant),
            Some(unit) => equal(self.start_of(unit).instant, other.start_of(unit).instant),
        }
    }

    #[must_use]
    pub fn is_same_or_before(&self, other: impl Into<DateLike>, unit: Option<Unit>) -> bool {
        let other = other.into().resolve();
        self.is_same(other, unit) || self.is_before(other, unit)
    }

    #[must_use]
    pub fn is_same_or_after(&self, other: impl Into<DateLike>, unit: Option<Unit>) -> bool {
        let other = other.into().resolve();
        self.is_same(other, unit) || self.is_after(other, unit)
    }

    /// ## Summary
    /// Whether this value lies between `start` and `end`, each end open or
    /// closed according to `inclusivity`.
    ///
    /// ```
    /// use stz_chronos::{Inclusivity, utc};
    ///
    /// let start = utc("2024-01-01");
    /// let end = utc("2024-12-31");
    /// assert!(!start.is_between(start, end, None, Inclusivity::Exclusive));
    /// assert!(start.is_between(start, end, None, Inclusivity::StartInclusive));
    /// ```
    #[must_use]
    pub fn is_between(
        &self,
        start: impl Into<DateLike>,
        end: impl Into<DateLike>,
        unit: Option<Unit>,
        inclusivity: Inclusivity,
    ) -> bool {
        let start = start.into().resolve();
        let end = end.into().resolve();

        let after_start = if inclusivity.includes_start() {
            self.is_same_or_after(start, unit)
        } else {
            self.is_after(start, unit)
        };
        let before_end = if inclusivity.includes_end() {
            self.is_same_or_before(end, unit)
        } else {
            self.is_before(end, unit)
        };
        after_start && before_end
    }

    // Queries

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.instant.is_some()
    }

    /// Gregorian leap year rule applied to [`Chronos::year`]. Invalid values
    /// are never leap years.
    #[must_use]
    pub fn is_leap_year(&self) -> bool {
        self.fields()
            .is_some_and(|fields| calendar::is_leap_year(fields.year))
    }

    #[must_use]
    pub fn days_in_month(&self) -> Option<u32> {
        let fields = self.fields()?;
        u32::try_from(calendar::days_in_month(fields.year, fields.month)).ok()
    }

    /// 365 or 366.
    #[must_use]
    pub fn days_in_year(&self) -> Option<u32> {
        let fields = self.fields()?;
        Some(if calendar::is_leap_year(fields.year) {
            366
        } else {
            365
        })
    }

    /// ## Summary
    /// Week of the year, counted from the week containing January 1.
    ///
    /// Computed as `ceil((days since Jan 1 + weekday of Jan 1 + 1) / 7)`,
    /// which differs from ISO-8601 week numbering around the turn of the year.
    #[must_use]
    pub fn week(&self) -> Option<u32> {
        let fields = self.fields()?;
        let jan_first = Self::from_instant(
            calendar::compose(&CivilFields::year_start(fields.year), self.utc),
            self.utc,
        );
        let elapsed = self.instant?.checked_sub(jan_first.instant?)?;
        let days = elapsed.div_euclid(calendar::MS_PER_DAY);
        let offset = jan_first.fields()?.weekday;
        u32::try_from((days + offset + 1 + 6).div_euclid(7)).ok()
    }

    // Difference

    /// ## Summary
    /// Signed difference `self - other` in `unit`.
    ///
    /// Month and year differences count whole calendar months and then
    /// interpolate the remainder between the surrounding month anchors; a
    /// year is twelve months. Fixed units divide the millisecond delta.
    /// Unless `precise` is set, the result is truncated toward zero.
    ///
    /// Returns `NaN` when either value is invalid.
    ///
    /// ```
    /// use stz_chronos::{Unit, utc};
    ///
    /// let diff = utc("2024-06-15").diff(utc("2024-01-01"), Unit::Month, false);
    /// assert_eq!(diff, 5.0);
    /// ```
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "millisecond deltas are reported as floating point"
    )]
    pub fn diff(&self, other: impl Into<DateLike>, unit: Unit, precise: bool) -> f64 {
        let other = other.into().resolve();

        let result = match unit {
            Unit::Year => self.month_diff(&other).map(|months| months / 12.0),
            Unit::Month => self.month_diff(&other),
            fixed => self
                .instant
                .zip(other.instant)
                .and_then(|(a, b)| a.checked_sub(b))
                .zip(fixed.fixed_millis())
                .map(|(delta, length)| delta as f64 / length as f64),
        };

        match result {
            Some(value) if precise => value,
            Some(value) => value.trunc(),
            None => f64::NAN,
        }
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "month counts and deltas are reported as floating point"
    )]
    fn month_diff(&self, other: &Self) -> Option<f64> {
        let (this_fields, other_fields) = (self.fields()?, other.fields()?);
        let months = (this_fields.year - other_fields.year) * 12
            + (this_fields.month - other_fields.month);

        let anchor = other.add(months, Unit::Month).instant?;
        let adjust = self.instant? - anchor;
        let direction: i64 = if adjust >= 0 { 1 } else { -1 };
        let next_anchor = other.add(months + direction, Unit::Month).instant?;

        let span = (next_anchor - anchor) as f64;
        Some(months as f64 + (adjust as f64 / span) * direction as f64)
    }

    // Mode and representation

    #[must_use]
    pub const fn to_utc_mode(&self) -> Self {
        Self {
            instant: self.instant,
            utc: true,
        }
    }

    #[must_use]
    pub const fn to_local_mode(&self) -> Self {
        Self {
            instant: self.instant,
            utc: false,
        }
    }

    #[must_use]
    pub const fn is_utc_mode(&self) -> bool {
        self.utc
    }

    /// An independent `chrono` copy of the instant.
    #[must_use]
    pub fn to_native_date(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.instant?)
    }

    /// Milliseconds since the epoch.
    #[must_use]
    pub const fn value_of(&self) -> Option<i64> {
        self.instant
    }

    /// Whole seconds since the epoch, rounded down.
    #[must_use]
    pub fn unix_seconds(&self) -> Option<i64> {
        self.instant.map(|ms| ms.div_euclid(1_000))
    }
}

fn less_than(a: Option<i64>, b: Option<i64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

fn equal(a: Option<i64>, b: Option<i64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

/// Values are equal when their instants are; the mode is ignored. Invalid
/// values are equal to nothing, themselves included.
impl PartialEq for Chronos {
    fn eq(&self, other: &Self) -> bool {
        equal(self.instant, other.instant)
    }
}

impl PartialOrd for Chronos {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let (a, b) = self.instant.zip(other.instant)?;
        Some(a.cmp(&b))
    }
}

impl Default for Chronos {
    /// The current moment, local mode.
    fn default() -> Self {
        Self::now()
    }
}
