//! Proleptic Gregorian arithmetic over millisecond instants.
//!
//! Field composition follows the rollover rules of a platform date object:
//! a month of 12 is January of the next year, a day of 0 is the last day of
//! the previous month, 25 hours is one day and one hour, and so on. Local
//! wall-clock times are resolved through the host time zone.

use chrono::{
    DateTime, Datelike, Local, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone, Timelike,
    Utc,
};

/// Largest distance from the epoch a date may have (100,000,000 days).
pub(crate) const MAX_INSTANT_MS: i64 = 8_640_000_000_000_000;

pub(crate) const MS_PER_SECOND: i64 = 1_000;
pub(crate) const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub(crate) const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
pub(crate) const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
pub(crate) const MS_PER_WEEK: i64 = 7 * MS_PER_DAY;

/// Beyond this many years from the epoch no instant is representable, so
/// composition can bail out before the day arithmetic overflows.
const MAX_YEAR_MAGNITUDE: u64 = 300_000;

/// Calendar fields of an instant, read in either UTC or host-local time.
///
/// `month` is 0-based. Values are wide so callers can push them out of range
/// and let [`compose`] roll them over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CivilFields {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
    pub millisecond: i64,
    /// Day of the week, 0 = Sunday. Ignored by [`compose`].
    pub weekday: i64,
}

impl CivilFields {
    /// Midnight on the first day of `year`.
    #[must_use]
    pub const fn year_start(year: i64) -> Self {
        Self {
            year,
            month: 0,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            millisecond: 0,
            weekday: 0,
        }
    }

    pub fn zero_time(&mut self) {
        self.hour = 0;
        self.minute = 0;
        self.second = 0;
        self.millisecond = 0;
    }

    pub fn max_time(&mut self) {
        self.hour = 23;
        self.minute = 59;
        self.second = 59;
        self.millisecond = 999;
    }
}

/// Returns `ms` if it is inside the representable date range.
#[must_use]
pub(crate) fn time_clip(ms: i64) -> Option<i64> {
    if ms.unsigned_abs() > MAX_INSTANT_MS.unsigned_abs() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(ms).map(|_| ms)
}

#[must_use]
pub(crate) const fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a 0-based month of `year`.
#[must_use]
pub(crate) const fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        1 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        3 | 5 | 8 | 10 => 30,
        _ => 31,
    }
}

/// Days from 1970-01-01 to the given date (1-based month and day).
const fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Day number for a year, 0-based month and 1-based date, rolling all
/// three over as needed.
fn make_day(year: i64, month: i64, date: i64) -> Option<i64> {
    let year = year.checked_add(month.div_euclid(12))?;
    let month = month.rem_euclid(12);
    if year.unsigned_abs() > MAX_YEAR_MAGNITUDE {
        return None;
    }
    days_from_civil(year, month + 1, 1).checked_add(date.checked_sub(1)?)
}

fn make_time(hour: i64, minute: i64, second: i64, millisecond: i64) -> Option<i64> {
    hour.checked_mul(MS_PER_HOUR)?
        .checked_add(minute.checked_mul(MS_PER_MINUTE)?)?
        .checked_add(second.checked_mul(MS_PER_SECOND)?)?
        .checked_add(millisecond)
}

/// Milliseconds since the epoch for the fields read as a UTC wall clock.
fn wall_clock_ms(fields: &CivilFields) -> Option<i64> {
    let day = make_day(fields.year, fields.month, fields.day)?;
    let time = make_time(fields.hour, fields.minute, fields.second, fields.millisecond)?;
    day.checked_mul(MS_PER_DAY)?.checked_add(time)
}

/// ## Summary
/// Builds an instant from calendar fields, rolling out-of-range values over.
///
/// In local mode the fields are host wall-clock time. A wall-clock time that
/// falls in a DST gap is shifted forward by one hour; an ambiguous one
/// resolves to the earlier instant.
///
/// Returns `None` when the result leaves the representable range.
#[must_use]
pub(crate) fn compose(fields: &CivilFields, utc: bool) -> Option<i64> {
    let wall = wall_clock_ms(fields)?;
    if utc {
        return time_clip(wall);
    }
    let naive = DateTime::<Utc>::from_timestamp_millis(wall)?.naive_utc();
    resolve_wall_clock(&Local, naive).and_then(time_clip)
}

/// Builds an instant from fields read at a fixed offset east of UTC.
#[must_use]
pub(crate) fn compose_with_offset(fields: &CivilFields, offset_minutes: i64) -> Option<i64> {
    let wall = wall_clock_ms(fields)?;
    wall.checked_sub(offset_minutes.checked_mul(MS_PER_MINUTE)?)
        .and_then(time_clip)
}

fn instant_at(wall: NaiveDateTime, offset: &impl Offset) -> Option<i64> {
    wall.checked_sub_offset(offset.fix()).map(|naive| naive.and_utc().timestamp_millis())
}

/// ## Summary
/// Resolves a wall-clock time in `tz` to an instant.
///
/// A time skipped by a DST gap moves forward one hour. A time that occurs
/// twice resolves to the earlier instant.
pub(crate) fn resolve_wall_clock<Tz: TimeZone>(tz: &Tz, wall: NaiveDateTime) -> Option<i64> {
    match tz.offset_from_local_datetime(&wall) {
        LocalResult::Single(offset) => instant_at(wall, &offset),
        LocalResult::Ambiguous(first, second) => {
            let first = instant_at(wall, &first)?;
            let second = instant_at(wall, &second)?;
            Some(first.min(second))
        }
        LocalResult::None => {
            let shifted = wall.checked_add_signed(TimeDelta::hours(1))?;
            let offset = tz.offset_from_local_datetime(&shifted).earliest()?;
            instant_at(shifted, &offset)
        }
    }
}

/// Wall-clock time of `instant` in `tz`, or `None` when the offset pushes it
/// past the range of [`NaiveDateTime`].
pub(crate) fn wall_clock_in<Tz: TimeZone>(
    tz: &Tz,
    instant: &DateTime<Utc>,
) -> Option<NaiveDateTime> {
    let naive = instant.naive_utc();
    naive.checked_add_offset(tz.offset_from_utc_datetime(&naive).fix())
}

/// ## Summary
/// Splits an instant into calendar fields in UTC or host-local time.
#[must_use]
pub(crate) fn decompose(ms: i64, utc: bool) -> Option<CivilFields> {
    let instant = DateTime::<Utc>::from_timestamp_millis(ms)?;
    let naive = if utc {
        instant.naive_utc()
    } else {
        wall_clock_in(&Local, &instant)?
    };

    Some(CivilFields {
        year: i64::from(naive.year()),
        month: i64::from(naive.month0()),
        day: i64::from(naive.day()),
        hour: i64::from(naive.hour()),
        minute: i64::from(naive.minute()),
        second: i64::from(naive.second()),
        millisecond: i64::from(naive.nanosecond() / 1_000_000),
        weekday: i64::from(naive.weekday().num_days_from_sunday()),
    })
}
