//! Date-like inputs and ISO-8601 text parsing.

use std::time::SystemTime;

use chrono::{DateTime, TimeZone, Utc};

use crate::Chronos;
use crate::calendar::{self, CivilFields};

/// Anything that can be turned into a [`Chronos`].
#[derive(Debug, Clone, PartialEq)]
pub enum DateLike {
    /// The current moment.
    Now,
    /// ISO-8601 (or RFC 2822) text.
    Text(String),
    /// Milliseconds since the epoch.
    Millis(i64),
    /// An existing value, which keeps its own mode.
    Value(Chronos),
    /// A number that is not a finite millisecond count.
    Invalid,
}

impl DateLike {
    /// Milliseconds since the epoch, `None` when the input is invalid.
    pub(crate) fn into_instant(self) -> Option<i64> {
        match self {
            Self::Now => Some(Utc::now().timestamp_millis()),
            Self::Text(text) => parse_instant(&text),
            Self::Millis(ms) => Some(ms),
            Self::Value(value) => value.value_of(),
            Self::Invalid => None,
        }
    }

    /// Resolves the input for comparison: existing values are used as they
    /// are, everything else becomes a fresh local-mode value.
    pub(crate) fn resolve(self) -> Chronos {
        match self {
            Self::Value(value) => value,
            other => Chronos::create(other, false),
        }
    }
}

impl From<&str> for DateLike {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for DateLike {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&String> for DateLike {
    fn from(text: &String) -> Self {
        Self::Text(text.clone())
    }
}

impl From<i64> for DateLike {
    fn from(ms: i64) -> Self {
        Self::Millis(ms)
    }
}

impl From<f64> for DateLike {
    /// Truncates toward zero; non-finite or out-of-range numbers are invalid.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "range is checked against the date limits before the cast"
    )]
    fn from(ms: f64) -> Self {
        #[expect(clippy::cast_precision_loss, reason = "the limit is exactly representable")]
        let limit = calendar::MAX_INSTANT_MS as f64;
        if ms.is_finite() && ms.abs() <= limit {
            Self::Millis(ms.trunc() as i64)
        } else {
            Self::Invalid
        }
    }
}

impl From<Chronos> for DateLike {
    fn from(value: Chronos) -> Self {
        Self::Value(value)
    }
}

impl From<&Chronos> for DateLike {
    fn from(value: &Chronos) -> Self {
        Self::Value(*value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateLike {
    fn from(datetime: DateTime<Tz>) -> Self {
        Self::Millis(datetime.timestamp_millis())
    }
}

impl From<SystemTime> for DateLike {
    fn from(time: SystemTime) -> Self {
        Self::from(DateTime::<Utc>::from(time))
    }
}

/// Offset of a parsed date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParsedZone {
    /// Date-only forms are read as UTC.
    DateOnlyUtc,
    /// Date-time forms without an offset are host-local.
    Local,
    /// Explicit `Z` or `±HH:MM`, in minutes east of UTC.
    Offset(i64),
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn is_done(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_any(&mut self, bytes: &[u8]) -> Option<u8> {
        let next = self.peek().filter(|b| bytes.contains(b))?;
        self.pos += 1;
        Some(next)
    }

    /// Exactly `count` ASCII digits.
    fn digits(&mut self, count: usize) -> Option<i64> {
        let end = self.pos.checked_add(count)?;
        let chunk = self.bytes.get(self.pos..end)?;
        let mut value = 0_i64;
        for byte in chunk {
            if !byte.is_ascii_digit() {
                return None;
            }
            value = value * 10 + i64::from(byte - b'0');
        }
        self.pos = end;
        Some(value)
    }

    /// One or more fraction digits, read as milliseconds.
    fn fraction_millis(&mut self) -> Option<i64> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits = self.bytes.get(start..self.pos)?;
        if digits.is_empty() {
            return None;
        }
        let mut millis = 0_i64;
        for place in 0..3 {
            let digit = digits.get(place).map_or(0, |b| i64::from(b - b'0'));
            millis = millis * 10 + digit;
        }
        Some(millis)
    }
}

/// ## Summary
/// Parses date text into milliseconds since the epoch.
///
/// Accepts the ISO-8601 forms a platform date parser understands:
/// `YYYY`, `YYYY-MM`, `YYYY-MM-DD` (read as UTC), optionally followed by
/// `THH:mm[:ss[.sss]]` (`T` or a space) and an offset `Z` / `±HH:MM` /
/// `±HHMM`. A date-time without an offset is host-local. Six-digit signed
/// years (`+010000`, `-000001`) are supported from -262144 to 262143; years
/// beyond that parse as `None`. RFC 2822 text is accepted as a
/// fallback.
///
/// Returns `None` for anything else.
#[must_use]
pub fn parse_instant(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if let Some(ms) = parse_iso(trimmed) {
        return Some(ms);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc2822(trimmed) {
        return calendar::time_clip(datetime.timestamp_millis());
    }

    tracing::warn!(input = %text, "Unrecognized date text, value is invalid");
    None
}

fn parse_iso(text: &str) -> Option<i64> {
    let mut cursor = Cursor::new(text);

    let year = match cursor.eat_any(b"+-") {
        Some(sign) => {
            let magnitude = cursor.digits(6)?;
            if sign == b'-' {
                // -000000 is not a year
                if magnitude == 0 {
                    return None;
                }
                -magnitude
            } else {
                magnitude
            }
        }
        None => cursor.digits(4)?,
    };

    let mut fields = CivilFields::year_start(year);
    let mut zone = ParsedZone::DateOnlyUtc;

    if cursor.eat(b'-') {
        let month = cursor.digits(2)?;
        if !(1..=12).contains(&month) {
            return None;
        }
        fields.month = month - 1;

        if cursor.eat(b'-') {
            let day = cursor.digits(2)?;
            if day < 1 || day > calendar::days_in_month(year, fields.month) {
                return None;
            }
            fields.day = day;
        }
    }

    if !cursor.is_done() {
        cursor.eat_any(b"Tt ")?;
        parse_time(&mut cursor, &mut fields)?;
        zone = parse_zone(&mut cursor)?;
    }

    if !cursor.is_done() {
        return None;
    }

    match zone {
        ParsedZone::DateOnlyUtc => calendar::compose(&fields, true),
        ParsedZone::Local => calendar::compose(&fields, false),
        ParsedZone::Offset(minutes) => calendar::compose_with_offset(&fields, minutes),
    }
}

fn parse_time(cursor: &mut Cursor<'_>, fields: &mut CivilFields) -> Option<()> {
    fields.hour = cursor.digits(2)?;
    if !cursor.eat(b':') {
        return None;
    }
    fields.minute = cursor.digits(2)?;

    if cursor.eat(b':') {
        fields.second = cursor.digits(2)?;
        if cursor.eat_any(b".,").is_some() {
            fields.millisecond = cursor.fraction_millis()?;
        }
    }

    let is_midnight_end =
        fields.hour == 24 && fields.minute == 0 && fields.second == 0 && fields.millisecond == 0;
    if (fields.hour > 23 && !is_midnight_end) || fields.minute > 59 || fields.second > 59 {
        return None;
    }
    Some(())
}

fn parse_zone(cursor: &mut Cursor<'_>) -> Option<ParsedZone> {
    if cursor.is_done() {
        return Some(ParsedZone::Local);
    }
    if cursor.eat_any(b"Zz").is_some() {
        return Some(ParsedZone::Offset(0));
    }

    let sign = match cursor.eat_any(b"+-")? {
        b'-' => -1,
        _ => 1,
    };
    let hours = cursor.digits(2)?;
    cursor.eat(b':');
    let minutes = cursor.digits(2)?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(ParsedZone::Offset(sign * (hours * 60 + minutes)))
}
