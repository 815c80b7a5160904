//! Text output: pattern formatting, ISO-8601, display strings and serde.

use std::fmt::{self, Write as _};

use chrono::{DateTime, Local, Offset, TimeZone, Utc};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use stz_core::constants::INVALID_DATE;

use crate::calendar::{self, CivilFields};
use crate::chronos::Chronos;
use crate::parse::{DateLike, parse_instant};

/// Pattern used when none is given.
pub const DEFAULT_FORMAT: &str = "YYYY-MM-DD";

const DISPLAY_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

#[derive(Debug, Clone, Copy)]
enum Token {
    Year4,
    Year2,
    Millis3,
    Month2,
    Month,
    Day2,
    Day,
    Hour2,
    Hour,
    Minute2,
    Second2,
}

/// Tried in order at every position, so longer tokens shadow their prefixes.
const TOKENS: [(&str, Token); 11] = [
    ("YYYY", Token::Year4),
    ("YY", Token::Year2),
    ("SSS", Token::Millis3),
    ("MM", Token::Month2),
    ("M", Token::Month),
    ("DD", Token::Day2),
    ("D", Token::Day),
    ("HH", Token::Hour2),
    ("H", Token::Hour),
    ("mm", Token::Minute2),
    ("ss", Token::Second2),
];

fn padded_year(year: i64) -> String {
    if year < 0 {
        format!("-{:04}", year.unsigned_abs())
    } else {
        format!("{year:04}")
    }
}

fn write_token(out: &mut String, token: Token, f: &CivilFields) -> fmt::Result {
    match token {
        Token::Year4 => out.push_str(&padded_year(f.year)),
        Token::Year2 => write!(out, "{:02}", f.year.unsigned_abs() % 100)?,
        Token::Millis3 => write!(out, "{:03}", f.millisecond)?,
        Token::Month2 => write!(out, "{:02}", f.month + 1)?,
        Token::Month => write!(out, "{}", f.month + 1)?,
        Token::Day2 => write!(out, "{:02}", f.day)?,
        Token::Day => write!(out, "{}", f.day)?,
        Token::Hour2 => write!(out, "{:02}", f.hour)?,
        Token::Hour => write!(out, "{}", f.hour)?,
        Token::Minute2 => write!(out, "{:02}", f.minute)?,
        Token::Second2 => write!(out, "{:02}", f.second)?,
    }
    Ok(())
}

fn render(pattern: &str, fields: &CivilFields) -> Result<String, fmt::Error> {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;

    'outer: while !rest.is_empty() {
        for (text, token) in TOKENS {
            if let Some(tail) = rest.strip_prefix(text) {
                write_token(&mut out, token, fields)?;
                rest = tail;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    Ok(out)
}

fn iso_string(ms: i64) -> Option<String> {
    let f = calendar::decompose(ms, true)?;
    let year = if (0..=9999).contains(&f.year) {
        format!("{:04}", f.year)
    } else {
        let sign = if f.year < 0 { '-' } else { '+' };
        format!("{sign}{:06}", f.year.unsigned_abs())
    };
    Some(format!(
        "{year}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        f.month + 1,
        f.day,
        f.hour,
        f.minute,
        f.second,
        f.millisecond
    ))
}

impl Chronos {
    /// ## Summary
    /// Substitutes calendar fields into `pattern`.
    ///
    /// Recognized tokens are `YYYY YY MM M DD D HH H mm ss SSS`; everything
    /// else is copied through. The pattern is scanned once, longest token
    /// first, so substituted digits are never re-read as tokens.
    ///
    /// ```
    /// use stz_chronos::utc;
    ///
    /// let value = utc("2024-06-15T14:30:05.007Z");
    /// assert_eq!(value.format("YYYY-MM-DD HH:mm:ss"), "2024-06-15 14:30:05");
    /// assert_eq!(value.format("YY/M/D"), "24/6/15");
    /// ```
    #[must_use]
    pub fn format(&self, pattern: &str) -> String {
        self.fields()
            .and_then(|fields| render(pattern, &fields).ok())
            .unwrap_or_else(|| INVALID_DATE.to_string())
    }

    /// `YYYY-MM-DDTHH:mm:ss.sssZ` in UTC regardless of mode; years outside
    /// 0..=9999 use the six-digit signed form.
    #[must_use]
    pub fn to_iso_string(&self) -> String {
        self.value_of()
            .and_then(iso_string)
            .unwrap_or_else(|| INVALID_DATE.to_string())
    }

    /// Same as [`Chronos::to_iso_string`].
    #[must_use]
    pub fn to_json(&self) -> String {
        self.to_iso_string()
    }

    /// Human-readable string in the value's mode, e.g.
    /// `Sat Jun 15 2024 14:30:05 GMT+0000`.
    #[must_use]
    pub fn to_display_string(&self) -> String {
        let Some(instant) = self.value_of().and_then(DateTime::<Utc>::from_timestamp_millis)
        else {
            return INVALID_DATE.to_string();
        };

        if self.is_utc_mode() {
            return instant.format(DISPLAY_FORMAT).to_string();
        }
        if calendar::wall_clock_in(&Local, &instant).is_none() {
            return INVALID_DATE.to_string();
        }
        let offset = Local.offset_from_utc_datetime(&instant.naive_utc()).fix();
        instant
            .with_timezone(&offset)
            .format(DISPLAY_FORMAT)
            .to_string()
    }
}

impl fmt::Display for Chronos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl Serialize for Chronos {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value_of().and_then(iso_string) {
            Some(iso) => serializer.serialize_str(&iso),
            None => serializer.serialize_none(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Millis(f64),
}

impl<'de> Deserialize<'de> for Chronos {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let input = match Option::<RawDate>::deserialize(deserializer)? {
            Some(RawDate::Text(text)) => parse_instant(&text)
                .map(DateLike::Millis)
                .ok_or_else(|| de::Error::custom(format!("invalid date string {text:?}")))?,
            Some(RawDate::Millis(ms)) => DateLike::from(ms),
            None => DateLike::Invalid,
        };
        Ok(Self::create(input, false))
    }
}
