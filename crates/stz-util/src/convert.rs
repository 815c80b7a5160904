//! Lenient conversions between dynamic values, numbers and text.

use rand::Rng;
use serde_json::Value;
use stz_core::error::CoreError;

use crate::error::UtilResult;

const TRUTHY_WORDS: [&str; 5] = ["true", "yes", "1", "on", "y"];

/// Length of the longest prefix of `text` that reads as a decimal number,
/// optionally with a fraction and an exponent.
fn numeric_prefix_len(text: &str, allow_fraction: bool) -> usize {
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut has_digits = end > int_start;

    if allow_fraction {
        if bytes.get(end) == Some(&b'.') {
            let frac_start = end + 1;
            let mut frac_end = frac_start;
            while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
                frac_end += 1;
            }
            if has_digits || frac_end > frac_start {
                end = frac_end;
                has_digits = true;
            }
        }

        if has_digits && matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp_end = end + 1;
            if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
                exp_end += 1;
            }
            let digits_start = exp_end;
            while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
                exp_end += 1;
            }
            if exp_end > digits_start {
                end = exp_end;
            }
        }
    }

    if has_digits { end } else { 0 }
}

/// Reads the leading integer of `text`, ignoring anything after it.
fn parse_int_prefix(text: &str) -> Option<i64> {
    let text = text.trim();
    let len = numeric_prefix_len(text, false);
    text.get(..len)?.parse().ok()
}

fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim();
    let len = numeric_prefix_len(text, true);
    text.get(..len)?.parse().ok()
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "float to int casts saturate, which is the wanted clamp"
)]
fn floor_to_i64(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.floor() as i64)
}

/// ## Summary
/// Converts a dynamic value to an integer.
///
/// Numbers are floored; strings contribute their leading integer
/// (`"42px"` is 42). Everything else, and unparseable text, yields `default`.
#[must_use]
pub fn to_int(value: &Value, default: i64) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(floor_to_i64))
            .unwrap_or(default),
        Value::String(s) => parse_int_prefix(s).unwrap_or(default),
        _ => default,
    }
}

/// Like [`to_int`], except `null`, `""` and the text `"null"` count as zero
/// rather than falling back to `default`.
#[must_use]
pub fn zero_convert(value: &Value, default: i64) -> i64 {
    match value {
        Value::Null => 0,
        Value::String(s) if s.is_empty() || s == "null" => 0,
        other => to_int(other, default),
    }
}

/// Like [`to_int`] but keeps fractions; strings contribute their leading
/// decimal number (`"3.5kg"` is 3.5).
#[must_use]
pub fn to_float(value: &Value, default: f64) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(default),
        Value::String(s) => parse_float_prefix(s).unwrap_or(default),
        _ => default,
    }
}

/// ## Summary
/// Interprets a dynamic value as a flag.
///
/// Strings are true when they are one of `true`, `yes`, `1`, `on`, `y`
/// (trimmed, any case). Numbers are true when non-zero. Arrays and objects
/// are always true, `null` is false.
#[must_use]
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::String(s) => {
            let lower = s.trim().to_lowercase();
            TRUTHY_WORDS.contains(&lower.as_str())
        }
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text form of a value: strings as they are, `null` as `""`, arrays and
/// objects as compact JSON.
#[must_use]
pub fn to_display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// ## Summary
/// Inserts thousands separators into a decimal number.
///
/// A leading sign and the fraction are kept; existing commas are
/// normalized. Text that is not a plain decimal number is returned trimmed
/// but otherwise unchanged.
///
/// ```
/// use stz_util::convert::add_comma;
///
/// assert_eq!(add_comma("-1234567.891"), "-1,234,567.891");
/// assert_eq!(add_comma("12ab"), "12ab");
/// ```
#[must_use]
pub fn add_comma(value: &str) -> String {
    let input = value.trim();

    let (sign, unsigned) = match input.as_bytes().first() {
        Some(b'-' | b'+') => input.split_at(1),
        _ => ("", input),
    };
    let normalized = unsigned.replace(',', "");

    let (integer, fraction) = match normalized.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (normalized.as_str(), None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(integer) || fraction.is_some_and(|f| !all_digits(f)) {
        return input.to_string();
    }

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Restricts `value` to `min..=max`.
#[must_use]
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// ## Summary
/// A uniformly random integer in `min..=max`.
///
/// ## Errors
/// Returns an error if `min` is greater than `max`.
pub fn random_int(min: i64, max: i64) -> UtilResult<i64> {
    if min > max {
        return Err(CoreError::InvalidInput(format!("empty range {min}..={max}")).into());
    }
    Ok(rand::thread_rng().gen_range(min..=max))
}
