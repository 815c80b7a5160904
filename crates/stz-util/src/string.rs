//! String helpers: truncation, case conversion and masking.
//!
//! Lengths and positions count `char`s, so multi-byte text is never split
//! inside a character.

use std::sync::LazyLock;

use crate::pattern::{Pattern, compile};

static KEBAB_BOUNDARY: Pattern = LazyLock::new(|| compile("([a-z])([A-Z])"));
static KEBAB_SEPARATORS: Pattern = LazyLock::new(|| compile(r"[\s_]+"));

/// Default character used by the masking helpers.
pub const MASK_CHAR: char = '*';

/// ## Summary
/// Shortens `text` to at most `len` characters, ending with `ellipsis` when
/// anything was cut.
///
/// ```
/// use stz_util::string::truncate;
///
/// assert_eq!(truncate("Hello, world", 8, "..."), "Hello...");
/// assert_eq!(truncate("Hi", 8, "..."), "Hi");
/// ```
#[must_use]
pub fn truncate(text: &str, len: usize, ellipsis: &str) -> String {
    if text.chars().count() <= len {
        return text.to_string();
    }
    let keep = len.saturating_sub(ellipsis.chars().count());
    text.chars().take(keep).chain(ellipsis.chars()).collect()
}

/// First character upper-cased, the rest lower-cased.
#[must_use]
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

/// `userName` to `user_name`.
#[must_use]
pub fn to_snake_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    match out.strip_prefix('_') {
        Some(rest) => rest.to_string(),
        None => out,
    }
}

/// `user_name` to `userName`. Only underscores followed by a lower-case
/// ASCII letter are folded.
#[must_use]
pub fn to_camel_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(next) if c == '_' && next.is_ascii_lowercase() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// `userName`, `user_name` and `user name` to `user-name`.
#[must_use]
pub fn to_kebab_case(text: &str) -> String {
    let (Some(boundary), Some(separators)) = (KEBAB_BOUNDARY.as_ref(), KEBAB_SEPARATORS.as_ref())
    else {
        return text.to_lowercase();
    };
    let split = boundary.replace_all(text, "$1-$2");
    separators.replace_all(&split, "-").to_lowercase()
}

/// ## Summary
/// Replaces the characters in `start..end` with `mask_char`.
///
/// `end` defaults to the end of the text; both bounds are clamped to it.
///
/// ```
/// use stz_util::string::{MASK_CHAR, mask};
///
/// assert_eq!(mask("1234567890", 2, Some(6), MASK_CHAR), "12****7890");
/// assert_eq!(mask("secret", 3, None, '#'), "sec###");
/// ```
#[must_use]
pub fn mask(text: &str, start: usize, end: Option<usize>, mask_char: char) -> String {
    let len = text.chars().count();
    let start = start.min(len);
    let end = end.unwrap_or(len).clamp(start, len);

    text.chars()
        .enumerate()
        .map(|(i, c)| if (start..end).contains(&i) { mask_char } else { c })
        .collect()
}

/// ## Summary
/// Masks the local part of an e-mail address after its first `visible`
/// characters. Local parts no longer than `visible` keep only their first
/// character. Text without `@` is returned unchanged.
#[must_use]
pub fn mask_email(email: &str, visible: usize, mask_char: char) -> String {
    let Some((local, domain)) = email.split_once('@') else {
        return email.to_string();
    };
    let domain = domain.split('@').next().unwrap_or_default();

    let keep = if local.chars().count() <= visible {
        1
    } else {
        visible
    };
    format!("{}@{domain}", mask(local, keep, None, mask_char))
}

/// Replaces every digit with `mask_char`, keeping separators.
#[must_use]
pub fn mask_phone_number(phone: &str, mask_char: char) -> String {
    phone
        .chars()
        .map(|c| if c.is_ascii_digit() { mask_char } else { c })
        .collect()
}

/// One `mask_char` per character.
#[must_use]
pub fn mask_password(password: &str, mask_char: char) -> String {
    std::iter::repeat_n(mask_char, password.chars().count()).collect()
}

#[must_use]
pub fn remove_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[must_use]
pub fn has_upper_case(text: &str) -> bool {
    text != text.to_lowercase()
}
