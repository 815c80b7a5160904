//! Input validation for sign-up style forms.
//!
//! Phone number and nickname rules follow Korean conventions: mobile
//! prefixes `010`/`011`/`016`–`019`, Seoul `02`, and Hangul syllables in
//! nicknames.

use std::sync::LazyLock;

use stz_chronos::Chronos;

use crate::pattern::{Pattern, compile, is_match};

static URL: Pattern =
    LazyLock::new(|| compile(r"(?i)^(https?://)?([\w-]+(\.[\w-]+)+)(:\d+)?(/[^\s]*)?$"));
static EMAIL: Pattern = LazyLock::new(|| compile(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));
static PASSWORD_CHARS: Pattern =
    LazyLock::new(|| compile(r#"^[a-zA-Z0-9!@#$%^&*(),.?":{}|<>]+$"#));
static USER_ID: Pattern = LazyLock::new(|| compile("^[a-zA-Z0-9_]+$"));
static NICKNAME: Pattern = LazyLock::new(|| compile("^[a-zA-Z0-9가-힣_]+$"));
static PHONE: Pattern =
    LazyLock::new(|| compile("^(01[016789]|02|0[3-9][0-9])[0-9]{7,8}$"));
static BIRTH_DATE: Pattern = LazyLock::new(|| {
    compile(r"^(19|20)\d{2}(0[1-9]|1[0-2])(0[1-9]|[12]\d|3[01])$")
});

const PASSWORD_SPECIALS: &str = r#"!@#$%^&*(),.?":{}|<>"#;

const DISPOSABLE_DOMAINS: [&str; 9] = [
    "10minutemail.com",
    "dispostable.com",
    "guerrillamail.com",
    "maildrop.cc",
    "mailinator.com",
    "temp-mail.org",
    "tempmail.com",
    "trashmail.com",
    "yopmail.com",
];

const BANNED_LOGIN_WORDS: [&str; 11] = [
    "admin",
    "administrator",
    "guest",
    "manager",
    "master",
    "operator",
    "root",
    "staff",
    "support",
    "system",
    "test",
];

/// Strictness of [`is_strong_password`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordLevel {
    /// Same rules as [`is_valid_password`].
    #[default]
    Normal,
    /// 10 to 20 characters with lower case, upper case, digit and symbol.
    Strict,
}

/// An optional `http(s)://` scheme, a dotted host, an optional port and
/// path. Scheme-less input is checked as if it were `https`.
#[must_use]
pub fn is_url(value: &str) -> bool {
    if !is_match(&URL, value) {
        return false;
    }
    let candidate = if value.starts_with("http") {
        value.to_string()
    } else {
        format!("https://{value}")
    };
    url::Url::parse(&candidate).is_ok_and(|url| url.host_str().is_some_and(|host| !host.is_empty()))
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    is_match(&EMAIL, email.trim())
}

fn is_password_special(c: char) -> bool {
    PASSWORD_SPECIALS.contains(c)
}

fn password_shape(password: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&password.chars().count()) && is_match(&PASSWORD_CHARS, password)
}

/// ## Summary
/// 8 to 20 characters from letters, digits and `!@#$%^&*(),.?":{}|<>`, with
/// at least one letter, one digit and one symbol.
#[must_use]
pub fn is_valid_password(password: &str) -> bool {
    password_shape(password, 8, 20)
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(is_password_special)
}

/// Checks the trimmed password against the rules of `level`.
#[must_use]
pub fn is_strong_password(password: &str, level: PasswordLevel) -> bool {
    let value = password.trim();
    match level {
        PasswordLevel::Normal => is_valid_password(value),
        PasswordLevel::Strict => {
            password_shape(value, 10, 20)
                && value.chars().any(|c| c.is_ascii_lowercase())
                && value.chars().any(|c| c.is_ascii_uppercase())
                && value.chars().any(|c| c.is_ascii_digit())
                && value.chars().any(is_password_special)
        }
    }
}

/// Whether a valid address belongs to a known throwaway mail provider or
/// one of its subdomains.
#[must_use]
pub fn is_disposable_email(email: &str) -> bool {
    if !is_valid_email(email) {
        return false;
    }
    let lower = email.trim().to_lowercase();
    let Some((_, domain)) = lower.split_once('@') else {
        return false;
    };
    DISPOSABLE_DOMAINS.iter().any(|disposable| {
        domain == *disposable
            || domain
                .strip_suffix(disposable)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// `min..=max` characters (after trimming) of ASCII letters, digits and `_`.
#[must_use]
pub fn is_valid_user_id(user_id: &str, min: usize, max: usize) -> bool {
    let value = user_id.trim();
    (min..=max).contains(&value.chars().count()) && is_match(&USER_ID, value)
}

fn has_repeated_run(text: &str, run: usize) -> bool {
    let chars: Vec<char> = text.chars().collect();
    chars.windows(run).any(|w| w.iter().all(|c| *c == w[0]))
}

fn has_sequential_run(text: &str, run: usize) -> bool {
    let codes: Vec<i64> = text.chars().map(|c| i64::from(u32::from(c))).collect();
    codes.windows(run).any(|w| {
        let ascending = w.windows(2).all(|pair| pair[1] - pair[0] == 1);
        let descending = w.windows(2).all(|pair| pair[1] - pair[0] == -1);
        ascending || descending
    })
}

/// ## Summary
/// A user id (4 to 20 characters) that is also acceptable as a login name.
///
/// Rejects ids containing reserved words such as `admin` or `test`, ids of
/// only digits, four identical characters in a row, and four ascending or
/// descending characters in a row (`abcd`, `4321`).
#[must_use]
pub fn is_allowed_login_id(login_id: &str) -> bool {
    if !is_valid_user_id(login_id, 4, 20) {
        return false;
    }
    let value = login_id.trim().to_lowercase();

    if BANNED_LOGIN_WORDS.iter().any(|word| value.contains(word)) {
        tracing::debug!(login_id = %value, "Login id contains a reserved word");
        return false;
    }
    if value.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    !has_repeated_run(&value, 4) && !has_sequential_run(&value, 4)
}

/// `min..=max` characters (after trimming) of letters, Hangul syllables,
/// digits and `_`.
#[must_use]
pub fn is_valid_nickname(nickname: &str, min: usize, max: usize) -> bool {
    let value = nickname.trim();
    (min..=max).contains(&value.chars().count()) && is_match(&NICKNAME, value)
}

/// A Korean mobile or landline number; spaces and dashes are ignored.
#[must_use]
pub fn is_valid_phone_number(phone: &str) -> bool {
    let normalized: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    is_match(&PHONE, &normalized)
}

/// Exactly `len` ASCII digits after trimming.
#[must_use]
pub fn is_valid_verification_code(code: &str, len: usize) -> bool {
    let value = code.trim();
    len > 0 && value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

#[must_use]
pub fn is_password_confirmed(password: &str, confirmation: &str) -> bool {
    password == confirmation
}

/// Year, month and day of a `YYYYMMDD` or `YYYY-MM-DD` birth date.
fn birth_date_parts(birth_date: &str) -> Option<(i32, u32, u32)> {
    let normalized = birth_date.replace('-', "");
    let normalized = normalized.trim();
    if !is_match(&BIRTH_DATE, normalized) {
        return None;
    }

    let year = normalized.get(0..4)?.parse().ok()?;
    let month = normalized.get(4..6)?.parse().ok()?;
    let day = normalized.get(6..8)?.parse().ok()?;

    let calendar_date = stz_chronos::utc(format!("{year:04}-{month:02}-{day:02}"));
    calendar_date.is_valid().then_some((year, month, day))
}

/// ## Summary
/// A real calendar date between 1900 and 2099 written as `YYYYMMDD` or
/// `YYYY-MM-DD`.
#[must_use]
pub fn is_valid_birth_date(birth_date: &str) -> bool {
    birth_date_parts(birth_date).is_some()
}

/// ## Summary
/// Whether someone born on `birth_date` is at least `adult_age` years old
/// on `reference`, read in the reference value's own mode.
///
/// Invalid birth dates and invalid references are never adult.
///
/// ```
/// use stz_chronos::utc;
/// use stz_util::validate::is_adult;
///
/// let reference = utc("2024-06-15");
/// assert!(is_adult("2005-06-15", 19, &reference));
/// assert!(!is_adult("2005-06-16", 19, &reference));
/// ```
#[must_use]
pub fn is_adult(birth_date: &str, adult_age: u32, reference: &Chronos) -> bool {
    let Some((year, month, day)) = birth_date_parts(birth_date) else {
        return false;
    };
    let (Some(ref_year), Some(ref_month), Some(ref_day)) =
        (reference.year(), reference.month(), reference.date())
    else {
        return false;
    };

    let birthday_passed = (ref_month + 1, ref_day) >= (month, day);
    let mut age = i64::from(ref_year) - i64::from(year);
    if !birthday_passed {
        age -= 1;
    }
    age >= i64::from(adult_age)
}

/// A valid birth date that is not adult on `reference`.
#[must_use]
pub fn is_minor(birth_date: &str, adult_age: u32, reference: &Chronos) -> bool {
    is_valid_birth_date(birth_date)
        && reference.is_valid()
        && !is_adult(birth_date, adult_age, reference)
}
