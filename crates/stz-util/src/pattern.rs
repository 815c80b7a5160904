//! Lazily compiled regular expressions.

use std::sync::LazyLock;

use regex_lite::Regex;

/// A pattern compiled on first use. A pattern that fails to compile matches
/// nothing.
pub(crate) type Pattern = LazyLock<Option<Regex>>;

pub(crate) fn compile(source: &str) -> Option<Regex> {
    Regex::new(source)
        .inspect_err(|e| tracing::error!(source, error = %e, "Invalid built-in pattern"))
        .ok()
}

pub(crate) fn is_match(pattern: &Pattern, text: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(text))
}
