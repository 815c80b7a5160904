/// Name constants shared across crates
pub const LIB_NAME: &str = "stz";

pub const FETCH_COMPONENT: &str = "fetch";
pub const DEFAULT_USER_AGENT: &str = const_str::concat!(LIB_NAME, "-", FETCH_COMPONENT);

/// Prefix for environment variables read by [`crate::config::Settings::load`].
pub const ENV_PREFIX: &str = "STZ";

/// Optional TOML file read by [`crate::config::Settings::load`].
pub const CONFIG_FILE: &str = const_str::concat!(LIB_NAME, ".toml");

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 30_000;

/// Sentinel text produced by formatting an invalid date.
pub const INVALID_DATE: &str = "Invalid Date";
