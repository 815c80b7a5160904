use anyhow::Result;
use config::{Config, ConfigBuilder, builder::DefaultState};
use serde::Deserialize;

use crate::constants::{
    CONFIG_FILE, DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_LOG_LEVEL, DEFAULT_USER_AGENT, ENV_PREFIX,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Default per-request timeout. `0` disables the timeout.
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl HttpConfig {
    /// ## Summary
    /// Returns the configured timeout, or `None` when timeouts are disabled.
    #[must_use]
    pub fn timeout(&self) -> Option<std::time::Duration> {
        (self.timeout_ms > 0).then(|| std::time::Duration::from_millis(self.timeout_ms))
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `stz.toml`.
    /// Environment variables (`STZ_LOGGING__LEVEL`, `STZ_HTTP__TIMEOUT_MS`, ...)
    /// take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Self::builder()?
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Builds settings from TOML text layered over the defaults.
    ///
    /// ## Errors
    /// Returns an error if the text is not valid TOML or has mistyped values.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Ok(Self::builder()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?)
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .set_default("http.timeout_ms", DEFAULT_HTTP_TIMEOUT_MS)?
            .set_default("http.user_agent", DEFAULT_USER_AGENT)?)
    }
}

/// ## Summary
/// Reads a `.env` file into the process environment when one exists, then
/// calls [`Settings::load`].
///
/// ## Errors
/// Propagates any error from [`Settings::load`].
pub fn load_config() -> Result<Settings> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::trace!("No .env file loaded: {e}");
    }
    Settings::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        let settings = Settings::from_toml_str("").expect("empty TOML should load");

        assert_eq!(settings.logging.level, DEFAULT_LOG_LEVEL);
        assert_eq!(settings.http.timeout_ms, DEFAULT_HTTP_TIMEOUT_MS);
        assert_eq!(settings.http.user_agent, "stz-fetch");
    }

    #[test_log::test]
    fn test_toml_overrides_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [logging]
            level = "debug"

            [http]
            timeout_ms = 1500
            "#,
        )
        .expect("valid TOML should load");

        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.http.timeout_ms, 1500);
        assert_eq!(settings.http.user_agent, DEFAULT_USER_AGENT);
    }

    #[test_log::test]
    fn test_mistyped_value_is_an_error() {
        let result = Settings::from_toml_str("[http]\ntimeout_ms = \"soon\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config = HttpConfig {
            timeout_ms: 0,
            user_agent: "agent".to_string(),
        };
        assert!(config.timeout().is_none());

        let config = HttpConfig::default();
        assert_eq!(
            config.timeout(),
            Some(std::time::Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS))
        );
    }

    #[test]
    fn test_default_matches_loaded_defaults() {
        let loaded = Settings::from_toml_str("").expect("empty TOML should load");
        let default = Settings::default();

        assert_eq!(loaded.logging.level, default.logging.level);
        assert_eq!(loaded.http.timeout_ms, default.http.timeout_ms);
        assert_eq!(loaded.http.user_agent, default.http.user_agent);
    }
}
