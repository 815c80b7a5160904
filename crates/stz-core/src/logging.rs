//! Global `tracing` subscriber setup.

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;
use crate::error::{CoreError, CoreResult};

/// ## Summary
/// Builds the level filter for the given configuration. `RUST_LOG` wins over
/// the configured level when it is set and valid.
///
/// ## Errors
/// Returns an error if the configured level is not a valid filter directive.
pub fn env_filter(config: &LoggingConfig) -> CoreResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.level).map_err(|e| {
        CoreError::LoggingError(format!("invalid log level {:?}: {e}", config.level))
    })
}

/// ## Summary
/// Installs a formatted `tracing` subscriber as the global default.
///
/// ## Errors
/// Returns an error if the level is invalid or a global subscriber is
/// already installed.
pub fn init_logging(config: &LoggingConfig) -> CoreResult<()> {
    let filter = env_filter(config)?;

    fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| CoreError::LoggingError(e.to_string()))?;

    tracing::debug!(level = %config.level, "Logging initialized");
    Ok(())
}
