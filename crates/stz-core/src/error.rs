use thiserror::Error;

/// Errors shared by every `stz` crate.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A setting is present but unusable.
    #[error("Bad configuration: {0}")]
    ConfigError(String),

    #[error("Logging setup failed: {0}")]
    LoggingError(String),

    /// An argument outside the range an operation accepts.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
