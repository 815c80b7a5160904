use thiserror::Error;

/// Errors from parsing calendar parameters.
///
/// Calendar values themselves never error: unparseable dates become invalid
/// values instead (see [`crate::Chronos::is_valid`]).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChronosError {
    #[error("Invalid unit: {0:?}")]
    InvalidUnit(String),

    #[error("Invalid inclusivity {0:?}, expected one of \"()\", \"[]\", \"[)\", \"(]\"")]
    InvalidInclusivity(String),
}

pub type ChronosResult<T> = std::result::Result<T, ChronosError>;
