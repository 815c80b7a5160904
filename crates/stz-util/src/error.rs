use thiserror::Error;

use stz_core::error::CoreError;

/// Color parsing and conversion errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid hex color: {0:?}")]
    InvalidHex(String),

    #[error("Hex color must be 3 or 6 characters, got {0}")]
    HexLength(usize),

    #[error("Invalid rgb color: {0:?}")]
    InvalidRgb(String),

    #[error("RGB values must be between 0 and 255, got {0}")]
    ChannelOutOfRange(u64),
}

/// Errors from the utility helpers
#[derive(Error, Debug)]
pub enum UtilError {
    #[error(transparent)]
    Color(#[from] ColorError),

    #[error("Invalid base64 input: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Decoded bytes are not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Unknown hash algorithm: {0:?}")]
    UnknownAlgorithm(String),

    #[error("Object does not have property {0:?}")]
    MissingProperty(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type UtilResult<T> = std::result::Result<T, UtilError>;
pub type ColorResult<T> = std::result::Result<T, ColorError>;
