//! Hashing, salts and base64.

use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

use crate::error::{UtilError, UtilResult};

/// Salt length used when callers have no preference.
pub const DEFAULT_SALT_BYTES: usize = 16;

/// Digest used by [`hash`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha224,
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = UtilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha224" => Ok(Self::Sha224),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(UtilError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// ## Summary
/// Hex SHA-256 of `salt` followed by `data`. An empty salt hashes `data`
/// alone.
#[must_use]
pub fn encrypt_sha256(data: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

/// `bytes` random bytes as lower-case hex (twice as many characters).
#[must_use]
pub fn make_salt(bytes: usize) -> String {
    let mut buf = vec![0_u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

/// Hex digest of `data` with the chosen algorithm.
#[must_use]
pub fn hash(data: &str, algorithm: HashAlgorithm) -> String {
    match algorithm {
        HashAlgorithm::Sha224 => hex::encode(Sha224::digest(data.as_bytes())),
        HashAlgorithm::Sha256 => hex::encode(Sha256::digest(data.as_bytes())),
        HashAlgorithm::Sha384 => hex::encode(Sha384::digest(data.as_bytes())),
        HashAlgorithm::Sha512 => hex::encode(Sha512::digest(data.as_bytes())),
    }
}

/// Standard, padded base64 of the UTF-8 bytes.
#[must_use]
pub fn encode_base64(data: &str) -> String {
    STANDARD.encode(data.as_bytes())
}

/// ## Summary
/// Decodes standard base64 into UTF-8 text.
///
/// ## Errors
/// Returns an error if the input is not valid base64 or the decoded bytes
/// are not UTF-8.
pub fn decode_base64(data: &str) -> UtilResult<String> {
    let bytes = STANDARD.decode(data.trim())?;
    Ok(String::from_utf8(bytes)?)
}
