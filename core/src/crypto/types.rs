use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug)]
pub enum CryptoError {
    /// Sealed input shorter than nonce + tag.
    TooShort { have: usize, min: usize },
    /// DH produced the all-zero secret (low-order peer key).
    NonContributory,
    /// Tag verification failed; no plaintext is released.
    AuthenticationFailed,
    Failure(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::TooShort { have, min } =>
                write!(f, "sealed message too short: {} < {}", have, min),
            CryptoError::NonContributory =>
                write!(f, "peer public key yields a non-contributory shared secret"),
            CryptoError::AuthenticationFailed =>
                write!(f, "authentication failed"),
            CryptoError::Failure(msg) =>
                write!(f, "crypto failure: {}", msg),
        }
    }
}

impl std::error::Error for CryptoError {}

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("key file {path}: {source}")]
    Io { path: PathBuf, #[source] source: io::Error },
    #[error("key file {path}: not valid hex: {source}")]
    Hex { path: PathBuf, #[source] source: hex::FromHexError },
    #[error("key file {path}: expected {expected} bytes, got {actual}")]
    InvalidLen { path: PathBuf, expected: usize, actual: usize },
}
