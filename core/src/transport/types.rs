use std::io;

use thiserror::Error;

use crate::compression::CompressionError;
use crate::crypto::CryptoError;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("decompress: {0}")]
    Compression(#[from] CompressionError),

    #[error("decrypt: {0}")]
    Crypto(#[from] CryptoError),

    #[error("unmarshal: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("datagram too short: {have} bytes")]
    DatagramTooShort { have: usize },

    #[error("datagram of {len} bytes exceeds UDP payload limit {max}")]
    DatagramTooLarge { len: usize, max: usize },

    #[error("invalid address {addr:?}: {reason}")]
    Address { addr: String, reason: String },
}
