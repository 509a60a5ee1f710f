//! crypto/aead.rs
//! Public-key seal/open over XChaCha20-Poly1305.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;
use x25519_dalek::PublicKey;

use crate::constants::{NONCE_LEN_24, TAG_LEN_16};
use crate::crypto::kdf::derive_batch_key;
use crate::crypto::keys::KeyPair;
use crate::crypto::types::CryptoError;

/// Smallest sealed message: nonce + tag around an empty plaintext.
pub const SEAL_OVERHEAD: usize = NONCE_LEN_24 + TAG_LEN_16;

fn cipher(key: &[u8]) -> Result<XChaCha20Poly1305, CryptoError> {
    XChaCha20Poly1305::new_from_slice(key)
        .map_err(|_| CryptoError::Failure("invalid key length".into()))
}

/// Encrypt `msg` from `me` to the holder of `peer_public`.
pub fn asymmetric_encrypt(msg: &[u8], peer_public: &PublicKey, me: &KeyPair) -> Result<Vec<u8>, CryptoError> {
    let key = derive_batch_key(me.secret(), peer_public, me.public(), peer_public)?;

    let mut nonce = [0u8; NONCE_LEN_24];
    OsRng.fill_bytes(&mut nonce);

    let ct = cipher(&key)?
        .encrypt(XNonce::from_slice(&nonce), msg)
        .map_err(|_| CryptoError::Failure("encryption failed".into()))?;

    let mut out = Vec::with_capacity(NONCE_LEN_24 + ct.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ct);
    Ok(out)
}

/// Decrypt a message sealed by the holder of `peer_public` for `me`.
pub fn asymmetric_decrypt(sealed: &[u8], peer_public: &PublicKey, me: &KeyPair) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < SEAL_OVERHEAD {
        return Err(CryptoError::TooShort { have: sealed.len(), min: SEAL_OVERHEAD });
    }
    let key = derive_batch_key(me.secret(), peer_public, peer_public, me.public())?;

    let (nonce, ct) = sealed.split_at(NONCE_LEN_24);
    cipher(&key)?
        .decrypt(XNonce::from_slice(nonce), ct)
        .map_err(|_| CryptoError::AuthenticationFailed)
}
