//! crypto/kdf.rs
//! Batch key derivation from an X25519 shared secret.
//!
//! Design:
//! - HKDF-Extract(salt = sender_pub ‖ receiver_pub, ikm = DH output) -> PRK
//! - HKDF-Expand(PRK, KDF_INFO) -> 32-byte key
//!
//! Both ends build the salt in sender→receiver order, so they agree on the key
//! while a reflected message (roles swapped) derives a different one.

use hkdf::Hkdf;
use sha2::Sha256;
use x25519_dalek::{PublicKey, StaticSecret};

use crate::constants::{KDF_INFO, KEY_LEN_32};
use crate::crypto::types::CryptoError;

pub fn derive_batch_key(
    my_secret: &StaticSecret,
    peer_public: &PublicKey,
    sender_public: &PublicKey,
    receiver_public: &PublicKey,
) -> Result<[u8; KEY_LEN_32], CryptoError> {
    let shared = my_secret.diffie_hellman(peer_public);
    if !shared.was_contributory() {
        return Err(CryptoError::NonContributory);
    }

    let mut salt = [0u8; 2 * KEY_LEN_32];
    salt[..KEY_LEN_32].copy_from_slice(sender_public.as_bytes());
    salt[KEY_LEN_32..].copy_from_slice(receiver_public.as_bytes());

    let hk = Hkdf::<Sha256>::new(Some(&salt), shared.as_bytes());
    let mut key = [0u8; KEY_LEN_32];
    hk.expand(KDF_INFO, &mut key)
        .map_err(|_| CryptoError::Failure("HKDF expand failed (SHA-256)".into()))?;
    Ok(key)
}
