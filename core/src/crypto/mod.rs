//! crypto/mod.rs
//! Sensor ↔ collector public-key encryption.
//!
//! Design notes:
//! - Each side owns one X25519 key pair, persisted as hex text.
//! - Per message: X25519(my_secret, peer_public) → HKDF-SHA256 → 32-byte
//!   key → XChaCha20-Poly1305 with a fresh random 24-byte nonce.
//! - Sealed layout: `[nonce:24][ciphertext ‖ tag:16]`.
//!
//! Industry notes:
//! - Same shape as NaCl `crypto_box`: static-static DH, random extended nonce,
//!   authenticated encryption that fails closed.

pub mod types;
pub mod keys;
pub mod kdf;
pub mod aead;

pub use types::*;
pub use keys::*;
pub use kdf::*;
pub use aead::*;
