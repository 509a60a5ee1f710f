//! compression/mod.rs
//! Whole-buffer gzip used for batches on the wire.
//!
//! Industry notes:
//! - Containers stream through `flate2::write::GzEncoder` directly (see
//!   `container::sink`); this module covers the one-shot case where a whole
//!   batch is compressed before encryption.
//! - Decompression is capped so a hostile peer cannot inflate a 64 KiB
//!   datagram into gigabytes.

pub mod types;
pub mod gzip;

pub use types::*;
pub use gzip::*;
