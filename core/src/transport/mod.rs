//! transport/mod.rs
//! Encrypted batches over UDP.
//!
//! Datagram layout:
//! ```text
//! ┌────────────────────────┬──────────────────────────────────────────┐
//! │ sender X25519 pub (32) │ nonce (24) ‖ XChaCha20-Poly1305(gzip(B)) │
//! └────────────────────────┴──────────────────────────────────────────┘
//! ```
//! where `B` is the protobuf-encoded `Batch`.
//!
//! Design notes:
//! - Fire-and-forget: no acknowledgment, retry or fragmentation.
//! - The receive loop only reads and enqueues; a fixed pool of workers
//!   decrypts, decompresses, decodes and hands the batch on.
//! - A failing datagram is logged and dropped at the worker.

pub mod types;
pub mod codec;
pub mod sender;
pub mod receiver;

pub use types::*;
pub use codec::*;
pub use sender::*;
pub use receiver::*;
