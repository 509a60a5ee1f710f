//! container/mod.rs
//! On-disk audit-record containers.
//!
//! Layout:
//! ```text
//! [ frame: Header ][ frame: record ][ frame: record ] ...
//! ```
//! optionally wrapped in one gzip stream (`.ncap.gz`).
//!
//! Design notes:
//! - Writer stack is `frames → gzip → buffer → file`; closing unwinds it in
//!   that order and syncs the file last.
//! - A writer feeds exactly one sink: a file, or a channel of
//!   `(size token, payload)` chunks for the sensor batcher.
//! - Readers pick decompression from the file extension.

pub mod types;
pub mod sink;
pub mod writer;
pub mod reader;

pub use types::*;
pub use sink::*;
pub use writer::*;
pub use reader::*;
