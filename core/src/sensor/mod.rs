//! sensor/mod.rs
//! Per-record-type batching of framed chunks into size-bounded batches.
//!
//! Design notes:
//! - One worker thread per record type, fed by the channel side of an
//!   `AuditRecordWriter` (size token, then payload, per record).
//! - A frame is never split: when it does not fit, the current batch is
//!   flushed and the frame seeds the next one.
//! - Workers share only the `BatchSink`.
//! - `forward_container` replays a container file through the same path.

pub mod types;
pub mod batcher;
pub mod worker;
pub mod forward;

pub use types::*;
pub use batcher::*;
pub use worker::*;
pub use forward::*;
