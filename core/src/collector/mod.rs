//! collector/mod.rs
//! Routes decoded batches to per-`(ClientID, RecordType)` containers.
//!
//! Design notes:
//! - `Demultiplexer` is the receive workers' `BatchHandler`: check the batch,
//!   resolve the handle, append `Batch.data` verbatim.
//! - `Collector` ties receiver, demultiplexer and shutdown together.

pub mod types;
pub mod demux;
pub mod server;

pub use types::*;
pub use demux::*;
pub use server::*;
