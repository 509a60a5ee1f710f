//! lifecycle/mod.rs
//! One open container per `(ClientID, RecordType)` and a guaranteed close.
//!
//! Design notes:
//! - `HandleRegistry` is an explicit object owned by the collector; there is
//!   no process-wide handle table.
//! - The map lock covers lookup and creation only. Appends take the per-handle
//!   lock, so writes to one container never interleave and different
//!   containers never wait on each other.
//! - `close_all` visits every handle and collects failures.

pub mod types;
pub mod handle;
pub mod registry;

pub use types::*;
pub use handle::*;
pub use registry::*;
