//! records/mod.rs
//! Record type tags and the two protobuf messages the core understands.
//!
//! Design notes:
//! - Audit records themselves are opaque bytes; only `Header` and `Batch`
//!   are decoded here.
//! - `RecordType` is a closed enumeration; unknown tags are rejected at the
//!   boundary instead of being carried around as raw integers.

pub mod types;
pub mod messages;

pub use types::*;
pub use messages::*;
