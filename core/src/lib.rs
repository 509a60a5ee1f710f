//! netcap-core
//!
//! Audit-record containers and the sensor → collector transport.
//! No network stack beyond std UDP, no async runtime.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;

// Format
pub mod records;
pub mod framing;
pub mod compression;
pub mod crypto;
pub mod container;
pub mod telemetry;

// Collector / sensor layers
pub mod lifecycle;
pub mod sensor;
pub mod transport;
pub mod collector;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::collector::{Collector, Demultiplexer};
    pub use crate::config::{CollectorConfig, SensorConfig};
    pub use crate::container::{count_records, AuditRecordWriter, ContainerReader, WriterConfig};
    pub use crate::crypto::KeyPair;
    pub use crate::lifecycle::{HandleOptions, HandleRegistry, StreamKey};
    pub use crate::records::{Batch, Header, RecordType};
    pub use crate::sensor::{spawn_batchers, BatchSink, BatcherConfig, BatcherInput};
    pub use crate::transport::{TransportReceiver, TransportSender};
    pub use crate::types::{NetcapError, Result};
}
