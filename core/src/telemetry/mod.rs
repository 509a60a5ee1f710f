//! telemetry/mod.rs
//! Transport counters and end-of-run snapshots.
//!
//! Design notes:
//! - Each worker owns a plain `TransportCounters`; totals are merged after
//!   join, so the hot path has no shared atomics.
//! - `TelemetrySnapshot` is the serialisable view logged at shutdown.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
