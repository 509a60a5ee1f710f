use thiserror::Error;

use crate::crypto::KeyError;
use crate::framing::FrameError;
use crate::lifecycle::{CloseReport, LifecycleError};
use crate::records::{RecordError, RecordType};
use crate::telemetry::TelemetrySnapshot;
use crate::transport::TransportError;

/// Why a decoded batch was not stored.
#[derive(Debug, Error)]
pub enum DemuxError {
    #[error("{0}")]
    Record(#[from] RecordError),

    #[error("batch carries meta record type {0}")]
    MetaType(RecordType),

    #[error("batch size field {declared} does not match {actual} data bytes")]
    SizeMismatch { declared: i32, actual: usize },

    #[error("batch data is not whole frames: {0}")]
    Frames(#[from] FrameError),

    #[error("{0}")]
    Lifecycle(#[from] LifecycleError),
}

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("keys: {0}")]
    Key(#[from] KeyError),

    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    #[error("output directory: {0}")]
    OutDir(#[from] std::io::Error),
}

/// End-of-run result: telemetry plus the close outcome of every container.
#[derive(Debug)]
pub struct CollectorReport {
    pub telemetry: TelemetrySnapshot,
    pub close: CloseReport,
}
