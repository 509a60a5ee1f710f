use thiserror::Error;

use crate::collector::{CollectorError, DemuxError};
use crate::compression::CompressionError;
use crate::config::ConfigError;
use crate::container::ContainerError;
use crate::crypto::{CryptoError, KeyError};
use crate::framing::FrameError;
use crate::lifecycle::LifecycleError;
use crate::records::RecordError;
use crate::transport::TransportError;

/// Unified error covering every layer.
/// - `From<T>` impls enable `?` across layers.
#[derive(Debug, Error)]
pub enum NetcapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("record error: {0}")]
    Record(#[from] RecordError),

    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("key error: {0}")]
    Key(#[from] KeyError),

    #[error("container error: {0}")]
    Container(#[from] ContainerError),

    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("demux error: {0}")]
    Demux(#[from] DemuxError),

    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

pub type Result<T> = std::result::Result<T, NetcapError>;
