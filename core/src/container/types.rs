use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::framing::FrameError;
use crate::records::RecordError;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("record decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("record type error: {0}")]
    Record(#[from] RecordError),

    #[error("invalid writer configuration: {0}")]
    Config(&'static str),

    #[error("header already written")]
    HeaderAlreadyWritten,

    #[error("header must be written before records")]
    HeaderNotWritten,

    #[error("header must be read before records")]
    HeaderNotRead,

    #[error("invalid netcap header in file {path}: {reason}")]
    InvalidHeader { path: PathBuf, reason: String },

    #[error("raw appends require a file sink")]
    NotAFileSink,

    #[error("chunk channel closed")]
    ChannelClosed,
}

/// Result of closing a writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterSummary {
    pub name: String,
    /// `None` for channel writers.
    pub path: Option<PathBuf>,
    pub records: u64,
    /// Bytes handed to the sink before compression.
    pub bytes: u64,
    /// File deleted on close because it held no records.
    pub removed: bool,
}
