use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::constants::MAX_CLIENT_ID_LEN;
use crate::container::{ContainerError, WriterSummary};
use crate::records::RecordType;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("invalid client id {0:?}")]
    InvalidClientId(String),

    #[error("cannot use record type {0} as a container")]
    MetaRecordType(RecordType),

    #[error("create directory {path}: {source}")]
    CreateDir { path: PathBuf, #[source] source: std::io::Error },

    #[error("container {key}: {source}")]
    Container { key: StreamKey, #[source] source: ContainerError },

    #[error("handle {0} already closed")]
    HandleClosed(StreamKey),

    #[error("registry closed")]
    RegistryClosed,
}

/// Identity of one collector-side container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamKey {
    pub client_id: String,
    pub record_type: RecordType,
}

impl StreamKey {
    pub fn new(client_id: impl Into<String>, record_type: RecordType) -> Self {
        Self { client_id: client_id.into(), record_type }
    }
}

impl fmt::Display for StreamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.client_id, self.record_type)
    }
}

/// Aggregate outcome of `close_all`.
#[derive(Debug, Default)]
pub struct CloseReport {
    pub closed: Vec<(StreamKey, WriterSummary)>,
    pub failed: Vec<(StreamKey, LifecycleError)>,
}

impl CloseReport {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn records(&self) -> u64 {
        self.closed.iter().map(|(_, s)| s.records).sum()
    }
}

impl fmt::Display for CloseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "closed {} containers ({} records), {} failures",
            self.closed.len(),
            self.records(),
            self.failed.len()
        )
    }
}

/// A ClientID becomes a directory name; reject anything that could escape
/// the output directory.
pub fn validate_client_id(id: &str) -> Result<(), LifecycleError> {
    let bad = id.is_empty()
        || id.len() > MAX_CLIENT_ID_LEN
        || id == "."
        || id == ".."
        || id.chars().any(|c| c == '/' || c == '\\' || c == '\0' || c.is_control());
    if bad {
        return Err(LifecycleError::InvalidClientId(id.to_string()));
    }
    Ok(())
}
