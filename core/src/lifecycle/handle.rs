use std::fs;
use std::path::{Path, PathBuf};

use crate::container::{AuditRecordWriter, WriterConfig, WriterSummary};
use crate::lifecycle::types::{validate_client_id, LifecycleError, StreamKey};

/// Options shared by every handle a registry opens.
#[derive(Debug, Clone)]
pub struct HandleOptions {
    pub out_dir: PathBuf,
    pub buffer: bool,
    pub compress: bool,
    pub buffer_size: usize,
}

/// Collector-side open container for one stream key.
pub struct AuditRecordHandle {
    key: StreamKey,
    writer: Option<AuditRecordWriter>,
}

impl AuditRecordHandle {
    /// Create `<out_dir>/<ClientID>/<Type>.ncap[.gz]` and write its header.
    pub fn create(key: StreamKey, opts: &HandleOptions, contains_payloads: bool) -> Result<Self, LifecycleError> {
        validate_client_id(&key.client_id)?;
        if key.record_type.is_meta() {
            return Err(LifecycleError::MetaRecordType(key.record_type));
        }

        let dir = opts.out_dir.join(&key.client_id);
        create_client_dir(&dir)?;

        let cfg = WriterConfig {
            name: key.record_type.name().to_string(),
            buffer: opts.buffer,
            compress: opts.compress,
            out_dir: dir,
            as_channel: false,
            buffer_size: opts.buffer_size,
            source: key.client_id.clone(),
            contains_payloads,
            ..WriterConfig::default()
        };
        let wrap = |source| LifecycleError::Container { key: key.clone(), source };
        let mut writer = AuditRecordWriter::new(cfg).map_err(wrap)?;
        writer.write_header(key.record_type).map_err(wrap)?;

        Ok(Self { key, writer: Some(writer) })
    }

    pub fn key(&self) -> &StreamKey {
        &self.key
    }

    pub fn path(&self) -> Option<&Path> {
        self.writer.as_ref().and_then(|w| w.path())
    }

    /// Append already-framed bytes holding `frames` records.
    pub fn append(&mut self, data: &[u8], frames: u64) -> Result<(), LifecycleError> {
        let writer = self.writer.as_mut().ok_or_else(|| LifecycleError::HandleClosed(self.key.clone()))?;
        writer
            .write_raw(data, frames)
            .map_err(|source| LifecycleError::Container { key: self.key.clone(), source })
    }

    pub fn flush(&mut self) -> Result<(), LifecycleError> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        writer.flush().map_err(|source| LifecycleError::Container { key: self.key.clone(), source })
    }

    /// Unwind the writer stack. A second call reports the handle as closed.
    pub fn close(&mut self) -> Result<WriterSummary, LifecycleError> {
        let writer = self.writer.take().ok_or_else(|| LifecycleError::HandleClosed(self.key.clone()))?;
        writer.close().map_err(|source| LifecycleError::Container { key: self.key.clone(), source })
    }
}

#[cfg(unix)]
fn create_client_dir(dir: &Path) -> Result<(), LifecycleError> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new()
        .recursive(true)
        .mode(crate::constants::permissions::DIR)
        .create(dir)
        .map_err(|source| LifecycleError::CreateDir { path: dir.to_path_buf(), source })
}

#[cfg(not(unix))]
fn create_client_dir(dir: &Path) -> Result<(), LifecycleError> {
    fs::create_dir_all(dir).map_err(|source| LifecycleError::CreateDir { path: dir.to_path_buf(), source })
}
