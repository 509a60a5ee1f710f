use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use crossbeam::channel::{self, Receiver, Sender};
use prost::Message;

use crate::constants::{CHANNEL_CAPACITY, DEFAULT_BUFFER_SIZE};
use crate::container::sink::{container_file_name, FileStack};
use crate::container::types::{ContainerError, WriterSummary};
use crate::framing::{encode_length_prefix, write_frame};
use crate::records::{Header, RecordType};

/// Writer options.
///
/// `buffer` and `compress` apply to the file sink only; combining either with
/// `as_channel` is rejected by [`AuditRecordWriter::new`].
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Logical name, becomes the file stem.
    pub name: String,
    pub buffer: bool,
    pub compress: bool,
    pub out_dir: PathBuf,
    pub as_channel: bool,
    pub buffer_size: usize,
    pub channel_capacity: usize,
    /// Written into the header as `input_source`.
    pub source: String,
    pub contains_payloads: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            buffer: true,
            compress: true,
            out_dir: PathBuf::from("."),
            as_channel: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
            channel_capacity: CHANNEL_CAPACITY,
            source: String::new(),
            contains_payloads: false,
        }
    }
}

enum Sink {
    File { path: PathBuf, stack: FileStack },
    Channel { tx: Sender<Bytes>, rx: Receiver<Bytes> },
}

/// Frames records into a file or a chunk channel.
pub struct AuditRecordWriter {
    cfg: WriterConfig,
    sink: Sink,
    header: Option<Header>,
    records: u64,
    bytes: u64,
}

impl AuditRecordWriter {
    pub fn new(cfg: WriterConfig) -> Result<Self, ContainerError> {
        if cfg.as_channel && (cfg.buffer || cfg.compress) {
            return Err(ContainerError::Config(
                "buffering or compression cannot be activated when writing to a channel",
            ));
        }
        if cfg.name.is_empty() {
            return Err(ContainerError::Config("writer name must not be empty"));
        }

        let sink = if cfg.as_channel {
            let (tx, rx) = channel::bounded(cfg.channel_capacity.max(2));
            Sink::Channel { tx, rx }
        } else {
            fs::create_dir_all(&cfg.out_dir)?;
            let path = cfg.out_dir.join(container_file_name(&cfg.name, cfg.compress));
            let stack = FileStack::create(&path, cfg.buffer, cfg.compress, cfg.buffer_size.max(1))?;
            log::debug!("[CONTAINER] created {}", path.display());
            Sink::File { path, stack }
        };

        Ok(Self { cfg, sink, header: None, records: 0, bytes: 0 })
    }

    pub fn name(&self) -> &str {
        &self.cfg.name
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.sink {
            Sink::File { path, .. } => Some(path),
            Sink::Channel { .. } => None,
        }
    }

    /// Chunk stream for channel writers: size token, then payload, per record.
    pub fn chunks(&self) -> Option<Receiver<Bytes>> {
        match &self.sink {
            Sink::Channel { rx, .. } => Some(rx.clone()),
            Sink::File { .. } => None,
        }
    }

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn records(&self) -> u64 {
        self.records
    }

    /// Write the one-time header.
    ///
    /// Channel writers keep it locally: the collector writes its own header
    /// when it opens the destination container.
    pub fn write_header(&mut self, record_type: RecordType) -> Result<(), ContainerError> {
        if self.header.is_some() {
            return Err(ContainerError::HeaderAlreadyWritten);
        }
        let header = Header::new(record_type, self.cfg.source.clone(), self.cfg.contains_payloads);
        if let Sink::File { stack, .. } = &mut self.sink {
            self.bytes += write_frame(stack, &header.encode_to_vec())? as u64;
        }
        self.header = Some(header);
        Ok(())
    }

    /// Frame and forward one encoded record.
    pub fn write(&mut self, record: &[u8]) -> Result<(), ContainerError> {
        if self.header.is_none() {
            return Err(ContainerError::HeaderNotWritten);
        }
        match &mut self.sink {
            Sink::File { stack, .. } => {
                self.bytes += write_frame(stack, record)? as u64;
            }
            Sink::Channel { tx, .. } => {
                let token = Bytes::from(encode_length_prefix(record.len()));
                let token_len = token.len();
                tx.send(token).map_err(|_| ContainerError::ChannelClosed)?;
                tx.send(Bytes::copy_from_slice(record)).map_err(|_| ContainerError::ChannelClosed)?;
                self.bytes += (token_len + record.len()) as u64;
            }
        }
        self.records += 1;
        Ok(())
    }

    pub fn write_message<M: Message>(&mut self, msg: &M) -> Result<(), ContainerError> {
        self.write(&msg.encode_to_vec())
    }

    /// Append bytes that are already whole frames (`frames` of them).
    pub fn write_raw(&mut self, data: &[u8], frames: u64) -> Result<(), ContainerError> {
        if self.header.is_none() {
            return Err(ContainerError::HeaderNotWritten);
        }
        let Sink::File { stack, .. } = &mut self.sink else {
            return Err(ContainerError::NotAFileSink);
        };
        stack.write_all(data)?;
        self.bytes += data.len() as u64;
        self.records += frames;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), ContainerError> {
        if let Sink::File { stack, .. } = &mut self.sink {
            stack.flush()?;
        }
        Ok(())
    }

    /// Close the sink. File stacks unwind gzip → buffer → file and sync;
    /// a file that received no records is removed.
    pub fn close(self) -> Result<WriterSummary, ContainerError> {
        let AuditRecordWriter { cfg, sink, records, bytes, .. } = self;
        let mut summary = WriterSummary { name: cfg.name, path: None, records, bytes, removed: false };

        match sink {
            Sink::File { path, stack } => {
                drop(stack.finish()?);
                if records == 0 {
                    fs::remove_file(&path)?;
                    summary.removed = true;
                    log::debug!("[CONTAINER] removed empty {}", path.display());
                }
                summary.path = Some(path);
            }
            // Dropping the sender lets downstream batchers drain and stop.
            Sink::Channel { tx, rx } => {
                drop(tx);
                drop(rx);
            }
        }
        Ok(summary)
    }
}
