use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use prost::Message;

use crate::constants::DEFAULT_BUFFER_SIZE;
use crate::container::sink::is_compressed_path;
use crate::container::types::ContainerError;
use crate::framing::{read_frame, FrameRead};
use crate::records::Header;

/// Sequential container reader.
pub struct ContainerReader {
    path: PathBuf,
    source: Box<dyn Read + Send>,
    buf: Vec<u8>,
    header_read: bool,
    exhausted: bool,
    truncated: bool,
    records: u64,
}

impl ContainerReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ContainerError> {
        Self::open_with(path, DEFAULT_BUFFER_SIZE)
    }

    /// Open with an explicit read buffer size.
    pub fn open_with(path: impl AsRef<Path>, buffer_size: usize) -> Result<Self, ContainerError> {
        let path = path.as_ref().to_path_buf();
        let file = BufReader::with_capacity(buffer_size.max(1), File::open(&path)?);
        let source: Box<dyn Read + Send> = if is_compressed_path(&path) {
            Box::new(MultiGzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Ok(Self { path, source, buf: Vec::new(), header_read: false, exhausted: false, truncated: false, records: 0 })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the first frame. Failure here means the file is not
    /// a container.
    pub fn read_header(&mut self) -> Result<Header, ContainerError> {
        let invalid = |reason: String| ContainerError::InvalidHeader { path: self.path.clone(), reason };

        if self.header_read {
            return Err(invalid("header already consumed".into()));
        }
        match read_frame(&mut self.source, &mut self.buf) {
            Ok(FrameRead::Frame) => {}
            Ok(FrameRead::Eof) => return Err(invalid("empty file".into())),
            Ok(FrameRead::Truncated) => return Err(invalid("truncated header frame".into())),
            Err(e) => return Err(invalid(e.to_string())),
        }
        let header = Header::decode(self.buf.as_slice()).map_err(|e| invalid(e.to_string()))?;
        match header.kind() {
            Ok(t) if !t.is_meta() => {}
            Ok(t) => return Err(invalid(format!("header names meta type {}", t))),
            Err(e) => return Err(invalid(e.to_string())),
        }
        self.header_read = true;
        Ok(header)
    }

    /// Next raw record, or `None` once the stream is exhausted.
    ///
    /// A stream that ends inside a frame is exhausted too; see [`Self::truncated`].
    pub fn next_frame(&mut self) -> Result<Option<&[u8]>, ContainerError> {
        if !self.header_read {
            return Err(ContainerError::HeaderNotRead);
        }
        if self.exhausted {
            return Ok(None);
        }
        match read_frame(&mut self.source, &mut self.buf)? {
            FrameRead::Frame => {
                self.records += 1;
                Ok(Some(self.buf.as_slice()))
            }
            FrameRead::Eof => {
                self.exhausted = true;
                Ok(None)
            }
            FrameRead::Truncated => {
                self.exhausted = true;
                self.truncated = true;
                log::warn!("[CONTAINER] {}: truncated trailing frame after {} records", self.path.display(), self.records);
                Ok(None)
            }
        }
    }

    /// Decode the next record into `record`. Returns `false` once exhausted.
    pub fn next<M: Message>(&mut self, record: &mut M) -> Result<bool, ContainerError> {
        let Some(frame) = self.next_frame()? else {
            return Ok(false);
        };
        record.clear();
        record.merge(frame)?;
        Ok(true)
    }

    /// The stream ended inside a frame.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn records(&self) -> u64 {
        self.records
    }

    /// Release the decompressor, then the file.
    pub fn close(self) -> Result<(), ContainerError> {
        let ContainerReader { source, .. } = self;
        drop(source);
        Ok(())
    }
}

/// Number of records after the header.
pub fn count_records(path: impl AsRef<Path>) -> Result<u64, ContainerError> {
    let mut reader = ContainerReader::open(path)?;
    reader.read_header()?;
    while reader.next_frame()?.is_some() {}
    Ok(reader.records())
}
