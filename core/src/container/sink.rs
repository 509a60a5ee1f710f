use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::constants::{FILE_EXTENSION, FILE_EXTENSION_COMPRESSED};

/// File-side writer stack. Data enters at the outermost layer.
pub enum FileStack {
    Plain(File),
    Buffered(BufWriter<File>),
    Compressed(GzEncoder<File>),
    /// gzip → buffer → file
    BufferedCompressed(GzEncoder<BufWriter<File>>),
}

impl FileStack {
    /// Create (truncate) `path` and build the stack on top of it.
    pub fn create(path: &Path, buffer: bool, compress: bool, buffer_size: usize) -> io::Result<Self> {
        let file = OpenOptions::new().write(true).create(true).truncate(true).open(path)?;
        let level = Compression::default();
        Ok(match (buffer, compress) {
            (false, false) => FileStack::Plain(file),
            (true, false) => FileStack::Buffered(BufWriter::with_capacity(buffer_size, file)),
            (false, true) => FileStack::Compressed(GzEncoder::new(file, level)),
            (true, true) => FileStack::BufferedCompressed(GzEncoder::new(
                BufWriter::with_capacity(buffer_size, file),
                level,
            )),
        })
    }

    /// Unwind the stack: finish gzip, drain the buffer, sync the file.
    /// Returns the file so the caller can stat it.
    pub fn finish(self) -> io::Result<File> {
        let file = match self {
            FileStack::Plain(f) => f,
            FileStack::Buffered(b) => b.into_inner().map_err(|e| e.into_error())?,
            FileStack::Compressed(g) => g.finish()?,
            FileStack::BufferedCompressed(g) => g.finish()?.into_inner().map_err(|e| e.into_error())?,
        };
        file.sync_all()?;
        Ok(file)
    }
}

impl Write for FileStack {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileStack::Plain(w) => w.write(buf),
            FileStack::Buffered(w) => w.write(buf),
            FileStack::Compressed(w) => w.write(buf),
            FileStack::BufferedCompressed(w) => w.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            FileStack::Plain(w) => w.write_all(buf),
            FileStack::Buffered(w) => w.write_all(buf),
            FileStack::Compressed(w) => w.write_all(buf),
            FileStack::BufferedCompressed(w) => w.write_all(buf),
        }
    }

    /// Sync-flushes gzip so everything written so far is decodable from disk.
    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileStack::Plain(w) => w.flush(),
            FileStack::Buffered(w) => w.flush(),
            FileStack::Compressed(w) => w.flush(),
            FileStack::BufferedCompressed(w) => w.flush(),
        }
    }
}

/// `<name>.ncap` or `<name>.ncap.gz`.
pub fn container_file_name(name: &str, compress: bool) -> String {
    let ext = if compress { FILE_EXTENSION_COMPRESSED } else { FILE_EXTENSION };
    format!("{}{}", name, ext)
}

/// Whether `path` names a gzip container.
pub fn is_compressed_path(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "gz")
}
