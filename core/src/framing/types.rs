use std::fmt;
use std::io;

#[derive(Debug)]
pub enum FrameError {
    /// Declared length runs past the available bytes.
    Truncated { needed: usize, have: usize },
    /// Declared length above the sanity bound.
    Oversized { len: u64, max: usize },
    /// More than 10 continuation bytes, or the value overflows u64.
    MalformedVarint,
    Io(io::Error),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Truncated { needed, have } =>
                write!(f, "truncated frame: need {} bytes, have {}", needed, have),
            FrameError::Oversized { len, max } =>
                write!(f, "frame length {} exceeds maximum {}", len, max),
            FrameError::MalformedVarint =>
                write!(f, "malformed varint length prefix"),
            FrameError::Io(e) =>
                write!(f, "frame I/O error: {}", e),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FrameError {
    fn from(e: io::Error) -> Self {
        FrameError::Io(e)
    }
}

/// Outcome of reading one frame from a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRead {
    /// A whole frame was read into the caller's buffer.
    Frame,
    /// Zero bytes remained at a frame boundary.
    Eof,
    /// The stream ended inside a prefix or a payload.
    Truncated,
}
