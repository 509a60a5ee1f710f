use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: &'static str, msg: String },
    #[error("decompressed output too large: more than {max} bytes")]
    OutputTooLarge { max: usize },
}

// Require Send so trait objects can cross thread boundaries.
pub trait Compressor: Send {
    /// Compress one complete buffer into `out`.
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError>;
}

pub trait Decompressor: Send {
    /// Decompress one complete buffer into `out`.
    fn decompress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError>;
}
