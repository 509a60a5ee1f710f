//! Gzip via flate2.

use std::io::{Read, Write};

use flate2::{read::MultiGzDecoder, write::GzEncoder, Compression};

use crate::compression::types::{CompressionError, Compressor, Decompressor};

const CODEC: &str = "gzip";

pub struct GzipCompressor {
    level: Compression,
}

impl GzipCompressor {
    pub fn new(level: i32) -> Self {
        let level = match level {
            0..=9 => Compression::new(level as u32),
            _ => Compression::default(),
        };
        Self { level }
    }
}

impl Default for GzipCompressor {
    fn default() -> Self {
        Self { level: Compression::default() }
    }
}

impl Compressor for GzipCompressor {
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let mut enc = GzEncoder::new(out, self.level);
        enc.write_all(input)
            .map_err(|e| CompressionError::CodecProcessFailed { codec: CODEC, msg: e.to_string() })?;
        enc.finish()
            .map_err(|e| CompressionError::CodecProcessFailed { codec: CODEC, msg: e.to_string() })?;
        Ok(())
    }
}

pub struct GzipDecompressor {
    max_output: usize,
}

impl GzipDecompressor {
    pub fn new(max_output: usize) -> Self {
        Self { max_output }
    }
}

impl Decompressor for GzipDecompressor {
    fn decompress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let start = out.len();
        // One byte past the cap tells "exactly max" apart from "too large".
        let mut dec = MultiGzDecoder::new(input).take(self.max_output as u64 + 1);
        dec.read_to_end(out)
            .map_err(|e| CompressionError::CodecProcessFailed { codec: CODEC, msg: e.to_string() })?;
        if out.len() - start > self.max_output {
            out.truncate(start);
            return Err(CompressionError::OutputTooLarge { max: self.max_output });
        }
        Ok(())
    }
}

/// One-shot helpers.
pub fn gzip(input: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut out = Vec::with_capacity(input.len() / 2 + 32);
    GzipCompressor::default().compress_chunk(input, &mut out)?;
    Ok(out)
}

pub fn gunzip(input: &[u8], max_output: usize) -> Result<Vec<u8>, CompressionError> {
    let mut out = Vec::new();
    GzipDecompressor::new(max_output).decompress_chunk(input, &mut out)?;
    Ok(out)
}
