use std::io::Write;

use prost::encoding::{encode_varint, encoded_len_varint};

use crate::constants::MAX_FRAME_SIZE;
use crate::framing::types::FrameError;

/// Varint prefix for a payload of `len` bytes.
#[inline]
pub fn encode_length_prefix(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len_varint(len as u64));
    encode_varint(len as u64, &mut out);
    out
}

#[inline]
fn check_len(len: usize) -> Result<(), FrameError> {
    if len > MAX_FRAME_SIZE {
        return Err(FrameError::Oversized { len: len as u64, max: MAX_FRAME_SIZE });
    }
    Ok(())
}

/// `prefix ‖ payload` as one buffer.
pub fn encode_frame(payload: &[u8]) -> Result<Vec<u8>, FrameError> {
    check_len(payload.len())?;
    let mut out = Vec::with_capacity(encoded_len_varint(payload.len() as u64) + payload.len());
    encode_varint(payload.len() as u64, &mut out);
    out.extend_from_slice(payload);
    Ok(out)
}

/// Writes one frame and returns the number of bytes put on the writer.
pub fn write_frame<W: Write>(w: &mut W, payload: &[u8]) -> Result<usize, FrameError> {
    check_len(payload.len())?;
    let prefix = encode_length_prefix(payload.len());
    w.write_all(&prefix)?;
    w.write_all(payload)?;
    Ok(prefix.len() + payload.len())
}
