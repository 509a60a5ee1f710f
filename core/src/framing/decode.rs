use std::io::{self, Read};

use crate::constants::{MAX_FRAME_SIZE, MAX_VARINT_LEN};
use crate::framing::types::{FrameError, FrameRead};

/// Parse a varint prefix at the start of `buf`.
/// Returns `(declared_len, prefix_len)`.
pub fn decode_length_prefix(buf: &[u8]) -> Result<(usize, usize), FrameError> {
    let mut value: u64 = 0;
    for (i, &byte) in buf.iter().take(MAX_VARINT_LEN).enumerate() {
        // 10th byte may only carry the top bit of a u64
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(FrameError::MalformedVarint);
        }
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((checked_len(value)?, i + 1));
        }
    }
    if buf.len() >= MAX_VARINT_LEN {
        return Err(FrameError::MalformedVarint);
    }
    Err(FrameError::Truncated { needed: buf.len() + 1, have: buf.len() })
}

#[inline]
fn checked_len(value: u64) -> Result<usize, FrameError> {
    if value > MAX_FRAME_SIZE as u64 {
        return Err(FrameError::Oversized { len: value, max: MAX_FRAME_SIZE });
    }
    Ok(value as usize)
}

/// Split a buffer of concatenated frames into payload slices.
///
/// Strict: every byte must belong to a whole frame.
pub fn split_frames(mut data: &[u8]) -> Result<Vec<&[u8]>, FrameError> {
    let mut frames = Vec::new();
    while !data.is_empty() {
        let (len, prefix_len) = decode_length_prefix(data)?;
        let end = prefix_len + len;
        if end > data.len() {
            return Err(FrameError::Truncated { needed: end, have: data.len() });
        }
        frames.push(&data[prefix_len..end]);
        data = &data[end..];
    }
    Ok(frames)
}

/// Read one frame from `r` into `buf` (cleared first).
///
/// End of input is not an error: `FrameRead::Eof` at a frame boundary,
/// `FrameRead::Truncated` inside one. Corruption and I/O failures are errors.
pub fn read_frame<R: Read>(r: &mut R, buf: &mut Vec<u8>) -> Result<FrameRead, FrameError> {
    buf.clear();

    let mut prefix = [0u8; MAX_VARINT_LEN];
    let mut n = 0;
    loop {
        let mut byte = [0u8; 1];
        match r.read_exact(&mut byte) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Ok(if n == 0 { FrameRead::Eof } else { FrameRead::Truncated });
            }
            Err(e) => return Err(e.into()),
        }
        if n == MAX_VARINT_LEN {
            return Err(FrameError::MalformedVarint);
        }
        prefix[n] = byte[0];
        n += 1;
        if byte[0] & 0x80 == 0 {
            break;
        }
    }

    let (len, _) = decode_length_prefix(&prefix[..n])?;
    buf.resize(len, 0);
    match r.read_exact(buf) {
        Ok(()) => Ok(FrameRead::Frame),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            buf.clear();
            Ok(FrameRead::Truncated)
        }
        Err(e) => Err(e.into()),
    }
}
