//! Batch ↔ datagram.

use prost::Message;
use x25519_dalek::PublicKey;

use crate::compression::{gunzip, gzip};
use crate::constants::{KEY_LEN_32, MAX_DECOMPRESSED_BATCH};
use crate::crypto::{asymmetric_decrypt, asymmetric_encrypt, public_from_slice, KeyPair, SEAL_OVERHEAD};
use crate::records::Batch;
use crate::transport::types::TransportError;

/// marshal → gzip → encrypt → prepend sender key.
pub fn seal_batch(batch: &Batch, me: &KeyPair, collector: &PublicKey) -> Result<Vec<u8>, TransportError> {
    let compressed = gzip(&batch.encode_to_vec())?;
    let sealed = asymmetric_encrypt(&compressed, collector, me)?;

    let mut datagram = Vec::with_capacity(KEY_LEN_32 + sealed.len());
    datagram.extend_from_slice(me.public().as_bytes());
    datagram.extend_from_slice(&sealed);
    Ok(datagram)
}

/// Inverse of [`seal_batch`]. Returns the sender key from the prefix along
/// with the batch.
pub fn open_datagram(datagram: &[u8], me: &KeyPair) -> Result<(PublicKey, Batch), TransportError> {
    if datagram.len() < KEY_LEN_32 + SEAL_OVERHEAD {
        return Err(TransportError::DatagramTooShort { have: datagram.len() });
    }
    let (key, sealed) = datagram.split_at(KEY_LEN_32);
    let peer = public_from_slice(key).ok_or(TransportError::DatagramTooShort { have: datagram.len() })?;

    let compressed = asymmetric_decrypt(sealed, &peer, me)?;
    let encoded = gunzip(&compressed, MAX_DECOMPRESSED_BATCH)?;
    let batch = Batch::decode(encoded.as_slice())?;
    Ok((peer, batch))
}
