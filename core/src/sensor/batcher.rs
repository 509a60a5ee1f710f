use bytes::{Bytes, BytesMut};

use crate::framing::decode_length_prefix;
use crate::records::{Batch, RecordType};
use crate::telemetry::TransportCounters;

#[derive(Debug)]
enum State {
    AwaitingSize,
    AwaitingData { token: Bytes },
}

/// Batching state machine for one record type.
///
/// Feed it the chunk stream with [`push`](Self::push); it hands back a batch
/// whenever the next frame would overflow `max_batch_size`.
#[derive(Debug)]
pub struct BatchAccumulator {
    client_id: String,
    record_type: RecordType,
    contains_payloads: bool,
    max_batch_size: usize,
    state: State,
    data: BytesMut,
    counters: TransportCounters,
}

impl BatchAccumulator {
    pub fn new(client_id: impl Into<String>, record_type: RecordType, contains_payloads: bool, max_batch_size: usize) -> Self {
        Self {
            client_id: client_id.into(),
            record_type,
            contains_payloads,
            max_batch_size,
            state: State::AwaitingSize,
            data: BytesMut::with_capacity(max_batch_size),
            counters: TransportCounters::default(),
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// Bytes currently held for the next batch.
    pub fn pending(&self) -> usize {
        self.data.len()
    }

    pub fn counters(&self) -> &TransportCounters {
        &self.counters
    }

    /// Consume one chunk. Returns a full batch when this chunk forced a flush.
    pub fn push(&mut self, chunk: Bytes) -> Option<Batch> {
        match std::mem::replace(&mut self.state, State::AwaitingSize) {
            State::AwaitingSize => {
                self.state = State::AwaitingData { token: chunk };
                None
            }
            State::AwaitingData { token } => self.accept(token, chunk),
        }
    }

    fn accept(&mut self, token: Bytes, payload: Bytes) -> Option<Batch> {
        match decode_length_prefix(&token) {
            Ok((len, used)) if used == token.len() && len == payload.len() => {}
            _ => {
                self.counters.malformed_chunks_dropped += 1;
                log::error!(
                    "[BATCHER] {}: size token does not match {}-byte payload, dropping record",
                    self.record_type,
                    payload.len()
                );
                return None;
            }
        }

        let frame_len = token.len() + payload.len();
        if frame_len > self.max_batch_size {
            self.counters.oversized_frames_dropped += 1;
            log::warn!(
                "[BATCHER] {}: {}-byte frame exceeds max batch size {}, dropping",
                self.record_type,
                frame_len,
                self.max_batch_size
            );
            return None;
        }

        self.counters.frames_batched += 1;
        if self.data.len() + frame_len <= self.max_batch_size {
            self.data.extend_from_slice(&token);
            self.data.extend_from_slice(&payload);
            return None;
        }

        // Does not fit: ship what we have, the frame starts the next batch.
        let full = self.take_batch();
        self.data.extend_from_slice(&token);
        self.data.extend_from_slice(&payload);
        full
    }

    fn take_batch(&mut self) -> Option<Batch> {
        if self.data.is_empty() {
            return None;
        }
        let data = self.data.split().freeze();
        Some(Batch {
            client_id: self.client_id.clone(),
            message_type: self.record_type.tag(),
            size: data.len() as i32,
            data,
            contains_payloads: self.contains_payloads,
        })
    }

    /// Flush the final partial batch at end of input.
    pub fn finish(&mut self) -> Option<Batch> {
        if let State::AwaitingData { token } = std::mem::replace(&mut self.state, State::AwaitingSize) {
            self.counters.malformed_chunks_dropped += 1;
            log::warn!("[BATCHER] {}: input ended after a {}-byte size token", self.record_type, token.len());
        }
        self.take_batch()
    }
}
