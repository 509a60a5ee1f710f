use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Counters collected by batchers, receive workers and the demultiplexer.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportCounters {
    // sensor side
    pub batches_sent: u64,
    pub frames_batched: u64,
    pub bytes_sent: u64,
    pub oversized_frames_dropped: u64,
    pub malformed_chunks_dropped: u64,
    pub send_failures: u64,

    // collector side
    pub datagrams_received: u64,
    pub datagrams_dropped: u64,
    pub bytes_received: u64,
    pub batches_appended: u64,
    pub frames_appended: u64,
    pub bytes_appended: u64,
    pub handles_opened: u64,
}

impl TransportCounters {
    /// One batch put on the wire as a datagram of `datagram_len` bytes.
    pub fn add_sent(&mut self, datagram_len: usize) {
        self.batches_sent += 1;
        self.bytes_sent += datagram_len as u64;
    }

    pub fn add_received(&mut self, datagram_len: usize) {
        self.datagrams_received += 1;
        self.bytes_received += datagram_len as u64;
    }

    /// One decoded batch written to its container.
    pub fn add_appended(&mut self, frames: u64, data_len: usize, opened: bool) {
        self.batches_appended += 1;
        self.frames_appended += frames;
        self.bytes_appended += data_len as u64;
        if opened {
            self.handles_opened += 1;
        }
    }

    pub fn merge(&mut self, other: &TransportCounters) {
        self.batches_sent += other.batches_sent;
        self.frames_batched += other.frames_batched;
        self.bytes_sent += other.bytes_sent;
        self.oversized_frames_dropped += other.oversized_frames_dropped;
        self.malformed_chunks_dropped += other.malformed_chunks_dropped;
        self.send_failures += other.send_failures;

        self.datagrams_received += other.datagrams_received;
        self.datagrams_dropped += other.datagrams_dropped;
        self.bytes_received += other.bytes_received;
        self.batches_appended += other.batches_appended;
        self.frames_appended += other.frames_appended;
        self.bytes_appended += other.bytes_appended;
        self.handles_opened += other.handles_opened;
    }
}

impl AddAssign for TransportCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
