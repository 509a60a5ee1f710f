use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use bytes::Bytes;
use crossbeam::channel::Receiver;

use crate::records::{Batch, RecordType};
use crate::sensor::batcher::BatchAccumulator;
use crate::sensor::types::{BatchSink, BatcherConfig};
use crate::telemetry::TransportCounters;

/// Input of one batcher: the chunk channel of a record type's writer.
pub struct BatcherInput {
    pub record_type: RecordType,
    pub contains_payloads: bool,
    pub chunks: Receiver<Bytes>,
}

fn ship(sink: &dyn BatchSink, batch: &Batch, counters: &mut TransportCounters) {
    match sink.send_batch(batch) {
        Ok(n) => counters.add_sent(n),
        Err(e) => {
            counters.send_failures += 1;
            log::warn!(
                "[BATCHER] {}: failed to send {}-byte batch: {}",
                batch.kind().map(|t| t.to_string()).unwrap_or_default(),
                batch.size,
                e
            );
        }
    }
}

/// Drain `input` until every sender is gone, shipping batches to `sink`.
/// Returns this worker's counters.
pub fn run_batcher(input: BatcherInput, cfg: &BatcherConfig, sink: &dyn BatchSink) -> TransportCounters {
    let mut acc = BatchAccumulator::new(cfg.client_id.clone(), input.record_type, input.contains_payloads, cfg.max_batch_size);
    let mut counters = TransportCounters::default();

    for chunk in input.chunks.iter() {
        if let Some(batch) = acc.push(chunk) {
            ship(sink, &batch, &mut counters);
        }
    }

    // Channel closed: end of capture for this type.
    if let Some(batch) = acc.finish() {
        ship(sink, &batch, &mut counters);
    }
    counters.merge(acc.counters());
    log::debug!("[BATCHER] {} done: {} batches", input.record_type, counters.batches_sent);
    counters
}

/// One named thread per input.
pub fn spawn_batchers(
    inputs: Vec<BatcherInput>,
    cfg: &BatcherConfig,
    sink: Arc<dyn BatchSink>,
) -> io::Result<Vec<JoinHandle<TransportCounters>>> {
    inputs
        .into_iter()
        .map(|input| {
            let cfg = cfg.clone();
            let sink = Arc::clone(&sink);
            thread::Builder::new()
                .name(format!("batcher-{}", input.record_type))
                .spawn(move || run_batcher(input, &cfg, sink.as_ref()))
        })
        .collect()
}

/// Join batchers and merge their counters. A panicked worker is logged and
/// skipped.
pub fn join_batchers(handles: Vec<JoinHandle<TransportCounters>>) -> TransportCounters {
    let mut totals = TransportCounters::default();
    for h in handles {
        match h.join() {
            Ok(c) => totals += c,
            Err(_) => log::error!("[BATCHER] worker panicked"),
        }
    }
    totals
}
