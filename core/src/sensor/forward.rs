use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::container::{AuditRecordWriter, ContainerError, ContainerReader, WriterConfig};
use crate::records::RecordType;
use crate::sensor::types::{BatchSink, BatcherConfig};
use crate::sensor::worker::{join_batchers, spawn_batchers, BatcherInput};
use crate::telemetry::TransportCounters;
use crate::types::NetcapError;

/// Outcome of forwarding one container file.
#[derive(Debug, Clone)]
pub struct ForwardSummary {
    pub record_type: RecordType,
    pub records: u64,
    pub truncated: bool,
    pub counters: TransportCounters,
}

/// Replay a container file through a channel writer and one batcher into
/// `sink`. Stops early once `running` turns false.
///
/// The writer is closed and the batcher joined on every path, so a read
/// error still ships the partial batch collected before it.
pub fn forward_container(
    path: &Path,
    cfg: &BatcherConfig,
    channel_capacity: usize,
    sink: Arc<dyn BatchSink>,
    running: &AtomicBool,
) -> Result<ForwardSummary, NetcapError> {
    let mut reader = ContainerReader::open(path)?;
    let header = reader.read_header()?;
    let record_type = header.kind()?;

    let mut writer = AuditRecordWriter::new(WriterConfig {
        name: record_type.name().to_string(),
        buffer: false,
        compress: false,
        as_channel: true,
        channel_capacity,
        source: cfg.client_id.clone(),
        contains_payloads: header.contains_payloads,
        ..WriterConfig::default()
    })?;
    writer.write_header(record_type)?;

    let chunks = writer.chunks().ok_or(ContainerError::Config("channel writer without chunk stream"))?;
    let input = BatcherInput { record_type, contains_payloads: header.contains_payloads, chunks };
    let handles = spawn_batchers(vec![input], cfg, sink)?;

    let pumped = pump(&mut reader, &mut writer, running);
    let closed = writer.close();
    let counters = join_batchers(handles);
    if let Err(e) = &pumped {
        log::warn!(
            "[FORWARD] {}: stopped after {} records ({} batches sent): {}",
            path.display(),
            reader.records(),
            counters.batches_sent,
            e
        );
    }
    pumped?;
    let summary = closed?;

    if reader.truncated() {
        log::warn!("[FORWARD] {}: stopped at truncated trailing frame", path.display());
    }
    log::info!(
        "[FORWARD] {}: {} {} records in {} batches",
        path.display(),
        summary.records,
        record_type,
        counters.batches_sent
    );
    Ok(ForwardSummary { record_type, records: summary.records, truncated: reader.truncated(), counters })
}

fn pump(reader: &mut ContainerReader, writer: &mut AuditRecordWriter, running: &AtomicBool) -> Result<(), ContainerError> {
    while let Some(frame) = reader.next_frame()? {
        writer.write(frame)?;
        if !running.load(Ordering::Relaxed) {
            break;
        }
    }
    Ok(())
}
