use std::net::SocketAddr;

use crate::framing::split_frames;
use crate::lifecycle::{validate_client_id, HandleRegistry, StreamKey};
use crate::records::Batch;
use crate::collector::types::DemuxError;
use crate::transport::{BatchHandler, Delivery};

pub struct Demultiplexer {
    registry: HandleRegistry,
}

impl Demultiplexer {
    pub fn new(registry: HandleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    /// Store one batch under `(client_id, message_type)`.
    pub fn route(&self, batch: &Batch) -> Result<Delivery, DemuxError> {
        let record_type = batch.kind()?;
        if record_type.is_meta() {
            return Err(DemuxError::MetaType(record_type));
        }
        if !batch.is_consistent() {
            return Err(DemuxError::SizeMismatch { declared: batch.size, actual: batch.data.len() });
        }
        validate_client_id(&batch.client_id)?;

        let frames = split_frames(&batch.data)?.len() as u64;
        if frames == 0 {
            return Ok(Delivery::default());
        }

        let key = StreamKey::new(batch.client_id.clone(), record_type);
        let (handle, opened) = self.registry.get_or_create(&key, batch.contains_payloads)?;
        self.registry.append(&handle, &batch.data, frames)?;
        Ok(Delivery { frames, opened })
    }
}

impl BatchHandler for Demultiplexer {
    type Error = DemuxError;

    fn handle(&self, peer: SocketAddr, batch: Batch) -> Result<Delivery, DemuxError> {
        let delivery = self.route(&batch)?;
        log::trace!(
            "[DEMUX] {} {}/{}: {} frames",
            peer,
            batch.client_id,
            batch.message_type,
            delivery.frames
        );
        Ok(delivery)
    }
}
