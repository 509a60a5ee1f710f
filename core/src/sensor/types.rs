use crate::constants::DEFAULT_MAX_BATCH_SIZE;
use crate::records::Batch;
use crate::transport::TransportError;

/// Destination for completed batches; shared by all workers.
pub trait BatchSink: Send + Sync {
    /// Returns the number of bytes put on the wire.
    fn send_batch(&self, batch: &Batch) -> Result<usize, TransportError>;
}

#[derive(Debug, Clone)]
pub struct BatcherConfig {
    pub client_id: String,
    /// Upper bound on `Batch.data`.
    pub max_batch_size: usize,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self { client_id: String::new(), max_batch_size: DEFAULT_MAX_BATCH_SIZE }
    }
}
