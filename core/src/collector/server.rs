use std::net::SocketAddr;
use std::sync::atomic::AtomicBool;

use crate::collector::demux::Demultiplexer;
use crate::collector::types::{CollectorError, CollectorReport};
use crate::config::CollectorConfig;
use crate::crypto::KeyPair;
use crate::lifecycle::{HandleOptions, HandleRegistry};
use crate::telemetry::{TelemetrySnapshot, TelemetryTimer};
use crate::transport::TransportReceiver;

/// Receiver + demultiplexer for one listen address.
pub struct Collector {
    receiver: TransportReceiver,
    demux: Demultiplexer,
}

impl Collector {
    pub fn bind(cfg: &CollectorConfig, keys: KeyPair) -> Result<Self, CollectorError> {
        std::fs::create_dir_all(&cfg.out_dir)?;
        let registry = HandleRegistry::new(HandleOptions {
            out_dir: cfg.out_dir.clone(),
            buffer: cfg.buffer,
            compress: cfg.compress,
            buffer_size: cfg.buffer_size,
        });
        let receiver = TransportReceiver::bind(&cfg.listen_addr, keys, cfg.workers)?;
        Ok(Self { receiver, demux: Demultiplexer::new(registry) })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, CollectorError> {
        Ok(self.receiver.local_addr()?)
    }

    pub fn demux(&self) -> &Demultiplexer {
        &self.demux
    }

    /// Serve until `running` is cleared, then close every container.
    pub fn run(&self, running: &AtomicBool) -> CollectorReport {
        let mut timer = TelemetryTimer::start();
        let counters = self.receiver.run(&self.demux, running);
        timer.stop();

        let open_handles = self.demux.registry().len();
        let close = self.demux.registry().close_all();
        let telemetry = TelemetrySnapshot::from(&counters, &timer, open_handles);

        log::info!("[COLLECTOR] {}", close);
        for (key, err) in &close.failed {
            log::error!("[COLLECTOR] {} not closed cleanly: {}", key, err);
        }
        log::info!("[COLLECTOR] telemetry {}", telemetry.to_json());
        CollectorReport { telemetry, close }
    }
}
