use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Receiver};

use crate::constants::{CHANNEL_CAPACITY, MAX_UDP_PAYLOAD, RECV_POLL_INTERVAL_MS};
use crate::crypto::KeyPair;
use crate::records::Batch;
use crate::telemetry::TransportCounters;
use crate::transport::codec::open_datagram;
use crate::transport::sender::resolve_addr;
use crate::transport::types::TransportError;

/// What a handler did with one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    pub frames: u64,
    /// A new container was opened for this batch.
    pub opened: bool,
}

/// Consumer of decoded batches. Called concurrently from every worker.
pub trait BatchHandler: Sync {
    type Error: std::fmt::Display;

    fn handle(&self, peer: SocketAddr, batch: Batch) -> Result<Delivery, Self::Error>;
}

type Datagram = (Vec<u8>, SocketAddr);

/// Bound UDP socket plus the collector's key pair.
pub struct TransportReceiver {
    socket: UdpSocket,
    keys: KeyPair,
    workers: usize,
}

impl TransportReceiver {
    /// `workers == 0` means one per CPU.
    pub fn bind(addr: &str, keys: KeyPair, workers: usize) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(resolve_addr(addr)?)?;
        // Short timeout so the loop notices shutdown.
        socket.set_read_timeout(Some(Duration::from_millis(RECV_POLL_INTERVAL_MS)))?;
        let workers = if workers == 0 { num_cpus::get().max(1) } else { workers };
        log::info!("[RECEIVER] listening on {} with {} workers", socket.local_addr()?, workers);
        Ok(Self { socket, keys, workers })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.socket.local_addr()?)
    }

    /// Receive until `running` turns false, then drain the queue and join the
    /// workers. Returns merged worker counters.
    pub fn run<H: BatchHandler>(&self, handler: &H, running: &AtomicBool) -> TransportCounters {
        let (tx, rx) = channel::bounded::<Datagram>(CHANNEL_CAPACITY);

        thread::scope(|s| {
            let handles: Vec<_> = (0..self.workers)
                .map(|_| {
                    let rx = rx.clone();
                    s.spawn(move || decode_worker(rx, &self.keys, handler))
                })
                .collect();
            drop(rx);

            let mut buf = vec![0u8; MAX_UDP_PAYLOAD + 1];
            while running.load(Ordering::SeqCst) {
                let (len, peer) = match self.socket.recv_from(&mut buf) {
                    Ok(r) => r,
                    Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted) => continue,
                    Err(e) => {
                        log::error!("[RECEIVER] recv error: {}", e);
                        continue;
                    }
                };
                if tx.send((buf[..len].to_vec(), peer)).is_err() {
                    log::error!("[RECEIVER] all workers gone, stopping");
                    break;
                }
            }
            drop(tx);

            let mut totals = TransportCounters::default();
            for h in handles {
                match h.join() {
                    Ok(c) => totals += c,
                    Err(_) => log::error!("[RECEIVER] worker panicked"),
                }
            }
            log::info!(
                "[RECEIVER] stopped: {} datagrams, {} dropped",
                totals.datagrams_received,
                totals.datagrams_dropped
            );
            totals
        })
    }
}

fn decode_worker<H: BatchHandler>(rx: Receiver<Datagram>, keys: &KeyPair, handler: &H) -> TransportCounters {
    let mut counters = TransportCounters::default();
    for (datagram, peer) in rx.iter() {
        counters.add_received(datagram.len());

        let batch = match open_datagram(&datagram, keys) {
            Ok((_, batch)) => batch,
            Err(e) => {
                counters.datagrams_dropped += 1;
                log::warn!("[RECEIVER] dropped datagram from {}: {}", peer, e);
                continue;
            }
        };

        let data_len = batch.data.len();
        match handler.handle(peer, batch) {
            Ok(d) => counters.add_appended(d.frames, data_len, d.opened),
            Err(e) => {
                counters.datagrams_dropped += 1;
                log::warn!("[RECEIVER] dropped batch from {}: {}", peer, e);
            }
        }
    }
    counters
}
