use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use x25519_dalek::PublicKey;

use crate::constants::MAX_UDP_PAYLOAD;
use crate::crypto::KeyPair;
use crate::records::Batch;
use crate::sensor::BatchSink;
use crate::transport::codec::seal_batch;
use crate::transport::types::TransportError;

/// Connected UDP socket towards one collector.
///
/// `send` on a `UdpSocket` takes `&self`, so one sender is shared by every
/// batcher thread without a lock.
pub struct TransportSender {
    socket: UdpSocket,
    target: SocketAddr,
    keys: KeyPair,
    collector: PublicKey,
}

pub fn resolve_addr(addr: &str) -> Result<SocketAddr, TransportError> {
    addr.to_socket_addrs()
        .map_err(|e| TransportError::Address { addr: addr.to_string(), reason: e.to_string() })?
        .next()
        .ok_or_else(|| TransportError::Address { addr: addr.to_string(), reason: "no address resolved".into() })
}

impl TransportSender {
    pub fn connect(addr: &str, keys: KeyPair, collector: PublicKey) -> Result<Self, TransportError> {
        let target = resolve_addr(addr)?;
        let local: SocketAddr = if target.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let socket = UdpSocket::bind(local)?;
        socket.connect(target)?;
        log::info!("[SENDER] {} -> {}", socket.local_addr()?, target);
        Ok(Self { socket, target, keys, collector })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Seal and send one batch. Returns the datagram length.
    pub fn send(&self, batch: &Batch) -> Result<usize, TransportError> {
        let datagram = seal_batch(batch, &self.keys, &self.collector)?;
        if datagram.len() > MAX_UDP_PAYLOAD {
            return Err(TransportError::DatagramTooLarge { len: datagram.len(), max: MAX_UDP_PAYLOAD });
        }
        Ok(self.socket.send(&datagram)?)
    }
}

impl BatchSink for TransportSender {
    fn send_batch(&self, batch: &Batch) -> Result<usize, TransportError> {
        self.send(batch)
    }
}
