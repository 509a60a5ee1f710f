//! constants.rs
//! Format, transport and default configuration constants shared by every layer.

/// Format version written into every container header.
pub const FORMAT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Uncompressed container suffix.
pub const FILE_EXTENSION: &str = ".ncap";
/// Gzip-compressed container suffix.
pub const FILE_EXTENSION_COMPRESSED: &str = ".ncap.gz";

/// Prefix carried by every record type's wire name (stripped for file names).
pub const TYPE_PREFIX: &str = "NC_";

/// Default buffered-writer / buffered-reader capacity (12 MiB).
pub const DEFAULT_BUFFER_SIZE: usize = 12 * 1024 * 1024;

/// Frames above this size are treated as corruption (32 MiB).
pub const MAX_FRAME_SIZE: usize = 32 * 1024 * 1024;
/// A u64 varint never needs more than 10 bytes.
pub const MAX_VARINT_LEN: usize = 10;

/// X25519 key length, also the clear-text key prefix of every datagram.
pub const KEY_LEN_32: usize = 32;
/// XChaCha20-Poly1305 nonce length.
pub const NONCE_LEN_24: usize = 24;
/// Poly1305 tag length.
pub const TAG_LEN_16: usize = 16;

/// Largest payload an IPv4 UDP datagram can carry.
pub const MAX_UDP_PAYLOAD: usize = 65_507;

/// Bytes reserved on top of `max_batch_size` and the client id for the
/// remaining Batch fields, gzip framing, nonce, tag and the sender key.
pub const BATCH_ENVELOPE_HEADROOM: usize = 1024;

/// Longest ClientID in bytes; it is also a directory name on the collector.
pub const MAX_CLIENT_ID_LEN: usize = 255;

/// Upper bound on a decompressed batch, guards against compression bombs.
pub const MAX_DECOMPRESSED_BATCH: usize = 4 * MAX_UDP_PAYLOAD;

/// Sensor default batch size (10 KiB).
pub const DEFAULT_MAX_BATCH_SIZE: usize = 10 * 1024;
/// Collector default listen / sensor default target.
pub const DEFAULT_COLLECTOR_ADDR: &str = "127.0.0.1:1335";
/// Collector default output directory.
pub const DEFAULT_OUT_DIR: &str = ".";

/// Key file names written by key generation.
pub const PUB_KEY_FILE: &str = "pub.key";
pub const PRIV_KEY_FILE: &str = "priv.key";

/// Capacity of the bounded queues between stages.
pub const CHANNEL_CAPACITY: usize = 1024;

/// Receive-loop poll interval; bounds shutdown latency.
pub const RECV_POLL_INTERVAL_MS: u64 = 100;

/// HKDF info label binding derived keys to this protocol.
pub const KDF_INFO: &[u8] = b"netcap|batch|v1";

pub mod permissions {
    /// Directories created for client streams.
    pub const DIR: u32 = 0o755;
    /// Private key files.
    pub const PRIV_KEY: u32 = 0o600;
}
