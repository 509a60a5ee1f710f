//! framing/mod.rs
//! Length-prefixed record frames.
//!
//! Wire layout of one frame:
//! ```text
//! [ uvarint len ][ len bytes of encoded record ]
//! ```
//!
//! Design notes:
//! - The prefix is the protobuf delimited-message varint, so containers stay
//!   readable by any protobuf tooling.
//! - Streaming reads separate clean EOF, truncated EOF and corruption.
//!   In-memory splitting is strict: a short trailing frame is corruption.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
