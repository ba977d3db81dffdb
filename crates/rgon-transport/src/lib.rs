//! TCP transport for RCON sessions.
//!
//! This is the lowest layer of rgon: it resolves and dials a server address
//! and hands back an [`RconStream`], a blocking TCP stream whose reads and
//! writes are bounded by an absolute deadline rather than a per-call timeout.

pub mod address;
pub mod error;
pub mod stream;

pub use address::{with_default_port, DEFAULT_PORT};
pub use error::{Result, TransportError};
pub use stream::RconStream;
