//! RCON session engine.
//!
//! This is the layer callers talk to. A [`Session`] owns one connection,
//! authenticates it, runs console commands and collects their possibly
//! multi-packet replies, and reconnects when the server drops it. Failures
//! come back as [`RconError`]s whose [`Severity`] says whether to retry,
//! reconnect or give up.

pub mod concmd;
pub mod config;
pub mod error;
pub mod session;

pub use concmd::{changed_password, parse_console_commands, ConsoleCommand, PASSWORD_VARIABLE};
pub use config::SessionConfig;
pub use error::{classify, Cause, Op, ProtocolError, RconError, Result, Severity};
pub use session::{CommandReply, Session};
