//! Remote console client for Source-engine game servers.
//!
//! rgon speaks the RCON protocol: authenticate once per connection, then send
//! console commands and stream back their text replies.
//!
//! # Crate Structure
//!
//! - [`transport`]: TCP dialing, default port handling, absolute deadlines
//! - [`packet`]: Packet codec and blocking packet reads/writes
//! - [`session`]: Authenticated sessions, reply collection, error severity
//!
//! ```no_run
//! use rgon::{Session, Severity};
//!
//! let mut session = Session::connect("192.0.2.10", "secret")?;
//! match session.command("status", &mut std::io::stdout()) {
//!     Ok(_) => {}
//!     Err(err) if err.severity() == Severity::Broken => session.reconnect()?,
//!     Err(err) => return Err(err),
//! }
//! # Ok::<(), rgon::RconError>(())
//! ```

/// Re-export transport types.
pub mod transport {
    pub use rgon_transport::*;
}

/// Re-export packet types.
pub mod packet {
    pub use rgon_packet::*;
}

/// Re-export session types.
pub mod session {
    pub use rgon_session::*;
}

pub use rgon_session::{classify, CommandReply, RconError, Session, SessionConfig, Severity};
