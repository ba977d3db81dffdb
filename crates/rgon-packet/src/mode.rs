//! Packet mode values.
//!
//! The protocol reuses the value 2 for an exec-command request and for an
//! auth response. Only the client sends exec-command and only the server
//! sends auth responses, so the meaning of a mode depends on which way the
//! packet travelled.

/// Reply carrying command output (server to client).
pub const SERVERDATA_RESPONSE_VALUE: i32 = 0;

/// Outcome of an auth request (server to client).
pub const SERVERDATA_AUTH_RESPONSE: i32 = 2;

/// Console command to execute (client to server).
pub const SERVERDATA_EXECCOMMAND: i32 = 2;

/// Password submission (client to server).
pub const SERVERDATA_AUTH: i32 = 3;

/// Which way a packet travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Client to server.
    Outgoing,
    /// Server to client.
    Incoming,
}

/// Returns a human-readable name for a mode seen in the given direction.
pub fn mode_name(mode: i32, direction: Direction) -> &'static str {
    match (direction, mode) {
        (Direction::Outgoing, SERVERDATA_AUTH) => "AUTH",
        (Direction::Outgoing, SERVERDATA_EXECCOMMAND) => "EXECCOMMAND",
        (Direction::Incoming, SERVERDATA_AUTH_RESPONSE) => "AUTH_RESPONSE",
        (Direction::Incoming, SERVERDATA_RESPONSE_VALUE) => "RESPONSE_VALUE",
        _ => "UNKNOWN",
    }
}
