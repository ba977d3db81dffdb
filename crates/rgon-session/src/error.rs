//! Error model for RCON sessions.
//!
//! Every failure that leaves the session is an [`RconError`]: the operation
//! that was running, the server address, and a [`Cause`]. A cause can be
//! another `RconError` (an authenticate step wrapping the receive that
//! failed), a protocol violation detected by the client, or a lower-layer
//! packet, transport or I/O error.
//!
//! [`Severity`] tells the caller what to do about it:
//!
//! | Severity  | Meaning                                 | Caller action        |
//! |-----------|-----------------------------------------|----------------------|
//! | `Ok`      | no error                                | continue             |
//! | `Warning` | unexpected but harmless server behavior | log and continue     |
//! | `Broken`  | connection unusable                     | reconnect and retry  |
//! | `Fatal`   | configuration or local problem          | give up / re-prompt  |

use std::fmt;
use std::io;

use rgon_packet::PacketError;
use rgon_transport::TransportError;

/// How bad an error is, ordered from harmless to unrecoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Ok,
    Warning,
    Broken,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Ok => "ok",
            Severity::Warning => "warning",
            Severity::Broken => "broken",
            Severity::Fatal => "fatal",
        })
    }
}

/// A client-detected violation of the expected exchange.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProtocolError {
    message: String,
    severity: Severity,
}

impl ProtocolError {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Fatal)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}

/// The operation an [`RconError`] was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Connect,
    Authenticate,
    Send,
    Receive,
    Output,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Op::Connect => "connect",
            Op::Authenticate => "authenticate session",
            Op::Send => "send packet",
            Op::Receive => "receive packet",
            Op::Output => "write output",
        })
    }
}

/// What went wrong underneath an [`RconError`].
#[derive(Debug, thiserror::Error)]
pub enum Cause {
    /// A failed inner operation.
    #[error(transparent)]
    Wrapped(Box<RconError>),

    /// The server did something the client did not expect.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Packet framing or packet I/O failed.
    #[error(transparent)]
    Packet(#[from] PacketError),

    /// Address handling or dialing failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Raw I/O failure on the connection.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The caller's output sink rejected reply text.
    #[error("output sink failed: {0}")]
    Output(io::Error),

    /// The operation needs a connection and the session has none.
    #[error("session is disconnected")]
    Disconnected,
}

impl Cause {
    /// Classify this cause, following wrapped errors down to the root.
    pub fn severity(&self) -> Severity {
        match self {
            Cause::Wrapped(inner) => inner.severity(),
            Cause::Protocol(err) => err.severity(),
            Cause::Packet(PacketError::Io(err)) => io_severity(err),
            Cause::Packet(_) => Severity::Broken,
            Cause::Transport(TransportError::InvalidAddress { .. }) => Severity::Fatal,
            Cause::Transport(TransportError::Resolve { .. }) => Severity::Broken,
            Cause::Transport(TransportError::Connect { source, .. }) => io_severity(source),
            Cause::Transport(TransportError::Io(err)) => io_severity(err),
            Cause::Io(err) => io_severity(err),
            Cause::Output(_) => Severity::Fatal,
            Cause::Disconnected => Severity::Broken,
        }
    }
}

/// A failed session operation: `rcon <op> <addr>: <cause>`.
#[derive(Debug, thiserror::Error)]
#[error("rcon {op} {addr}: {cause}")]
pub struct RconError {
    op: Op,
    addr: String,
    #[source]
    cause: Cause,
}

impl RconError {
    pub fn new(op: Op, addr: impl Into<String>, cause: impl Into<Cause>) -> Self {
        Self {
            op,
            addr: addr.into(),
            cause: cause.into(),
        }
    }

    /// Wrap this error as the cause of an outer operation on the same address.
    pub fn wrap(self, op: Op) -> Self {
        Self {
            op,
            addr: self.addr.clone(),
            cause: Cause::Wrapped(Box::new(self)),
        }
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    /// The innermost cause that is not itself an `RconError`.
    pub fn root_cause(&self) -> &Cause {
        match &self.cause {
            Cause::Wrapped(inner) => inner.root_cause(),
            other => other,
        }
    }

    pub fn severity(&self) -> Severity {
        self.cause.severity()
    }

    /// True when a read or write deadline expired.
    pub fn is_timeout(&self) -> bool {
        match self.root_cause() {
            Cause::Packet(err) => err.is_timeout(),
            Cause::Io(err) => is_timeout_kind(err.kind()),
            Cause::Transport(TransportError::Connect { source, .. }) => {
                is_timeout_kind(source.kind())
            }
            _ => false,
        }
    }

    /// True when the server closed the connection.
    pub fn is_end_of_stream(&self) -> bool {
        match self.root_cause() {
            Cause::Packet(PacketError::ConnectionClosed) => true,
            Cause::Packet(PacketError::Io(err)) | Cause::Io(err) => {
                err.kind() == io::ErrorKind::UnexpectedEof
            }
            _ => false,
        }
    }
}

/// Severity of an optional error; `None` is [`Severity::Ok`].
pub fn classify(err: Option<&RconError>) -> Severity {
    err.map_or(Severity::Ok, RconError::severity)
}

fn io_severity(err: &io::Error) -> Severity {
    use io::ErrorKind::*;

    match err.kind() {
        UnexpectedEof | BrokenPipe | ConnectionRefused | ConnectionReset | ConnectionAborted
        | NotConnected | AddrInUse | AddrNotAvailable | TimedOut | WouldBlock | Interrupted
        | HostUnreachable | NetworkUnreachable | NetworkDown => Severity::Broken,
        _ => Severity::Fatal,
    }
}

fn is_timeout_kind(kind: io::ErrorKind) -> bool {
    matches!(kind, io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

pub type Result<T> = std::result::Result<T, RconError>;
