/// Errors that can occur while establishing an RCON transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The address could not be split into host and port.
    #[error("invalid address {addr}: {reason}")]
    InvalidAddress { addr: String, reason: &'static str },

    /// Host name lookup failed or produced no addresses.
    #[error("failed to resolve {addr}: {source}")]
    Resolve {
        addr: String,
        source: std::io::Error,
    },

    /// Failed to connect to every resolved address.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
