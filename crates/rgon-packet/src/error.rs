/// Errors that can occur while reading or writing packets.
#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    /// The stream ended partway through the 4-byte size tag.
    #[error("packet size tag unreadable ({read} of 4 bytes)")]
    SizeTagUnreadable { read: usize },

    /// The declared size exceeds the protocol maximum.
    #[error("packet size overflow ({size} bytes, max {max})")]
    SizeOverflow { size: i32, max: i32 },

    /// The declared size is below the protocol minimum.
    #[error("packet size underflow ({size} bytes, min {min})")]
    SizeUnderflow { size: i32, min: i32 },

    /// The sink stopped accepting bytes partway through the encoded packet.
    #[error("incompletely wrote packet to stream ({written} of {expected} bytes)")]
    ShortWrite { written: usize, expected: usize },

    /// The read deadline expired after part of a packet had been consumed,
    /// so the stream no longer starts at a packet boundary.
    #[error("packet truncated by read deadline ({read} of {expected} bytes)")]
    Truncated { read: usize, expected: usize },

    /// The peer closed the stream before a complete packet arrived.
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// An I/O error occurred while reading or writing packets.
    #[error("packet I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PacketError {
    /// True when the error is the stream's read or write deadline expiring
    /// before any byte of the packet was transferred.
    ///
    /// [`PacketError::Truncated`] is not a timeout in this sense: the stream
    /// it came from is misaligned and must not be read again.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            PacketError::Io(err) if matches!(
                err.kind(),
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
            )
        )
    }
}

pub type Result<T> = std::result::Result<T, PacketError>;
