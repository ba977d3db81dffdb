use std::time::Duration;

/// Default time allowed for connecting to the server.
pub const DEFAULT_OPEN_TIMEOUT: Duration = Duration::from_secs(5);
/// Default time allowed for the whole authentication exchange.
pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(5);
/// Default time allowed for sending a command packet.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(3);
/// Default time allowed for the first reply packet.
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(3);
/// Default tolerance for each further reply packet.
pub const DEFAULT_SEQ_TIMEOUT: Duration = Duration::from_millis(200);

/// Timeout profile for one session.
///
/// Each value becomes an absolute deadline on the connection at the start of
/// the phase it governs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Time allowed for connecting to the server. Default: 5s.
    pub open_timeout: Duration,
    /// Time allowed for complete authentication. Default: 5s.
    pub auth_timeout: Duration,
    /// Time allowed for sending a command packet. Default: 3s.
    pub send_timeout: Duration,
    /// Time allowed for receiving the first reply packet. Default: 3s.
    pub reply_timeout: Duration,
    /// Added to the time the previous reply packet took to arrive to give
    /// the limit for the next one. Default: 200ms.
    pub seq_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            open_timeout: DEFAULT_OPEN_TIMEOUT,
            auth_timeout: DEFAULT_AUTH_TIMEOUT,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
            seq_timeout: DEFAULT_SEQ_TIMEOUT,
        }
    }
}
