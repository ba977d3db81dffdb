use std::fmt;
use std::io;

use rgon_session::{Cause, RconError, Severity};
use rgon_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::UnexpectedEof | io::ErrorKind::BrokenPipe => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn rcon_error(context: &str, err: RconError) -> CliError {
    let code = if err.is_timeout() {
        TIMEOUT
    } else {
        match (err.severity(), err.root_cause()) {
            (Severity::Fatal, Cause::Protocol(_)) => PERMISSION_DENIED,
            (Severity::Fatal, Cause::Transport(TransportError::InvalidAddress { .. })) => USAGE,
            (Severity::Fatal, Cause::Output(_)) => FAILURE,
            (Severity::Fatal, _) => INTERNAL,
            (Severity::Broken, _) => TRANSPORT_ERROR,
            (Severity::Ok | Severity::Warning, _) => FAILURE,
        }
    };
    CliError::new(code, format!("{context}: {err}"))
}
