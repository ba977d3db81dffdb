use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{Result, TransportError};

/// A connected RCON stream implementing `Read` and `Write`.
///
/// Reads and writes are bounded by an absolute deadline set with
/// [`RconStream::set_deadline`]. Each call arms the socket timeout with the
/// time remaining, so a sequence of partial reads cannot outlive the deadline.
pub struct RconStream {
    inner: TcpStream,
    deadline: Option<Instant>,
}

impl RconStream {
    /// Resolve `addr` and connect to the first address that accepts within `timeout`.
    pub fn connect(addr: &str, timeout: Duration) -> Result<Self> {
        let candidates: Vec<SocketAddr> = addr
            .to_socket_addrs()
            .map_err(|source| TransportError::Resolve {
                addr: addr.to_string(),
                source,
            })?
            .collect();

        let mut last_err = None;
        for candidate in candidates {
            match TcpStream::connect_timeout(&candidate, timeout) {
                Ok(stream) => {
                    debug!(%candidate, "connected to rcon server");
                    return Self::from_tcp(stream);
                }
                Err(err) => {
                    debug!(%candidate, error = %err, "connect attempt failed");
                    last_err = Some(err);
                }
            }
        }

        Err(match last_err {
            Some(source) => TransportError::Connect {
                addr: addr.to_string(),
                source,
            },
            None => TransportError::Resolve {
                addr: addr.to_string(),
                source: io::Error::new(ErrorKind::NotFound, "no addresses found"),
            },
        })
    }

    /// Wrap an already connected TCP stream.
    pub fn from_tcp(stream: TcpStream) -> Result<Self> {
        stream.set_nodelay(true)?;
        Ok(Self {
            inner: stream,
            deadline: None,
        })
    }

    /// Set the absolute deadline for subsequent reads and writes.
    ///
    /// `None` removes the limit.
    pub fn set_deadline(&mut self, deadline: Option<Instant>) {
        self.deadline = deadline;
    }

    /// Shut down both halves of the connection.
    pub fn shutdown(&self) -> Result<()> {
        match self.inner.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotConnected => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn remaining(&self) -> io::Result<Option<Duration>> {
        let Some(deadline) = self.deadline else {
            return Ok(None);
        };
        match deadline.checked_duration_since(Instant::now()) {
            Some(left) if !left.is_zero() => Ok(Some(left)),
            _ => Err(io::Error::new(ErrorKind::TimedOut, "deadline exceeded")),
        }
    }
}

impl Read for RconStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining()?;
        self.inner.set_read_timeout(remaining)?;
        self.inner.read(buf)
    }
}

impl Write for RconStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let remaining = self.remaining()?;
        self.inner.set_write_timeout(remaining)?;
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl std::fmt::Debug for RconStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RconStream")
            .field("peer", &self.inner.peer_addr().ok())
            .field("deadline", &self.deadline)
            .finish()
    }
}
