use std::fmt;
use std::io::Write;
use std::time::Instant;

use rgon_packet::{
    read_packet, write_packet, Packet, AUTH_FAILED_ID, END_PACKET_SIZE, SERVERDATA_AUTH,
    SERVERDATA_AUTH_RESPONSE, SERVERDATA_EXECCOMMAND,
};
use rgon_transport::{with_default_port, RconStream};
use tracing::{debug, info, warn};

use crate::concmd::changed_password;
use crate::config::SessionConfig;
use crate::error::{Cause, Op, ProtocolError, RconError, Result, Severity};

enum State {
    Disconnected,
    Ready(RconStream),
}

/// What a completed [`Session::command`] did.
#[derive(Debug, Default)]
pub struct CommandReply {
    /// Reply packets received and written to the output sink.
    pub packets: usize,
    /// The session reconnected while handling the command.
    pub reconnected: bool,
    /// Warning-severity problems seen while collecting the reply.
    pub warnings: Vec<RconError>,
}

/// One authenticated connection to one RCON server.
///
/// Blocking and single-caller: each call runs to completion, failure or
/// deadline before the next may start. Any broken-severity failure drops the
/// connection, after which [`Session::reconnect`] must succeed before
/// further commands are accepted.
pub struct Session {
    address: String,
    password: String,
    request_id: i32,
    config: SessionConfig,
    state: State,
}

impl Session {
    /// Create a disconnected session for `address`.
    ///
    /// The default port is appended when the address has none.
    pub fn new(address: &str, password: impl Into<String>, config: SessionConfig) -> Result<Self> {
        let normalized =
            with_default_port(address).map_err(|err| RconError::new(Op::Connect, address, err))?;
        Ok(Self {
            address: normalized,
            password: password.into(),
            request_id: 0,
            config,
            state: State::Disconnected,
        })
    }

    /// Connect and authenticate using default timeouts.
    pub fn connect(address: &str, password: impl Into<String>) -> Result<Self> {
        Self::connect_with_config(address, password, SessionConfig::default())
    }

    /// Connect and authenticate with an explicit timeout profile.
    pub fn connect_with_config(
        address: &str,
        password: impl Into<String>,
        config: SessionConfig,
    ) -> Result<Self> {
        let mut session = Self::new(address, password, config)?;
        session.reconnect()?;
        Ok(session)
    }

    /// Server address including port.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Password used by the next authentication.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Replace the password used by the next authentication.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    /// Request id of the most recently sent packet.
    pub fn request_id(&self) -> i32 {
        self.request_id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    /// Run a console command, streaming reply text into `output`.
    ///
    /// The protocol has no end-of-reply marker. Collection stops at the first
    /// packet declared smaller than [`END_PACKET_SIZE`], or when a further
    /// fragment fails to arrive within the time the previous one took plus
    /// `seq_timeout`. A command that sets `rcon_password` expects no reply:
    /// the new password is adopted and the session reconnects with it.
    pub fn command<W: Write + ?Sized>(
        &mut self,
        text: &str,
        output: &mut W,
    ) -> Result<CommandReply> {
        let deadline = Instant::now() + self.config.send_timeout;
        ready(&mut self.state, Op::Send, &self.address)?.set_deadline(Some(deadline));
        if let Err(err) = self.send(SERVERDATA_EXECCOMMAND, text) {
            return Err(self.fail(err));
        }

        if let Some(password) = changed_password(text) {
            info!(address = %self.address, "command changes rcon password, reconnecting");
            self.password = password;
            self.reconnect()?;
            return Ok(CommandReply {
                reconnected: true,
                ..CommandReply::default()
            });
        }

        let mut reply = CommandReply::default();
        let mut timeout = self.config.reply_timeout;
        loop {
            let start = Instant::now();
            ready(&mut self.state, Op::Receive, &self.address)?
                .set_deadline(Some(start + timeout));
            let received = self.recv();
            timeout = start.elapsed() + self.config.seq_timeout;

            let (packet, mismatch) = match received {
                Ok(received) => received,
                Err(err) if err.is_end_of_stream() => {
                    info!(address = %self.address, "connection closed by server, reconnecting");
                    self.reconnect()?;
                    reply.reconnected = true;
                    return Ok(reply);
                }
                Err(err) if reply.packets > 0 && err.is_timeout() => {
                    debug!(packets = reply.packets, "no further reply fragments");
                    break;
                }
                Err(err) => return Err(self.fail(err)),
            };

            if let Err(err) = output
                .write_all(packet.body().as_bytes())
                .and_then(|()| output.flush())
            {
                let err = RconError::new(Op::Output, &self.address, Cause::Output(err));
                return Err(self.fail(err));
            }
            reply.packets += 1;

            if let Some(warning) = mismatch {
                warn!(
                    expected = self.request_id,
                    got = packet.request_id(),
                    "reply request id mismatch"
                );
                reply.warnings.push(warning);
            }

            if packet.size() < END_PACKET_SIZE {
                break;
            }
        }

        Ok(reply)
    }

    /// Drop any existing connection, dial again and re-authenticate with the
    /// current password.
    ///
    /// The session is left disconnected if either step fails.
    pub fn reconnect(&mut self) -> Result<()> {
        self.close();

        debug!(address = %self.address, "dialing rcon server");
        let stream = RconStream::connect(&self.address, self.config.open_timeout)
            .map_err(|err| RconError::new(Op::Connect, &self.address, err))?;
        self.state = State::Ready(stream);

        if let Err(err) = self.authenticate() {
            self.close();
            return Err(err);
        }
        info!(address = %self.address, "rcon session authenticated");
        Ok(())
    }

    /// Close the connection. Does nothing when already disconnected.
    pub fn close(&mut self) {
        if let State::Ready(stream) = std::mem::replace(&mut self.state, State::Disconnected) {
            debug!(address = %self.address, "closing rcon connection");
            if let Err(err) = stream.shutdown() {
                debug!(error = %err, "connection shutdown failed");
            }
        }
    }

    fn authenticate(&mut self) -> Result<()> {
        let deadline = Instant::now() + self.config.auth_timeout;
        ready(&mut self.state, Op::Authenticate, &self.address)?.set_deadline(Some(deadline));

        let password = self.password.clone();
        self.send(SERVERDATA_AUTH, &password)
            .map_err(|err| err.wrap(Op::Authenticate))?;

        // A request id mismatch is expected here and not worth reporting.
        let (mut reply, _) = self.recv().map_err(|err| err.wrap(Op::Authenticate))?;

        // Some servers send an empty RESPONSE_VALUE before the AUTH_RESPONSE.
        while reply.mode() != SERVERDATA_AUTH_RESPONSE {
            if !reply.is_empty() {
                let problem = format!(
                    "received unexpected response: `{}{}`",
                    reply.body(),
                    reply.body2()
                );
                return Err(RconError::new(
                    Op::Authenticate,
                    &self.address,
                    ProtocolError::warning(problem),
                ));
            }
            debug!(mode = reply.mode(), "skipping empty packet ahead of auth response");
            reply = self.recv().map_err(|err| err.wrap(Op::Authenticate))?.0;
        }

        if reply.request_id() == AUTH_FAILED_ID {
            return Err(RconError::new(
                Op::Authenticate,
                &self.address,
                ProtocolError::fatal("bad password"),
            ));
        }
        Ok(())
    }

    fn send(&mut self, mode: i32, body: &str) -> Result<()> {
        self.request_id = self.request_id.wrapping_add(1);
        let packet = Packet::new(self.request_id, mode, body);
        let stream = ready(&mut self.state, Op::Send, &self.address)?;
        write_packet(&packet, stream).map_err(|err| RconError::new(Op::Send, &self.address, err))
    }

    /// Receive one packet. A request id that does not match the last one
    /// sent comes back alongside the packet as a warning.
    fn recv(&mut self) -> Result<(Packet, Option<RconError>)> {
        let stream = ready(&mut self.state, Op::Receive, &self.address)?;
        let packet =
            read_packet(stream).map_err(|err| RconError::new(Op::Receive, &self.address, err))?;

        let mismatch = (packet.request_id() != self.request_id).then(|| {
            RconError::new(
                Op::Receive,
                &self.address,
                ProtocolError::warning("mismatched request ID from server"),
            )
        });
        Ok((packet, mismatch))
    }

    /// Drop the connection if `err` leaves it unusable.
    fn fail(&mut self, err: RconError) -> RconError {
        if err.severity() >= Severity::Broken {
            debug!(error = %err, "dropping connection after failure");
            self.close();
        }
        err
    }
}

fn ready<'a>(state: &'a mut State, op: Op, address: &str) -> Result<&'a mut RconStream> {
    match state {
        State::Ready(stream) => Ok(stream),
        State::Disconnected => Err(RconError::new(op, address, Cause::Disconnected)),
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("address", &self.address)
            .field(
                "password",
                &format_args!("<redacted:{} bytes>", self.password.len()),
            )
            .field("request_id", &self.request_id)
            .field("connected", &self.is_connected())
            .field("config", &self.config)
            .finish()
    }
}
