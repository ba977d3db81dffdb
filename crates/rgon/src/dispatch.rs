use std::io::Write;

use rgon_session::{CommandReply, RconError, Session, Severity};
use tracing::{debug, info, warn};

use crate::exit::{io_error, rcon_error, CliResult, FAILURE, SUCCESS};
use crate::output::{write_reply_json, OutputFormat};

/// The parts of a session the dispatcher drives.
pub trait Remote {
    fn run(&mut self, command: &str, output: &mut dyn Write) -> Result<CommandReply, RconError>;
    fn reconnect(&mut self) -> Result<(), RconError>;
}

impl Remote for Session {
    fn run(&mut self, command: &str, output: &mut dyn Write) -> Result<CommandReply, RconError> {
        self.command(command, output)
    }

    fn reconnect(&mut self) -> Result<(), RconError> {
        Session::reconnect(self)
    }
}

/// Destination for reply text.
pub enum ReplySink<'a> {
    /// Text goes straight through as it arrives.
    Streamed(&'a mut dyn Write),
    /// Text is held until the command completes.
    Buffered(Vec<u8>),
}

impl ReplySink<'_> {
    /// Drop held text from an attempt that failed. Streamed text is already out.
    fn restart(&mut self) {
        if let ReplySink::Buffered(buf) = self {
            buf.clear();
        }
    }
}

impl Write for ReplySink<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            ReplySink::Streamed(out) => out.write(buf),
            ReplySink::Buffered(held) => held.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            ReplySink::Streamed(out) => out.flush(),
            ReplySink::Buffered(_) => Ok(()),
        }
    }
}

/// Run `command`. If the connection turns out to be broken, reconnect with
/// up to `retries` attempts and run it once more.
///
/// Operator-facing notices go to `notices`; warnings and fatal errors are
/// returned to the caller untouched.
pub fn dispatch<R: Remote + ?Sized>(
    remote: &mut R,
    command: &str,
    output: &mut ReplySink<'_>,
    retries: u32,
    notices: &mut dyn Write,
) -> Result<CommandReply, RconError> {
    let err = match remote.run(command, output) {
        Ok(reply) => return Ok(reply),
        Err(err) if err.severity() == Severity::Broken => err,
        Err(err) => return Err(err),
    };

    let _ = writeln!(notices, "{err}");
    reconnect(remote, retries, err, notices)?;
    output.restart();
    remote.run(command, output)
}

fn reconnect<R: Remote + ?Sized>(
    remote: &mut R,
    retries: u32,
    cause: RconError,
    notices: &mut dyn Write,
) -> Result<(), RconError> {
    let mut last = cause;
    for attempt in 1..=retries {
        let _ = writeln!(notices, "attempting to reconnect... {attempt} / {retries}");
        match remote.reconnect() {
            Ok(()) => {
                info!(attempt, "reconnected");
                return Ok(());
            }
            Err(err) if err.severity() == Severity::Fatal => {
                last = err;
                break;
            }
            Err(err) => {
                debug!(attempt, error = %err, "reconnect attempt failed");
                last = err;
            }
        }
    }
    let _ = writeln!(notices, "failed to reconnect");
    Err(last)
}

/// Run one console line and print its reply to `out` in `format`.
///
/// A warning-severity failure is reported on `notices` and yields
/// [`FAILURE`] without ending the caller's session; anything worse becomes a
/// [`CliError`](crate::exit::CliError).
pub fn execute<R: Remote + ?Sized>(
    remote: &mut R,
    line: &str,
    format: OutputFormat,
    retries: u32,
    out: &mut dyn Write,
    notices: &mut dyn Write,
) -> CliResult<i32> {
    let mut sink = match format {
        OutputFormat::Raw => ReplySink::Streamed(&mut *out),
        OutputFormat::Json => ReplySink::Buffered(Vec::new()),
    };

    let reply = match dispatch(remote, line, &mut sink, retries, notices) {
        Ok(reply) => reply,
        Err(err) if err.severity() <= Severity::Warning => {
            warn!(error = %err, "command ended early");
            let _ = writeln!(notices, "{err}");
            return Ok(FAILURE);
        }
        Err(err) => return Err(rcon_error("command failed", err)),
    };

    for warning in &reply.warnings {
        let _ = writeln!(notices, "{warning}");
    }

    let held = match sink {
        ReplySink::Streamed(_) => None,
        ReplySink::Buffered(text) => Some(text),
    };
    let written = match held {
        None => writeln!(out).and_then(|()| out.flush()),
        Some(text) => write_reply_json(out, line, &text, &reply),
    };
    written.map_err(|err| io_error("failed writing reply", err))?;
    Ok(SUCCESS)
}
