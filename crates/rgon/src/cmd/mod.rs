use std::io::{self, BufRead};
use std::time::Duration;

use clap::{Args, Subcommand};
use rgon_session::{Session, SessionConfig};
use tracing::debug;

use crate::exit::{io_error, rcon_error, CliError, CliResult, USAGE};
use crate::input::prompt;
use crate::output::OutputFormat;

pub mod exec;
pub mod shell;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read commands from stdin, one per line, and print each reply.
    Shell,
    /// Run a single command and exit.
    Exec(ExecArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, connection: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Shell => shell::run(connection, format),
        Command::Exec(args) => exec::run(args, connection, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// IP or hostname of the server, with optional :port (prompted if absent).
    #[arg(long, short = 'a', env = "RGON_ADDRESS", global = true)]
    pub address: Option<String>,
    /// RCON password (prompted if absent).
    #[arg(
        long,
        short = 'p',
        env = "RGON_PASSWORD",
        hide_env_values = true,
        global = true
    )]
    pub password: Option<String>,
    /// Time allowed to establish the TCP connection (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s", global = true)]
    pub open_timeout: String,
    /// Time allowed for the authentication exchange.
    #[arg(long, default_value = "5s", global = true)]
    pub auth_timeout: String,
    /// Time allowed to send one command.
    #[arg(long, default_value = "3s", global = true)]
    pub send_timeout: String,
    /// Time allowed for the first reply packet.
    #[arg(long, default_value = "3s", global = true)]
    pub reply_timeout: String,
    /// Extra time allowed for each further reply fragment.
    #[arg(long, default_value = "200ms", global = true)]
    pub seq_timeout: String,
    /// Reconnect attempts after the connection breaks.
    #[arg(long, default_value_t = 5, global = true)]
    pub retries: u32,
}

impl ConnectionArgs {
    pub fn session_config(&self) -> CliResult<SessionConfig> {
        Ok(SessionConfig {
            open_timeout: parse_timeout("open-timeout", &self.open_timeout)?,
            auth_timeout: parse_timeout("auth-timeout", &self.auth_timeout)?,
            send_timeout: parse_timeout("send-timeout", &self.send_timeout)?,
            reply_timeout: parse_timeout("reply-timeout", &self.reply_timeout)?,
            seq_timeout: parse_timeout("seq-timeout", &self.seq_timeout)?,
        })
    }
}

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Console command; remaining words are joined with spaces.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Fill in a missing address or password from `input`, then connect.
pub(crate) fn open_session<R: BufRead + ?Sized>(
    connection: &ConnectionArgs,
    input: &mut R,
) -> CliResult<Session> {
    let config = connection.session_config()?;
    let mut stdout = io::stdout();

    let address = match &connection.address {
        Some(address) => address.clone(),
        None => prompt("address", input, &mut stdout)
            .map_err(|err| io_error("failed reading address", err))?,
    };
    let password = match &connection.password {
        Some(password) => password.clone(),
        None => prompt("password", input, &mut stdout)
            .map_err(|err| io_error("failed reading password", err))?,
    };

    debug!(address = %address, "connecting");
    Session::connect_with_config(&address, password, config)
        .map_err(|err| rcon_error("connect failed", err))
}

/// Read a timeout flag value: whole seconds or milliseconds, with an
/// optional `s` or `ms` suffix. A bare number means seconds.
fn parse_timeout(flag: &str, value: &str) -> CliResult<Duration> {
    let value = value.trim();
    let split = value.find(|c: char| !c.is_ascii_digit()).unwrap_or(value.len());
    let (digits, unit) = value.split_at(split);

    let amount: u64 = match digits.parse() {
        Ok(amount) => amount,
        Err(_) => {
            return Err(CliError::new(
                USAGE,
                format!("--{flag} expects a duration such as 3s or 200ms, got {value:?}"),
            ))
        }
    };
    let timeout = match unit {
        "" | "s" => Duration::from_secs(amount),
        "ms" => Duration::from_millis(amount),
        other => {
            return Err(CliError::new(
                USAGE,
                format!("--{flag} has unknown unit {other:?} (use s or ms)"),
            ))
        }
    };

    if timeout.is_zero() {
        return Err(CliError::new(USAGE, format!("--{flag} must be longer than zero")));
    }
    Ok(timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection() -> ConnectionArgs {
        ConnectionArgs {
            address: None,
            password: None,
            open_timeout: "5s".to_string(),
            auth_timeout: "5s".to_string(),
            send_timeout: "3s".to_string(),
            reply_timeout: "3s".to_string(),
            seq_timeout: "200ms".to_string(),
            retries: 5,
        }
    }

    #[test]
    fn timeout_units() {
        let parse = |value| parse_timeout("seq-timeout", value).unwrap();
        assert_eq!(parse("200ms"), Duration::from_millis(200));
        assert_eq!(parse("3s"), Duration::from_secs(3));
        assert_eq!(parse(" 5 "), Duration::from_secs(5));
    }

    #[test]
    fn timeout_errors_name_the_flag() {
        let err = parse_timeout("reply-timeout", "soon").unwrap_err();
        assert_eq!(err.code, USAGE);
        assert!(err.to_string().contains("--reply-timeout"), "{err}");

        let err = parse_timeout("open-timeout", "2m").unwrap_err();
        assert!(err.to_string().contains("unknown unit \"m\""), "{err}");

        let err = parse_timeout("seq-timeout", "0ms").unwrap_err();
        assert!(err.to_string().contains("--seq-timeout must be longer"), "{err}");

        assert!(parse_timeout("auth-timeout", "").is_err());
        assert!(parse_timeout("auth-timeout", "-1s").is_err());
    }

    #[test]
    fn default_flags_match_default_config() {
        assert_eq!(connection().session_config().unwrap(), SessionConfig::default());
    }

    #[test]
    fn bad_timeout_flag_is_usage_error() {
        let args = ConnectionArgs {
            seq_timeout: "soon".to_string(),
            ..connection()
        };
        let err = args.session_config().unwrap_err();
        assert_eq!(err.code, USAGE);
        assert!(err.to_string().contains("--seq-timeout"), "{err}");
    }
}
