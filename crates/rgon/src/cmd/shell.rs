use std::io;

use tracing::debug;

use crate::cmd::{open_session, ConnectionArgs};
use crate::dispatch::execute;
use crate::exit::{io_error, CliResult, SUCCESS};
use crate::input::read_line;
use crate::output::OutputFormat;

pub fn run(connection: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut session = open_session(connection, &mut input)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut notices = io::stderr();

    while let Some(line) =
        read_line(&mut input).map_err(|err| io_error("failed reading input", err))?
    {
        if line.trim().is_empty() {
            continue;
        }
        execute(
            &mut session,
            &line,
            format,
            connection.retries,
            &mut out,
            &mut notices,
        )?;
    }

    debug!("end of input");
    session.close();
    Ok(SUCCESS)
}
