use std::io;

use crate::cmd::{open_session, ConnectionArgs, ExecArgs};
use crate::dispatch::execute;
use crate::exit::CliResult;
use crate::output::OutputFormat;

pub fn run(args: ExecArgs, connection: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    let line = args.command.join(" ");
    let mut session = open_session(connection, &mut io::stdin().lock())?;

    let code = execute(
        &mut session,
        &line,
        format,
        connection.retries,
        &mut io::stdout().lock(),
        &mut io::stderr(),
    )?;
    session.close();
    Ok(code)
}
