mod cmd;
mod dispatch;
mod exit;
mod input;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::{Command, ConnectionArgs};
use crate::logging::LogArgs;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "rgon",
    version,
    about = "Remote console client for Source-engine game servers"
)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Reply output format.
    #[arg(long, value_name = "FORMAT", default_value = "raw", global = true)]
    format: OutputFormat,

    #[command(flatten)]
    log: LogArgs,

    /// Defaults to `shell` when omitted.
    #[command(subcommand)]
    command: Option<Command>,
}

fn main() {
    let cli = Cli::parse();
    cli.log.install();

    let command = cli.command.unwrap_or(Command::Shell);
    let result = cmd::run(command, &cli.connection, cli.format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}
