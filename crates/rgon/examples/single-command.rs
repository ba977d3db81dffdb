//! Run one console command and print the reply.
//!
//! Run with:
//!   cargo run --example single-command -- 192.0.2.10:27015 secret status

use std::io::Write;

use rgon::{Session, Severity};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let (Some(address), Some(password)) = (args.next(), args.next()) else {
        eprintln!("usage: single-command <address> <password> <command...>");
        std::process::exit(64);
    };
    let command = args.collect::<Vec<_>>().join(" ");

    let mut session = Session::connect(&address, password)?;
    eprintln!("Connected to {}", session.address());

    let mut stdout = std::io::stdout().lock();
    let reply = match session.command(&command, &mut stdout) {
        Ok(reply) => reply,
        Err(err) if err.severity() == Severity::Broken => {
            eprintln!("{err}; retrying once");
            session.reconnect()?;
            session.command(&command, &mut stdout)?
        }
        Err(err) => return Err(err.into()),
    };
    writeln!(stdout)?;

    for warning in &reply.warnings {
        eprintln!("warning: {warning}");
    }
    session.close();
    Ok(())
}
