use std::io::{self, Write};

use clap::ValueEnum;
use rgon_session::CommandReply;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Reply text as the server sent it, followed by a newline.
    Raw,
    /// One JSON object per command.
    Json,
}

#[derive(Serialize)]
struct ReplyOutput<'a> {
    command: &'a str,
    reply: String,
    packets: usize,
    reconnected: bool,
    warnings: Vec<String>,
}

/// Write the JSON summary of one command on its own line.
pub fn write_reply_json<W: Write + ?Sized>(
    out: &mut W,
    command: &str,
    text: &[u8],
    reply: &CommandReply,
) -> io::Result<()> {
    let record = ReplyOutput {
        command,
        reply: String::from_utf8_lossy(text).into_owned(),
        packets: reply.packets,
        reconnected: reply.reconnected,
        warnings: reply.warnings.iter().map(ToString::to_string).collect(),
    };
    serde_json::to_writer(&mut *out, &record)?;
    writeln!(out)?;
    out.flush()
}
