use std::io::{self, BufRead, Write};

/// Read one line with its line terminator removed. `Ok(None)` at end of input.
pub fn read_line<R: BufRead + ?Sized>(source: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if source.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(len);
    Ok(Some(line))
}

/// Print `[label]: ` and read the answer.
pub fn prompt<R, W>(label: &str, source: &mut R, out: &mut W) -> io::Result<String>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    write!(out, "[{label}]: ")?;
    out.flush()?;
    read_line(source)?.ok_or_else(|| {
        io::Error::new(io::ErrorKind::UnexpectedEof, format!("no {label} given"))
    })
}
