use std::io::{self, Write};

pub fn write_stdout_text(text: &str) -> io::Result<()> {
    write_chunks(&[text.as_bytes()])
}

pub fn write_stdout_line(text: &str) -> io::Result<()> {
    write_chunks(&[text.as_bytes(), b"\n"])
}

/// Writing to a closed pipe (e.g. `khaata ... | head`) is treated as success
/// so output paths never panic mid-stream.
fn write_chunks(chunks: &[&[u8]]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    for chunk in chunks {
        tolerate_broken_pipe(stdout.write_all(chunk))?;
    }
    tolerate_broken_pipe(stdout.flush())
}

fn tolerate_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
