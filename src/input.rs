use std::io::{self, BufRead, Write};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Something that prompts for and returns one line of input at a time.
pub trait LineSource {
    /// Returns `Ok(None)` at end of input. The line has no trailing newline.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Line editing for terminal sessions.
pub struct Editor {
    inner: DefaultEditor,
}

impl Editor {
    pub fn new() -> Result<Self, ReadlineError> {
        Ok(Editor { inner: DefaultEditor::new()? })
    }
}

impl LineSource for Editor {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match self.inner.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.inner.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            // Ctrl-C abandons the line, not the session.
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::other(e)),
        }
    }
}

/// Plain buffered input, used when stdin is not a terminal.
pub struct Buffered<R, W> {
    input: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> Buffered<R, W> {
    pub fn new(input: R, prompt_out: W) -> Self {
        Buffered { input, prompt_out }
    }
}

impl<R: BufRead, W: Write> LineSource for Buffered<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompt_out.write_all(prompt.as_bytes())?;
        self.prompt_out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_buffered_strips_newlines() {
        let mut out = Vec::new();
        let mut source = Buffered::new(Cursor::new("one\r\ntwo"), &mut out);
        assert_eq!(source.read_line("% ").unwrap().as_deref(), Some("one"));
        assert_eq!(source.read_line("% ").unwrap().as_deref(), Some("two"));
        assert_eq!(source.read_line("% ").unwrap(), None);
    }
}
