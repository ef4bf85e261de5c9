use std::fs::File;
use std::io::{self, PipeReader, PipeWriter, Read, Write};
use std::path::Path;
use std::process::Stdio;

use crate::error::ShellError;
use crate::parser::{Link, Statement, STDERR, STDIN, STDOUT};

use super::path::expand_home;
use super::state::Shell;
use super::tasks::TaskKind;

/// Where a statement reads from.
#[derive(Debug, Default)]
pub enum Input {
    #[default]
    Inherit,
    File(File),
    Pipe(PipeReader),
}

/// Where a statement writes to.
#[derive(Debug)]
pub enum Output {
    Stdout,
    Stderr,
    File(File),
    Pipe(PipeWriter),
}

/// The three endpoints bound to a statement.
#[derive(Debug)]
pub struct Streams {
    pub stdin: Input,
    pub stdout: Output,
    pub stderr: Output,
}

impl Default for Streams {
    fn default() -> Self {
        Streams { stdin: Input::Inherit, stdout: Output::Stdout, stderr: Output::Stderr }
    }
}

impl Input {
    pub fn into_stdio(self) -> Stdio {
        match self {
            Input::Inherit => Stdio::inherit(),
            Input::File(f) => Stdio::from(f),
            Input::Pipe(r) => Stdio::from(r),
        }
    }
}

impl Output {
    pub fn into_stdio(self) -> Stdio {
        match self {
            Output::Stdout | Output::Stderr => Stdio::inherit(),
            Output::File(f) => Stdio::from(f),
            Output::Pipe(w) => Stdio::from(w),
        }
    }
}

impl Read for Input {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Input::Inherit => io::stdin().read(buf),
            Input::File(f) => f.read(buf),
            Input::Pipe(r) => r.read(buf),
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout => io::stdout().write(buf),
            Output::Stderr => io::stderr().write(buf),
            Output::File(f) => f.write(buf),
            Output::Pipe(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout => io::stdout().flush(),
            Output::Stderr => io::stderr().flush(),
            Output::File(f) => f.flush(),
            Output::Pipe(w) => w.flush(),
        }
    }
}

/// Open a file for an input redirect (stdin).
pub fn open_stdin_redirect(path: &Path) -> Result<File, ShellError> {
    let path = expand_home(path);
    File::open(&path).map_err(|source| ShellError::Redirect { path, source })
}

/// Create or truncate a file for an output redirect (stdout/stderr).
pub fn open_output_redirect(path: &Path) -> Result<File, ShellError> {
    let path = expand_home(path);
    File::create(&path).map_err(|source| ShellError::Redirect { path, source })
}

/// Bind streams for every statement of a batch, in order.
///
/// A piped statement writes into one OS pipe and its successor reads from
/// another; a tracked relay task copies bytes between the two and closes the
/// downstream end once the upstream one is exhausted. Any failure abandons the
/// whole batch before anything has been started.
pub fn wire(batch: &mut [Statement], shell: &Shell) -> Result<(), ShellError> {
    let count = batch.len();
    let mut piped_in: Option<PipeReader> = None;

    for (i, stmt) in batch.iter_mut().enumerate() {
        let mut streams = Streams::default();

        streams.stdin = match piped_in.take() {
            Some(reader) => Input::Pipe(reader),
            None => match stmt.redirect(STDIN) {
                Some(path) => Input::File(open_stdin_redirect(path)?),
                None => Input::Inherit,
            },
        };

        if stmt.link == Link::Pipe {
            if i + 1 == count {
                return Err(ShellError::Parse(format!("`{}` pipes into nothing", stmt.name)));
            }
            let (relay_source, upstream) = io::pipe().map_err(ShellError::Pipe)?;
            let (downstream, relay_sink) = io::pipe().map_err(ShellError::Pipe)?;
            spawn_relay(shell, &stmt.name, relay_source, relay_sink)?;
            streams.stdout = Output::Pipe(upstream);
            piped_in = Some(downstream);
        } else if let Some(path) = stmt.redirect(STDOUT) {
            streams.stdout = Output::File(open_output_redirect(path)?);
        }

        if let Some(path) = stmt.redirect(STDERR) {
            streams.stderr = Output::File(open_output_redirect(path)?);
        }

        stmt.streams = streams;
    }

    Ok(())
}

fn spawn_relay(
    shell: &Shell,
    name: &str,
    mut source: PipeReader,
    mut sink: PipeWriter,
) -> Result<usize, ShellError> {
    let label = format!("{} |", name);
    shell.tasks().spawn(TaskKind::Relay, &label, move || {
        let copied = io::copy(&mut source, &mut sink).map_err(ShellError::Pipe)?;
        tracing::trace!(bytes = copied, "relay drained");
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::parser::parse_line;
    use crate::engine::expand::expand;
    use std::fs;

    fn prepared(line: &str) -> (Shell, Vec<Statement>) {
        let shell = Shell::new(Config::default()).unwrap();
        let mut batch = parse_line(line).unwrap();
        expand(&mut batch, &shell).unwrap();
        (shell, batch)
    }

    #[test]
    fn test_defaults_inherit() {
        let (shell, mut batch) = prepared("ls -l");
        wire(&mut batch, &shell).unwrap();
        let streams = &batch[0].streams;
        assert!(matches!(streams.stdin, Input::Inherit));
        assert!(matches!(streams.stdout, Output::Stdout));
        assert!(matches!(streams.stderr, Output::Stderr));
    }

    #[test]
    fn test_output_redirect_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        fs::write(&out, "previous contents").unwrap();

        let (shell, mut batch) = prepared(&format!("ls > \"{}\" 2> \"{}/err\"", out.display(), dir.path().display()));
        wire(&mut batch, &shell).unwrap();

        assert!(matches!(batch[0].streams.stdout, Output::File(_)));
        assert!(matches!(batch[0].streams.stderr, Output::File(_)));
        assert_eq!(fs::read_to_string(&out).unwrap(), "");
        assert!(dir.path().join("err").exists());
    }

    #[test]
    fn test_missing_input_redirect_fails() {
        let (shell, mut batch) = prepared("cat < /nonexistent/rush/input");
        let err = wire(&mut batch, &shell).unwrap_err();
        assert!(matches!(err, ShellError::Redirect { .. }));
    }

    #[test]
    fn test_bad_output_path_aborts_whole_batch() {
        let dir = tempfile::tempdir().unwrap();
        let line = format!(
            "echo a > \"{}/first\" ; echo b > /nonexistent/rush/out",
            dir.path().display()
        );
        let (shell, mut batch) = prepared(&line);
        assert!(wire(&mut batch, &shell).is_err());
    }

    #[test]
    fn test_pipe_connects_neighbours_through_relay() {
        let (shell, mut batch) = prepared("echo hi | wc -c | cat");
        wire(&mut batch, &shell).unwrap();

        assert!(matches!(batch[0].streams.stdin, Input::Inherit));
        assert!(matches!(batch[0].streams.stdout, Output::Pipe(_)));
        assert!(matches!(batch[1].streams.stdin, Input::Pipe(_)));
        assert!(matches!(batch[1].streams.stdout, Output::Pipe(_)));
        assert!(matches!(batch[2].streams.stdin, Input::Pipe(_)));
        assert!(matches!(batch[2].streams.stdout, Output::Stdout));

        let relays = shell.tasks().snapshot();
        assert_eq!(relays.len(), 2);
        assert!(relays.iter().all(|t| t.kind == TaskKind::Relay));

        // Dropping the statements closes both ends, so the relays drain.
        drop(batch);
        assert_eq!(shell.tasks().wait(TaskKind::Relay), 2);
    }

    #[test]
    fn test_pipe_wins_over_stdout_redirect() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("never");
        let (shell, mut batch) = prepared(&format!("echo hi > \"{}\" | cat", out.display()));
        wire(&mut batch, &shell).unwrap();
        assert!(matches!(batch[0].streams.stdout, Output::Pipe(_)));
        assert!(!out.exists());
    }

    #[test]
    fn test_relay_copies_bytes_in_order() {
        let (shell, mut batch) = prepared("echo | cat");
        wire(&mut batch, &shell).unwrap();

        let mut upstream = std::mem::take(&mut batch[0].streams);
        let mut downstream = std::mem::take(&mut batch[1].streams);
        upstream.stdout.write_all(b"first\nsecond\n").unwrap();
        drop(upstream);

        let mut received = String::new();
        downstream.stdin.read_to_string(&mut received).unwrap();
        assert_eq!(received, "first\nsecond\n");
    }

    #[test]
    fn test_trailing_pipe_rejected() {
        let shell = Shell::new(Config::default()).unwrap();
        let mut batch = parse_line("echo hi").unwrap();
        expand(&mut batch, &shell).unwrap();
        batch[0].link = Link::Pipe;
        assert!(matches!(wire(&mut batch, &shell), Err(ShellError::Parse(_))));
    }
}
