use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Everything that can abandon a batch (or, for `Input`, end the session).
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("args problem: {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("empty statement")]
    EmptyStatement,

    #[error("{}: {source}", path.display())]
    Redirect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("pipe: {0}")]
    Pipe(#[source] io::Error),

    #[error("{name}: {message}")]
    Builtin { name: String, message: String },

    #[error("{name}: {source}: Path {path}")]
    Spawn {
        name: String,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("wait: {name}: {source}")]
    Wait {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("wait: {name}: {status}")]
    Status { name: String, status: ExitStatus },

    #[error("{0} already a builtin")]
    AlreadyBuiltin(String),

    #[error("{0} already a fork builtin")]
    AlreadyForkBuiltin(String),

    #[error("task: {0}")]
    Task(String),

    #[error("reading input: {0}")]
    Input(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ShellError {
    pub fn builtin(name: &str, message: impl Into<String>) -> Self {
        ShellError::Builtin { name: name.to_string(), message: message.into() }
    }
}

/// Print an error the way every command failure is surfaced to the user.
pub fn report(err: &ShellError) {
    eprintln!("rush: {}", err);
}
