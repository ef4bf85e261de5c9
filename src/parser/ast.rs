use std::path::PathBuf;
use std::process::Command;

use crate::engine::Streams;

// ── AST types ──────────────────────────────────────────────────────────────

/// How a raw argument is turned into its final value.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ArgModifier {
    /// Glob-expanded, or kept as-is when nothing matches.
    Literal,
    /// `$NAME`: replaced by the contents of the file `NAME` in the env dir.
    Env,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Arg {
    pub value: String,
    pub modifier: ArgModifier,
}

impl Arg {
    pub fn plain(value: &str) -> Self {
        Arg { value: value.to_string(), modifier: ArgModifier::Literal }
    }

    pub fn env(value: &str) -> Self {
        Arg { value: value.to_string(), modifier: ArgModifier::Env }
    }
}

/// Relation between a statement and the one after it.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Link {
    /// `;`, `&` or end of line
    #[default]
    None,
    /// `|`: stdout feeds the next statement's stdin
    Pipe,
    /// `&&`: the next statement depends on this one succeeding
    And,
    /// `||`: the next statement is the alternative if this one fails
    Or,
}

/// Stream slots a redirect can target.
pub const STDIN: usize = 0;
pub const STDOUT: usize = 1;
pub const STDERR: usize = 2;

/// One pipeline stage.
///
/// The parser fills `raw_args`, `link`, `redirects` and `background`. The
/// engine then fills `name`/`args` (expansion), `process`/`isolated`
/// (descriptor builder) and `streams` (wiring) before the statement is
/// consumed by the sequencer.
#[derive(Debug, Default)]
pub struct Statement {
    pub name: String,
    pub args: Vec<String>,
    pub raw_args: Vec<Arg>,
    pub link: Link,
    pub redirects: [Option<PathBuf>; 3],
    pub background: bool,
    pub isolated: bool,
    pub process: Option<Command>,
    pub streams: Streams,
}

impl Statement {
    pub fn new(raw_args: Vec<Arg>) -> Self {
        Statement { raw_args, ..Default::default() }
    }

    /// A statement that is already expanded, as used for multi-call dispatch.
    pub fn resolved(name: &str, args: Vec<String>) -> Self {
        Statement { name: name.to_string(), args, ..Default::default() }
    }

    pub fn redirect(&self, slot: usize) -> Option<&PathBuf> {
        self.redirects.get(slot).and_then(|r| r.as_ref())
    }
}

/// Whether the line source has more input after this batch.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Status {
    Normal,
    Eof,
}

/// Every statement parsed from one input line.
#[derive(Debug)]
pub struct Batch {
    pub statements: Vec<Statement>,
    pub status: Status,
}

impl Batch {
    pub fn eof() -> Self {
        Batch { statements: Vec::new(), status: Status::Eof }
    }
}
