mod ast;
mod combinators;

#[cfg(test)]
pub use ast::Arg;
pub use ast::{ArgModifier, Batch, Link, Statement, Status, STDERR, STDIN, STDOUT};

use combinators::{parse_operator, parse_statement, Operator};

use crate::error::ShellError;
use crate::input::LineSource;

// ── Public API ────────────────────────────────────────────────────────────

/// Parse one input line into the statements of a batch.
///
/// Blank lines and comments give an empty batch. A line ending in `|`, `&&`
/// or `||`, or containing anything the grammar does not accept, is an error.
pub fn parse_line(input: &str) -> Result<Vec<Statement>, ShellError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(Vec::new());
    }

    let mut statements: Vec<Statement> = Vec::new();
    let mut rest = trimmed;

    loop {
        let (after_stmt, mut stmt) = parse_statement(rest)
            .map_err(|_| syntax_error(rest))?;
        let (after_op, op) = parse_operator(after_stmt)
            .map_err(|_| syntax_error(after_stmt))?;
        rest = after_op.trim_start();

        let op = match op {
            Some(op) => op,
            None => {
                if !rest.is_empty() {
                    return Err(syntax_error(rest));
                }
                statements.push(stmt);
                break;
            }
        };

        match op {
            Operator::Link(link) => stmt.link = link,
            Operator::Background => stmt.background = true,
            Operator::Sequence => {}
        }
        let needs_successor = stmt.link != Link::None;
        statements.push(stmt);

        if rest.is_empty() {
            if needs_successor {
                return Err(ShellError::Parse(format!(
                    "unexpected end of line after `{}`",
                    op.symbol()
                )));
            }
            break;
        }
    }

    Ok(statements)
}

fn syntax_error(near: &str) -> ShellError {
    ShellError::Parse(format!("syntax error near `{}`", near.trim()))
}

/// Reads one line at a time from a [`LineSource`] and parses it into a batch.
pub struct BatchReader<S> {
    source: S,
    prompt: String,
}

impl<S: LineSource> BatchReader<S> {
    pub fn new(source: S, prompt: &str) -> Self {
        BatchReader { source, prompt: prompt.to_string() }
    }

    /// Prompt, read and parse the next line.
    ///
    /// End of input yields an empty batch with [`Status::Eof`]. Read failures
    /// come back as [`ShellError::Input`], parse failures as
    /// [`ShellError::Parse`] (the offending line is consumed).
    pub fn next_batch(&mut self) -> Result<Batch, ShellError> {
        match self.source.read_line(&self.prompt).map_err(ShellError::Input)? {
            None => Ok(Batch::eof()),
            Some(line) => Ok(Batch {
                statements: parse_line(&line)?,
                status: Status::Normal,
            }),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
