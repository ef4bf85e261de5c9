use std::io::Write;
use std::sync::Arc;

use crate::builtins::registry::CommandInfo;
use crate::error::{report, ShellError};
use crate::parser::{Link, Statement};

use super::command::{build, describe};
use super::expand::expand;
use super::redirect::{wire, Streams};
use super::state::{ExecutionResult, Shell};
use super::tasks::TaskKind;

// ── Single statement ──────────────────────────────────────────────────────

/// Run one statement to completion, consuming it.
///
/// Builtins run on the calling thread against the statement's streams;
/// everything else is spawned and waited for. A non-zero exit status is a
/// failure.
pub fn run_statement(mut stmt: Statement, shell: &Shell) -> Result<ExecutionResult, ShellError> {
    if let Some(info) = shell.builtin(&stmt.name) {
        let result = (info.run)(&mut stmt, shell);
        let flushed = stmt.streams.stdout.flush();
        let result = result?;
        flushed?;
        return Ok(result);
    }

    let mut command = match stmt.process.take() {
        Some(command) => command,
        None => describe(&mut stmt, shell)?,
    };

    let Streams { stdin, stdout, stderr } = std::mem::take(&mut stmt.streams);
    command
        .stdin(stdin.into_stdio())
        .stdout(stdout.into_stdio())
        .stderr(stderr.into_stdio());

    let spawned = command.spawn();
    // Our copies of the pipe ends must go, or the reader never sees EOF.
    drop(command);

    let mut child = spawned.map_err(|source| ShellError::Spawn {
        name: stmt.name.clone(),
        path: shell.search_path().to_string(),
        source,
    })?;
    tracing::debug!(name = %stmt.name, pid = child.id(), "spawned");

    let status = child.wait().map_err(|source| ShellError::Wait {
        name: stmt.name.clone(),
        source,
    })?;

    if status.success() {
        Ok(ExecutionResult::KeepRunning)
    } else {
        Err(ShellError::Status { name: stmt.name, status })
    }
}

/// Start a statement as a tracked task; its failure is reported from the
/// task itself whenever it finishes.
fn launch_background(stmt: Statement, shell: &Arc<Shell>) -> Result<usize, ShellError> {
    let label = stmt.name.clone();
    let session = Arc::clone(shell);
    shell.tasks().spawn(TaskKind::Background, &label, move || {
        let result = run_statement(stmt, &session).map(|_| ());
        if let Err(e) = &result {
            report(e);
        }
        result
    })
}

// ── Batch ─────────────────────────────────────────────────────────────────

/// Expand, build, wire and sequence one batch.
///
/// Errors before sequencing abandon the whole batch; nothing has been
/// started at that point.
pub fn execute_batch(mut batch: Vec<Statement>, shell: &Arc<Shell>) -> ExecutionResult {
    if batch.is_empty() {
        return ExecutionResult::KeepRunning;
    }

    if let Err(e) = prepare(&mut batch, shell) {
        report(&e);
        tracing::debug!(statements = batch.len(), "batch abandoned");
        return ExecutionResult::KeepRunning;
    }

    sequence(batch, shell)
}

fn prepare(batch: &mut [Statement], shell: &Shell) -> Result<(), ShellError> {
    expand(batch, shell)?;
    build(batch, shell)?;
    wire(batch, shell)?;
    Ok(())
}

/// Run statements in order, deciding after each one whether to go on.
///
/// The decision uses the statement's own link (its relation to the next
/// one):
/// - failure continues only across `||`;
/// - success stops at `||`, since the alternative is not needed.
///
/// Background statements count as a success once launched.
pub fn sequence(batch: Vec<Statement>, shell: &Arc<Shell>) -> ExecutionResult {
    for stmt in batch {
        let link = stmt.link;
        let outcome = if stmt.background {
            launch_background(stmt, shell).map(|_| ExecutionResult::KeepRunning)
        } else {
            run_statement(stmt, shell)
        };

        match outcome {
            Ok(ExecutionResult::Exit) => return ExecutionResult::Exit,
            Ok(ExecutionResult::KeepRunning) => {
                if link == Link::Or {
                    break;
                }
            }
            Err(e) => {
                report(&e);
                if link != Link::Or {
                    break;
                }
            }
        }
    }

    ExecutionResult::KeepRunning
}

// ── Multi-call entry ──────────────────────────────────────────────────────

/// Run a fork builtin as the whole program, with the inherited streams.
pub fn run_fork_builtin(info: CommandInfo, args: Vec<String>, shell: &Shell) -> Result<(), ShellError> {
    if info.isolated && std::env::var_os(super::command::ISOLATED_ENV).is_none() {
        isolate_current_process()?;
    }
    let mut stmt = Statement::resolved(info.name, args);
    (info.run)(&mut stmt, shell).map(|_| ())
}

#[cfg(target_os = "linux")]
fn isolate_current_process() -> Result<(), ShellError> {
    use nix::sched::{unshare, CloneFlags};
    unshare(CloneFlags::CLONE_NEWNS).map_err(|e| ShellError::Io(e.into()))
}

#[cfg(not(target_os = "linux"))]
fn isolate_current_process() -> Result<(), ShellError> {
    Err(ShellError::Io(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "mount namespaces are only available on Linux",
    )))
}

// ── Tests ──────────────────────────────────────────────────────────────────
