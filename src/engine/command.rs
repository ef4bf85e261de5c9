use std::env;
use std::path::PathBuf;
use std::process::Command;
#[cfg(unix)]
use std::os::unix::process::CommandExt;

use crate::error::ShellError;
use crate::parser::Statement;

use super::path::find_executable;
use super::state::Shell;

/// Set on a re-executed fork builtin whose mount namespace was already
/// unshared by the interpreter.
pub const ISOLATED_ENV: &str = "RUSH_ISOLATED";

/// Create a process descriptor for every statement that is not an
/// in-process builtin. Nothing is started here.
pub fn build(batch: &mut [Statement], shell: &Shell) -> Result<(), ShellError> {
    for stmt in batch.iter_mut() {
        if shell.builtin(&stmt.name).is_some() {
            continue;
        }
        let command = describe(stmt, shell)?;
        stmt.process = Some(command);
    }
    Ok(())
}

/// The descriptor for one statement.
///
/// Fork builtins re-execute this binary under the builtin's name; the
/// registry entry decides whether that child gets its own mount namespace.
pub fn describe(stmt: &mut Statement, shell: &Shell) -> Result<Command, ShellError> {
    match shell.fork_builtin(&stmt.name) {
        Some(info) => {
            stmt.isolated = info.isolated;
            self_command(stmt)
        }
        None => Ok(external_command(stmt, shell.search_path())),
    }
}

fn external_command(stmt: &Statement, search_path: &str) -> Command {
    // A failed lookup surfaces as NotFound when the process is spawned.
    let program = find_executable(&stmt.name, search_path)
        .unwrap_or_else(|| PathBuf::from(&stmt.name));

    let mut command = Command::new(program);
    #[cfg(unix)]
    command.arg0(&stmt.name);
    command.args(&stmt.args);
    command
}

fn self_command(stmt: &Statement) -> Result<Command, ShellError> {
    let exe = env::current_exe()?;

    let mut command = Command::new(exe);
    #[cfg(unix)]
    command.arg0(&stmt.name);
    command.args(&stmt.args);

    if stmt.isolated {
        isolate(&mut command)?;
    }
    Ok(command)
}

#[cfg(target_os = "linux")]
fn isolate(command: &mut Command) -> Result<(), ShellError> {
    use nix::sched::{unshare, CloneFlags};

    command.env(ISOLATED_ENV, "1");
    unsafe {
        command.pre_exec(|| unshare(CloneFlags::CLONE_NEWNS).map_err(std::io::Error::from));
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn isolate(_command: &mut Command) -> Result<(), ShellError> {
    Err(ShellError::Io(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "mount namespaces are only available on Linux",
    )))
}
