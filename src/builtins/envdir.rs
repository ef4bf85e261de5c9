use std::io::Write;
use std::path::Path;

use crate::builtins::registry::CommandInfo;
use crate::engine::path::expand_home;
use crate::engine::{ExecutionResult, Shell};
use crate::error::ShellError;
use crate::parser::Statement;

pub const COMMAND_INFO: CommandInfo = CommandInfo {
    name: "envdir",
    description: "Show or change the environment directory.",
    usage: "envdir [dir]\n\nWithout DIR, print the directory that `$NAME` arguments are read from.\nWith DIR, read them from DIR instead.",
    isolated: false,
    run,
};

pub fn run(stmt: &mut Statement, shell: &Shell) -> Result<ExecutionResult, ShellError> {
    match stmt.args.as_slice() {
        [] => {
            writeln!(stmt.streams.stdout, "{}", shell.env_dir().display())?;
        }
        [dir] => {
            let dir = expand_home(Path::new(dir));
            if !dir.is_dir() {
                return Err(ShellError::builtin("envdir", format!("{}: not a directory", dir.display())));
            }
            shell.set_env_dir(dir);
        }
        _ => return Err(ShellError::builtin("envdir", "usage: envdir [dir]")),
    }
    Ok(ExecutionResult::KeepRunning)
}
