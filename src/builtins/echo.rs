use std::io::Write;

use crate::builtins::registry::CommandInfo;
use crate::engine::{ExecutionResult, Shell};
use crate::error::ShellError;
use crate::parser::Statement;

pub const COMMAND_INFO: CommandInfo = CommandInfo {
    name: "echo",
    description: "Write arguments to the standard output.",
    usage: "echo [arg ...]",
    isolated: false,
    run,
};

pub fn run(stmt: &mut Statement, _shell: &Shell) -> Result<ExecutionResult, ShellError> {
    writeln!(stmt.streams.stdout, "{}", stmt.args.join(" "))?;
    Ok(ExecutionResult::KeepRunning)
}
