use crate::builtins::registry::CommandInfo;
use crate::engine::{ExecutionResult, Shell};
use crate::error::ShellError;
use crate::parser::Statement;

pub const COMMAND_INFO_EXIT: CommandInfo = CommandInfo {
    name: "exit",
    description: "Exit the shell.",
    usage: "exit\n\nStop reading input once the current statement finishes.",
    isolated: false,
    run: exit_runner,
};

pub fn exit_runner(_stmt: &mut Statement, _shell: &Shell) -> Result<ExecutionResult, ShellError> {
    Ok(ExecutionResult::Exit)
}
