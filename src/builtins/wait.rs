use crate::builtins::registry::CommandInfo;
use crate::engine::{ExecutionResult, Shell, TaskKind};
use crate::error::ShellError;
use crate::parser::Statement;

pub const COMMAND_INFO: CommandInfo = CommandInfo {
    name: "wait",
    description: "Wait for background statements to finish.",
    usage: "wait\n\nBlock until every statement started with `&` has finished.",
    isolated: false,
    run,
};

pub fn run(_stmt: &mut Statement, shell: &Shell) -> Result<ExecutionResult, ShellError> {
    let joined = shell.tasks().wait(TaskKind::Background);
    tracing::debug!(joined, "waited for background statements");
    Ok(ExecutionResult::KeepRunning)
}
