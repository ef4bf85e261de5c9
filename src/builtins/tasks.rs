use std::io::Write;

use crate::builtins::registry::CommandInfo;
use crate::engine::{ExecutionResult, Shell};
use crate::error::ShellError;
use crate::parser::Statement;

pub const COMMAND_INFO: CommandInfo = CommandInfo {
    name: "tasks",
    description: "Display pipe relays and background statements.",
    usage: "tasks\n\nList every relay and background statement the shell is still tracking.",
    isolated: false,
    run: tasks_runner,
};

pub fn tasks_runner(stmt: &mut Statement, shell: &Shell) -> Result<ExecutionResult, ShellError> {
    let mut tasks = shell.tasks().snapshot();
    tasks.sort_by_key(|t| t.id);
    for task in tasks {
        let status_str = if task.finished { "Done" } else { "Running" };
        writeln!(stmt.streams.stdout, "[{}] {:<10} {:<7}  {}", task.id, task.kind.to_string(), status_str, task.label)?;
    }
    Ok(ExecutionResult::KeepRunning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::engine::{Output, TaskKind};
    use std::fs;
    use std::sync::mpsc;

    #[test]
    fn test_tasks_lists_outstanding_work() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks");
        let shell = Shell::new(Config::default()).unwrap();

        let (tx, rx) = mpsc::channel::<()>();
        shell
            .tasks()
            .spawn(TaskKind::Relay, "yes |", move || {
                let _ = rx.recv();
                Ok(())
            })
            .unwrap();

        let mut stmt = Statement::resolved("tasks", Vec::new());
        stmt.streams.stdout = Output::File(fs::File::create(&path).unwrap());
        tasks_runner(&mut stmt, &shell).unwrap();
        drop(stmt);

        let text = fs::read_to_string(&path).unwrap();
        let line = text.lines().next().unwrap();
        assert!(line.starts_with('['));
        assert!(line.contains("relay"));
        assert!(line.contains("Running"));
        assert!(line.ends_with("yes |"));

        drop(tx);
        assert_eq!(shell.tasks().wait(TaskKind::Relay), 1);
    }

    #[test]
    fn test_tasks_empty_prints_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks");
        let shell = Shell::new(Config::default()).unwrap();

        let mut stmt = Statement::resolved("tasks", Vec::new());
        stmt.streams.stdout = Output::File(fs::File::create(&path).unwrap());
        tasks_runner(&mut stmt, &shell).unwrap();
        drop(stmt);

        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
