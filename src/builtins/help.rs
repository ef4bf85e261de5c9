use std::io::Write;

use crate::builtins::registry::CommandInfo;
use crate::engine::{ExecutionResult, Shell};
use crate::error::ShellError;
use crate::parser::Statement;

pub const COMMAND_INFO: CommandInfo = CommandInfo {
    name: "help",
    description: "Display information about builtin commands.",
    usage: "help [name ...]\n\nWithout NAME, list every builtin with its description. Otherwise print\nthe usage of each NAME.",
    isolated: false,
    run: help_runner,
};

pub fn help_runner(stmt: &mut Statement, shell: &Shell) -> Result<ExecutionResult, ShellError> {
    let registry = shell.registry();
    let out = &mut stmt.streams.stdout;

    if stmt.args.is_empty() {
        let mut help_text = String::new();
        help_text.push_str("rush, version 0.1.0\n");
        help_text.push_str("These commands are defined internally. Type `help name` to find out more about `name`.\n");
        help_text.push_str("Commands marked * run in their own process.\n\n");

        let entries = registry.entries();
        let max_len = entries.iter().map(|b| b.name.len()).max().unwrap_or(0);
        for info in entries {
            let marker = if registry.fork_builtin(info.name).is_some() { "*" } else { " " };
            help_text.push_str(&format!("{}{:<width$}  {}\n", marker, info.name, info.description, width = max_len));
        }
        write!(out, "{}", help_text)?;
        return Ok(ExecutionResult::KeepRunning);
    }

    let mut missing = Vec::new();
    for name in &stmt.args {
        match registry.builtin(name).or_else(|| registry.fork_builtin(name)) {
            Some(info) => {
                writeln!(out, "{}: {}", info.name, info.description)?;
                writeln!(out, "{}", info.usage)?;
            }
            None => missing.push(name.as_str()),
        }
    }

    if missing.is_empty() {
        Ok(ExecutionResult::KeepRunning)
    } else {
        Err(ShellError::builtin("help", format!("no help topics match `{}`", missing.join("`, `"))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::engine::Output;
    use std::fs;

    #[test]
    fn test_help_lists_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("help");
        let shell = Shell::new(Config::default()).unwrap();

        let mut stmt = Statement::resolved("help", Vec::new());
        stmt.streams.stdout = Output::File(fs::File::create(&path).unwrap());
        help_runner(&mut stmt, &shell).unwrap();
        drop(stmt);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(" cd "));
        assert!(text.contains(" envdir "));
    }

    #[test]
    fn test_help_unknown_topic() {
        let shell = Shell::new(Config::default()).unwrap();
        let mut stmt = Statement::resolved("help", vec!["frobnicate".to_string()]);
        let err = help_runner(&mut stmt, &shell).unwrap_err();
        assert!(err.to_string().contains("frobnicate"));
    }
}
