use std::env;
use std::io::Write;
use std::path::Path;

use crate::builtins::registry::CommandInfo;
use crate::engine::path::expand_home;
use crate::engine::{ExecutionResult, Shell};
use crate::error::ShellError;
use crate::parser::Statement;

pub const COMMAND_INFO_CD: CommandInfo = CommandInfo {
    name: "cd",
    description: "Change the shell working directory.",
    usage: "cd [dir]\n\nChange the current directory to DIR. The default DIR is the home directory;\n`cd -` returns to the previous directory.",
    isolated: false,
    run: cd_runner,
};

pub const COMMAND_INFO_PWD: CommandInfo = CommandInfo {
    name: "pwd",
    description: "Print the name of the current working directory.",
    usage: "pwd\n\nPrint the absolute pathname of the current working directory.",
    isolated: false,
    run: pwd_runner,
};

pub fn pwd_runner(stmt: &mut Statement, _shell: &Shell) -> Result<ExecutionResult, ShellError> {
    let cwd = env::current_dir()?;
    writeln!(stmt.streams.stdout, "{}", cwd.display())?;
    Ok(ExecutionResult::KeepRunning)
}

pub fn cd_runner(stmt: &mut Statement, shell: &Shell) -> Result<ExecutionResult, ShellError> {
    let current = env::current_dir()?;

    let target = match stmt.args.first().map(String::as_str) {
        None => dirs::home_dir()
            .ok_or_else(|| ShellError::builtin("cd", "could not find home directory"))?,
        Some("-") => shell
            .previous_dir()
            .ok_or_else(|| ShellError::builtin("cd", "OLDPWD not set"))?,
        Some(dir) => expand_home(Path::new(dir)),
    };

    env::set_current_dir(&target).map_err(|_| {
        ShellError::builtin("cd", format!("no such file or directory: {}", target.display()))
    })?;

    shell.set_previous_dir(current);
    Ok(ExecutionResult::KeepRunning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_cd_missing_directory() {
        let shell = Shell::new(Config::default()).unwrap();
        let mut stmt = Statement::resolved("cd", vec!["/nonexistent/rush/dir".to_string()]);
        let err = cd_runner(&mut stmt, &shell).unwrap_err();
        assert!(err.to_string().contains("no such file or directory"));
        assert!(shell.previous_dir().is_none());
    }

    #[test]
    fn test_cd_dash_without_previous() {
        let shell = Shell::new(Config::default()).unwrap();
        let mut stmt = Statement::resolved("cd", vec!["-".to_string()]);
        let err = cd_runner(&mut stmt, &shell).unwrap_err();
        assert_eq!(err.to_string(), "cd: OLDPWD not set");
    }
}
