use std::os::unix::process::CommandExt;
use std::process::Command;

use nix::mount::{mount, MsFlags};

use crate::builtins::registry::CommandInfo;
use crate::engine::{ExecutionResult, Shell, ISOLATED_ENV};
use crate::error::ShellError;
use crate::parser::Statement;

pub const COMMAND_INFO: CommandInfo = CommandInfo {
    name: "bindrun",
    description: "Run a program with a directory bind-mounted over another.",
    usage: "bindrun SOURCE TARGET PROGRAM [ARG ...]\n\nIn a private mount namespace, bind SOURCE over TARGET and run PROGRAM.\nThe usual way to give a program a per-user environment directory at /env.",
    isolated: true,
    run,
};

pub fn run(stmt: &mut Statement, shell: &Shell) -> Result<ExecutionResult, ShellError> {
    let [source, target, program, rest @ ..] = stmt.args.as_slice() else {
        return Err(ShellError::builtin("bindrun", "usage: bindrun SOURCE TARGET PROGRAM [ARG ...]"));
    };

    // Keep the bind from propagating back into the parent namespace.
    mount(None::<&str>, "/", None::<&str>, MsFlags::MS_REC | MsFlags::MS_PRIVATE, None::<&str>)
        .map_err(|e| ShellError::builtin("bindrun", format!("making / private: {}", e)))?;
    mount(Some(source.as_str()), target.as_str(), None::<&str>, MsFlags::MS_BIND | MsFlags::MS_REC, None::<&str>)
        .map_err(|e| ShellError::builtin("bindrun", format!("binding {} on {}: {}", source, target, e)))?;

    // Only returns on failure.
    let source = Command::new(program)
        .args(rest)
        .env_remove(ISOLATED_ENV)
        .exec();
    Err(ShellError::Spawn {
        name: program.clone(),
        path: shell.search_path().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_bindrun_requires_three_arguments() {
        let shell = Shell::new(Config::default()).unwrap();
        let mut stmt = Statement::resolved("bindrun", vec!["/src".to_string(), "/dst".to_string()]);
        let err = run(&mut stmt, &shell).unwrap_err();
        assert!(err.to_string().contains("usage"));
    }
}
