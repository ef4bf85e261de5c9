use std::collections::HashMap;

use crate::builtins;
use crate::engine::{ExecutionResult, Shell};
use crate::error::ShellError;
use crate::parser::Statement;

pub type BuiltinRunner = fn(&mut Statement, &Shell) -> Result<ExecutionResult, ShellError>;

#[derive(Clone, Copy)]
pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    /// Must run in a separate process with its own mount namespace.
    pub isolated: bool,
    pub run: BuiltinRunner,
}

/// Commands run by the interpreter itself.
pub const BUILTINS: &[CommandInfo] = &[
    builtins::cd::COMMAND_INFO_CD,
    builtins::cd::COMMAND_INFO_PWD,
    builtins::echo::COMMAND_INFO,
    builtins::envdir::COMMAND_INFO,
    builtins::help::COMMAND_INFO,
    builtins::system::COMMAND_INFO_EXIT,
    builtins::tasks::COMMAND_INFO,
    builtins::wait::COMMAND_INFO,
];

/// Commands selected by the name the program was invoked under.
#[cfg(target_os = "linux")]
pub const FORK_BUILTINS: &[CommandInfo] = &[
    builtins::bindrun::COMMAND_INFO,
];

#[cfg(not(target_os = "linux"))]
pub const FORK_BUILTINS: &[CommandInfo] = &[];

/// The two builtin tables. A name may live in at most one of them.
#[derive(Default)]
pub struct Registry {
    builtins: HashMap<&'static str, CommandInfo>,
    fork_builtins: HashMap<&'static str, CommandInfo>,
}

impl Registry {
    pub fn add_builtin(&mut self, info: CommandInfo) -> Result<(), ShellError> {
        self.check_free(info.name)?;
        self.builtins.insert(info.name, info);
        Ok(())
    }

    pub fn add_fork_builtin(&mut self, info: CommandInfo) -> Result<(), ShellError> {
        self.check_free(info.name)?;
        self.fork_builtins.insert(info.name, info);
        Ok(())
    }

    fn check_free(&self, name: &str) -> Result<(), ShellError> {
        if self.builtins.contains_key(name) {
            return Err(ShellError::AlreadyBuiltin(name.to_string()));
        }
        if self.fork_builtins.contains_key(name) {
            return Err(ShellError::AlreadyForkBuiltin(name.to_string()));
        }
        Ok(())
    }

    pub fn builtin(&self, name: &str) -> Option<&CommandInfo> {
        self.builtins.get(name)
    }

    pub fn fork_builtin(&self, name: &str) -> Option<&CommandInfo> {
        self.fork_builtins.get(name)
    }

    /// Every entry of both tables, sorted by name.
    pub fn entries(&self) -> Vec<&CommandInfo> {
        let mut all: Vec<&CommandInfo> = self.builtins.values().chain(self.fork_builtins.values()).collect();
        all.sort_by_key(|info| info.name);
        all
    }
}

pub fn default_registry() -> Result<Registry, ShellError> {
    let mut registry = Registry::default();
    for info in BUILTINS {
        registry.add_builtin(*info)?;
    }
    for info in FORK_BUILTINS {
        registry.add_fork_builtin(*info)?;
    }
    Ok(registry)
}
