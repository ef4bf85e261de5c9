use std::path::PathBuf;
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard};

use crate::builtins::registry::{default_registry, CommandInfo, Registry};
use crate::config::Config;
use crate::error::ShellError;

use super::tasks::TaskSet;

#[derive(Debug)]
pub enum ExecutionResult {
    KeepRunning,
    Exit,
}

/// Session state shared by the loop, background statements and builtins.
///
/// Held behind an `Arc` so detached statements can keep using it; every
/// mutable field sits behind its own lock.
pub struct Shell {
    registry: RwLock<Registry>,
    env_dir: RwLock<PathBuf>,
    previous_dir: Mutex<Option<PathBuf>>,
    search_path: String,
    prompt: String,
    tasks: TaskSet,
}

impl Shell {
    /// A session with the default builtins registered.
    pub fn new(config: Config) -> Result<Self, ShellError> {
        Ok(Shell::with_registry(config, default_registry()?))
    }

    pub fn with_registry(config: Config, registry: Registry) -> Self {
        Shell {
            registry: RwLock::new(registry),
            env_dir: RwLock::new(config.env_dir),
            previous_dir: Mutex::new(None),
            search_path: config.search_path,
            prompt: config.prompt,
            tasks: TaskSet::default(),
        }
    }

    pub fn registry(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the in-process handler for `name`, taken without holding the
    /// lock while the handler runs.
    pub fn builtin(&self, name: &str) -> Option<CommandInfo> {
        self.registry().builtin(name).copied()
    }

    pub fn fork_builtin(&self, name: &str) -> Option<CommandInfo> {
        self.registry().fork_builtin(name).copied()
    }

    pub fn env_dir(&self) -> PathBuf {
        self.env_dir.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set_env_dir(&self, dir: PathBuf) {
        *self.env_dir.write().unwrap_or_else(PoisonError::into_inner) = dir;
    }

    pub fn previous_dir(&self) -> Option<PathBuf> {
        self.previous_dir.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set_previous_dir(&self, dir: PathBuf) {
        *self.previous_dir.lock().unwrap_or_else(PoisonError::into_inner) = Some(dir);
    }

    pub fn search_path(&self) -> &str {
        &self.search_path
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn tasks(&self) -> &TaskSet {
        &self.tasks
    }
}
