mod command;
mod execution;
mod expand;
pub mod path;
mod redirect;
mod state;
mod tasks;

// Re-export the public API so that `main.rs`, `repl.rs` and `builtins/`
// only ever name `engine::*`.
pub use command::ISOLATED_ENV;
pub use execution::{execute_batch, run_fork_builtin};
pub use redirect::Streams;
#[cfg(test)]
pub use redirect::Output;
pub use state::{ExecutionResult, Shell};
pub use tasks::TaskKind;
