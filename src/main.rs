mod builtins;
mod config;
mod engine;
mod error;
mod input;
mod logging;
mod parser;
mod repl;

use std::env;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use builtins::registry::CommandInfo;
use config::Config;
use engine::Shell;
use error::report;
use input::{Buffered, Editor};

/// The name the program was invoked under, for multi-call dispatch.
fn program_name(argv0: &str) -> &str {
    Path::new(argv0)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(argv0)
}

/// What the process was started to do.
enum Entry {
    /// Invoked under a fork builtin's name: run it with the remaining args.
    ForkBuiltin(CommandInfo, Vec<String>),
    Interactive,
    /// Scripts and command-line arguments are not supported.
    Arguments,
}

fn entry(shell: &Shell, argv: Vec<String>) -> Entry {
    let mut argv = argv.into_iter();
    let argv0 = argv.next().unwrap_or_default();
    let args: Vec<String> = argv.collect();

    if let Some(info) = shell.fork_builtin(program_name(&argv0)) {
        return Entry::ForkBuiltin(info, args);
    }
    if args.is_empty() { Entry::Interactive } else { Entry::Arguments }
}

fn main() -> ExitCode {
    logging::init();
    logging::install_panic_hook();

    let shell = match Shell::new(Config::from_env()) {
        Ok(shell) => Arc::new(shell),
        Err(e) => {
            report(&e);
            return ExitCode::FAILURE;
        }
    };

    let argv = env::args_os().map(|a| a.to_string_lossy().into_owned()).collect();
    match entry(&shell, argv) {
        Entry::ForkBuiltin(info, args) => {
            return match engine::run_fork_builtin(info, args, &shell) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    tracing::error!("{}: {}", info.name, e);
                    eprintln!("rush: {}", e);
                    ExitCode::FAILURE
                }
            };
        }
        Entry::Arguments => {
            println!("no scripts/args yet");
            return ExitCode::FAILURE;
        }
        Entry::Interactive => {}
    }

    let result = if io::stdin().is_terminal() {
        match Editor::new() {
            Ok(editor) => repl::run(editor, &shell),
            Err(e) => {
                eprintln!("rush: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        repl::run(Buffered::new(io::stdin().lock(), io::stdout()), &shell)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::registry::Registry;
    use crate::engine::ExecutionResult;
    use crate::error::ShellError;
    use crate::parser::Statement;

    fn noop(_stmt: &mut Statement, _shell: &Shell) -> Result<ExecutionResult, ShellError> {
        Ok(ExecutionResult::KeepRunning)
    }

    fn shell() -> Shell {
        let mut registry = Registry::default();
        registry
            .add_fork_builtin(CommandInfo {
                name: "mounter",
                description: "",
                usage: "",
                isolated: false,
                run: noop,
            })
            .unwrap();
        Shell::with_registry(Config::default(), registry)
    }

    fn argv(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_program_name_is_basename() {
        assert_eq!(program_name("/usr/local/bin/bindrun"), "bindrun");
        assert_eq!(program_name("rush"), "rush");
    }

    #[test]
    fn test_fork_builtin_selected_by_invocation_name() {
        match entry(&shell(), argv(&["/sbin/mounter", "a", "b"])) {
            Entry::ForkBuiltin(info, args) => {
                assert_eq!(info.name, "mounter");
                assert_eq!(args, vec!["a", "b"]);
            }
            _ => panic!("expected fork builtin dispatch"),
        }
    }

    #[test]
    fn test_plain_invocation_is_interactive() {
        assert!(matches!(entry(&shell(), argv(&["/bin/rush"])), Entry::Interactive));
        assert!(matches!(entry(&shell(), Vec::new()), Entry::Interactive));
    }

    #[test]
    fn test_arguments_are_refused() {
        assert!(matches!(entry(&shell(), argv(&["rush", "script.sh"])), Entry::Arguments));
    }
}
