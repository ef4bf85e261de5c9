use std::fs;
use std::path::Path;

use crate::error::ShellError;
use crate::parser::{ArgModifier, Statement};

use super::state::Shell;

/// Expand the raw arguments of every statement in a batch.
///
/// The environment directory is read once, so a builtin changing it from a
/// background task cannot split one batch across two directories.
pub fn expand(batch: &mut [Statement], shell: &Shell) -> Result<(), ShellError> {
    let env_dir = shell.env_dir();
    for stmt in batch.iter_mut() {
        expand_statement(stmt, &env_dir)?;
    }
    Ok(())
}

/// Fill `name` and `args` from `raw_args`.
pub fn expand_statement(stmt: &mut Statement, env_dir: &Path) -> Result<(), ShellError> {
    let mut words: Vec<String> = Vec::with_capacity(stmt.raw_args.len());

    for arg in &stmt.raw_args {
        match arg.modifier {
            ArgModifier::Env => words.push(read_env_file(&arg.value, env_dir)?),
            ArgModifier::Literal => match glob_matches(&arg.value) {
                Some(matches) => words.extend(matches),
                None => words.push(arg.value.clone()),
            },
        }
    }

    let mut words = words.into_iter();
    stmt.name = words.next().ok_or(ShellError::EmptyStatement)?;
    stmt.args = words.collect();
    Ok(())
}

/// The whole file becomes one argument, whitespace and all. Bytes that are
/// not UTF-8 are replaced rather than failing the batch.
fn read_env_file(value: &str, env_dir: &Path) -> Result<String, ShellError> {
    let path = Path::new(value);
    let path = if path.is_absolute() { path.to_path_buf() } else { env_dir.join(path) };
    let bytes = fs::read(&path).map_err(|source| ShellError::EnvFile { path, source })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Sorted paths matching `word`, or `None` when the word is no pattern, the
/// pattern is malformed, or nothing matches.
///
/// Arguments are `String`s, so directory entries whose names are not UTF-8
/// never match.
fn glob_matches(word: &str) -> Option<Vec<String>> {
    if !word.contains(['*', '?', '[']) {
        return None;
    }

    let mut matches: Vec<String> = glob::glob(word)
        .ok()?
        .flatten()
        .filter_map(|path| path.into_os_string().into_string().ok())
        .collect();

    if matches.is_empty() {
        return None;
    }
    matches.sort();
    Some(matches)
}

// ── Tests ──────────────────────────────────────────────────────────────────
