use std::env;
use std::path::{Component, Path, PathBuf};

/// Normalize a path logically (resolving . and ..) without hitting the disk.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                match normalized.components().next_back() {
                    Some(Component::Normal(_)) => {
                        normalized.pop();
                    }
                    Some(Component::RootDir) | Some(Component::Prefix(_)) => {
                        // At root, .. does nothing
                    }
                    _ => {
                        normalized.push(Component::ParentDir);
                    }
                }
            }
            _ => normalized.push(component),
        }
    }

    if normalized.as_os_str().is_empty() {
        normalized.push(Component::CurDir);
    }

    normalized
}

/// Expand a leading `~` component to the home directory and normalize.
pub fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return normalize_path(&home.join(rest));
        }
    }
    normalize_path(path)
}

/// Resolve `cmd` against a colon-separated search list.
///
/// Names containing a `/` are checked as paths; empty list entries mean the
/// current directory.
pub fn find_executable(cmd: &str, search_path: &str) -> Option<PathBuf> {
    if cmd.is_empty() {
        return None;
    }

    if cmd.contains('/') {
        return check_path(expand_home(Path::new(cmd)));
    }

    env::split_paths(search_path)
        .find_map(|dir| check_path(dir.join(cmd)))
}

fn check_path(p: PathBuf) -> Option<PathBuf> {
    if p.is_file() {
        Some(p)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_path(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize_path(Path::new("")), PathBuf::from("."));
    }

    #[test]
    fn test_expand_home_only_whole_component() {
        assert_eq!(expand_home(Path::new("~user/x")), PathBuf::from("~user/x"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/docs")), normalize_path(&home.join("docs")));
        }
    }

    #[test]
    fn test_find_executable_walks_search_list() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        File::create(second.path().join("tool")).unwrap();

        let search = format!("{}:{}", first.path().display(), second.path().display());
        assert_eq!(find_executable("tool", &search), Some(second.path().join("tool")));
        assert_eq!(find_executable("missing-tool", &search), None);
    }

    #[test]
    fn test_find_executable_with_slash_checks_directly() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("tool");
        File::create(&tool).unwrap();
        assert_eq!(find_executable(tool.to_str().unwrap(), ""), Some(tool));
    }
}
