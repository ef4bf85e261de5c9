use std::env;
use std::path::PathBuf;

/// Directory under which relative `$NAME` arguments are read.
pub const DEFAULT_ENV_DIR: &str = "/env";

/// Search list used when `PATH` is not set.
pub const DEFAULT_SEARCH_PATH: &str = "/go/bin:/ubin:/buildbin:/bin:/usr/local/bin:";

pub const PROMPT: &str = "% ";

/// Overrides the environment directory at start-up.
pub const ENV_DIR_VAR: &str = "RUSH_ENVDIR";

/// Filter directives for diagnostics, e.g. `RUSH_LOG=debug`.
pub const LOG_VAR: &str = "RUSH_LOG";

#[derive(Debug, Clone)]
pub struct Config {
    pub env_dir: PathBuf,
    pub search_path: String,
    pub prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            env_dir: PathBuf::from(DEFAULT_ENV_DIR),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            prompt: PROMPT.to_string(),
        }
    }
}

impl Config {
    /// Seed the configuration from the process environment.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Some(dir) = env::var_os(ENV_DIR_VAR).filter(|d| !d.is_empty()) {
            config.env_dir = PathBuf::from(dir);
        }
        if let Ok(path) = env::var("PATH") {
            if !path.is_empty() {
                config.search_path = path;
            }
        }
        config
    }
}
