use std::io;
use std::panic;
use std::process;

use tracing_subscriber::EnvFilter;

use crate::config::LOG_VAR;

/// Diagnostics go to stderr, filtered by `RUSH_LOG` (default `warn`).
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// A panic anywhere in the interpreter is a defect: log it and exit.
pub fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        tracing::error!("fatal: {}", info);
        eprintln!("rush: fatal: {}", info);
        process::exit(1);
    }));
}
