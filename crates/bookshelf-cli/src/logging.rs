//! Logging setup
//!
//! Logs go to stderr, or to `log_file` when one is configured. The level is
//! `warn` by default, `debug` with `--verbose`, and `BOOKSHELF_LOG` wins over
//! both when set.

use std::fs::OpenOptions;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use bookshelf_core::Config;

/// Environment variable holding an explicit log level
const LOG_ENV: &str = "BOOKSHELF_LOG";

/// Initialize the global tracing subscriber
pub fn init(config: &Config, verbose: bool) {
    let log_level = std::env::var(LOG_ENV)
        .ok()
        .filter(|level| !level.is_empty())
        .unwrap_or_else(|| default_level(verbose).to_string());

    let env_filter = EnvFilter::new(filter_directives(&log_level));

    let Some(log_path) = &config.log_file else {
        // Ignore error if already initialized
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
        return;
    };

    let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    debug!("Logging to {:?}", log_path);
}

fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Target prefix of this binary's own events
const BIN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Restrict output to the core library and this binary
fn filter_directives(level: &str) -> String {
    format!("bookshelf_core={},{}={}", level, BIN_TARGET, level)
}
