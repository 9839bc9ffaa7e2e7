//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise `search_dash=info` (or `debug` with
//! `-v`). Command output goes to stdout and logs to stderr, except in the TUI
//! where stderr is the screen: there logs go to `--log-file` or nowhere.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{AppError, EXIT_INPUT};

const DEFAULT_DIRECTIVE: &str = "search_dash=info";
const VERBOSE_DIRECTIVE: &str = "search_dash=debug";

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
    Discard,
}

pub fn init(verbose: bool, target: LogTarget<'_>) -> Result<(), AppError> {
    let filter = env_filter(verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = File::create(path)
                .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open log file '{}': {e}", path.display())))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        LogTarget::Discard => builder.with_writer(std::io::sink).try_init(),
    };

    Ok(())
}

fn env_filter(verbose: bool, from_env: Option<&str>) -> EnvFilter {
    match from_env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => EnvFilter::new(directives),
        None if verbose => EnvFilter::new(VERBOSE_DIRECTIVE),
        None => EnvFilter::new(DEFAULT_DIRECTIVE),
    }
}
