//! tracing subscriber setup.
//!
//! Filter precedence: `AUTOLOGIN_LOG`, then `--verbose` (debug), then the
//! configured `LOG_LEVEL`, then warn.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::core::constants::ENV_LOG_FILTER;
use crate::error::Result;

/// Build the filter for this process.
pub fn filter(verbose: bool, level: Option<LevelFilter>) -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG_FILTER).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("autologin=debug")
        } else {
            let level = level.unwrap_or(LevelFilter::WARN);
            EnvFilter::new(format!("autologin={}", level))
        }
    })
}

/// Install the global subscriber: stderr always, plus `file` in append mode
/// when given. Calling this more than once keeps the first subscriber.
pub fn init(verbose: bool, level: Option<LevelFilter>, file: Option<&Path>) -> Result<()> {
    let file_layer = match file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(filter(verbose, level))
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .try_init();

    Ok(())
}
