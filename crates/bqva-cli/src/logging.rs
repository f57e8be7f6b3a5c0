//! Log subscriber setup
//!
//! Library crates log through the `log` facade; the fmt subscriber installed
//! here picks those records up. `--debug` sends everything from our crates to
//! `debug.log` instead of stderr.

use anyhow::{Context, Result};
use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// File written when `--debug` is given.
pub(crate) const DEBUG_LOG_FILE: &str = "debug.log";

const DEBUG_FILTER: &str =
    "warn,bqva=debug,bqva_core=debug,bqva_sql=debug,bqva_warehouse=debug,bqva_analyzer=debug";

/// Install the global subscriber.
pub(crate) fn init(verbose: bool, debug: bool) -> Result<()> {
    if debug {
        let path = std::env::current_dir()
            .context("Failed to determine working directory")?
            .join(DEBUG_LOG_FILE);
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(DEBUG_FILTER))
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
            .ok();
        return Ok(());
    }

    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
    Ok(())
}
