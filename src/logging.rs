use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::Result;

/// Set to any value to turn on debug logging.
pub const DEBUG_ENV: &str = "SPMIG_DEBUG";
/// Where the interactive editor logs, so the terminal UI stays intact.
pub const DEBUG_LOG_FILE: &str = "spmig-debug.log";

const DEFAULT_FILTER: &str = "spmig=debug";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Install the tracing subscriber when `SPMIG_DEBUG` is set. `RUST_LOG`
/// overrides the default filter. Returns whether logging was enabled.
pub fn init(target: LogTarget) -> Result<bool> {
    if std::env::var_os(DEBUG_ENV).is_none() {
        return Ok(false);
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    installed.map_err(|err| std::io::Error::other(err.to_string()))?;
    Ok(true)
}
