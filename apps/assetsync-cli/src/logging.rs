//! Human-readable logging to stdout and, optionally, a file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{CliError, CliResult};

/// Default filter directive: `debug` when verbose, `info` otherwise.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. The file, when given, is
/// appended to and gets the same lines as stdout without ANSI colors.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbose)))
        .map_err(|e| CliError::Logging(e.to_string()))?;

    let stdout_layer = fmt::layer().with_target(false);

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| CliError::Logging(format!("{}: {e}", path.display())))?;
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}
