use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{AugmentError, Result};

/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `verbose`.
pub fn setup_cli_logging(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .map_err(|e| AugmentError::Configuration(format!("failed to initialize logger: {e}")))
}
