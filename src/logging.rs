use std::fs::OpenOptions;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::ConfigStore;

/// Initialize the tracing subscriber from the effective configuration.
///
/// `RUST_LOG` takes precedence over the configured log level; when a log
/// file is configured, output goes there instead of stderr.
pub fn init(config: &ConfigStore) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level().to_lowercase()))?;

    match config.log_file() {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(Arc::new(file)).with_ansi(false).compact())
                .try_init()?;
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr).compact())
                .try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, info, warn};

    #[test]
    fn test_logging_init() {
        // the subscriber can only be installed once per process
        let _ = init(&ConfigStore::new());

        debug!("debug message");
        info!("info message");
        warn!("warn message");
    }
}
