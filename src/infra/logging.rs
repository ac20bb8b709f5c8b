use tracing_subscriber::EnvFilter;

use crate::infra::{config::LogConfig, error::CoreError};

/// Installs a stderr subscriber honoring `RUST_LOG` with the configured
/// level as fallback. Embedding applications that own their subscriber
/// should skip this and install their own.
pub fn init(config: &LogConfig) -> Result<(), CoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level)),
        )
        .with_target(true)
        .try_init()
        .map_err(CoreError::LoggingInit)
}
