//! Initialization functions for tracing

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::tracing::config::InstrumentationConfig;
use crate::{CoreError, CoreResult};

/// Initialize tracing with the given configuration
///
/// # Errors
///
/// Returns an error if the log file cannot be created or a global
/// subscriber is already installed
pub fn init_tracing(config: &InstrumentationConfig) -> CoreResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match &config.log_file {
        Some(file_config) => {
            std::fs::create_dir_all(&file_config.directory)?;
            let log_file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(file_config.path())?;

            let console_layer = file_config.console_enabled.then(|| {
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr)
            });

            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(log_file))
                        .with_ansi(false),
                )
                .with(console_layer)
                .try_init()
                .map_err(|e| CoreError::internal_error(e.to_string()))?;
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| CoreError::internal_error(e.to_string()))?;
        }
    }

    ::tracing::debug!(
        service = %config.service_name,
        version = %config.service_version,
        "tracing initialized"
    );
    Ok(())
}
