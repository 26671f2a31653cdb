use anyhow::Result;
use std::path::Path;
use storefront_core::tracing::{InstrumentationConfig, LogFileConfig, init_tracing};
use tracing::Level;

/// Initialize logging for the CLI
///
/// Logs go to `STATE_DIR/cli.log` and stderr, or to stderr only when
/// `no_file_log` is set. `RUST_LOG` overrides `filter`.
pub fn init_logging(filter: String, state_dir: &Path, no_file_log: bool) -> Result<()> {
    let mut config = InstrumentationConfig::with_level(filter);
    if !no_file_log {
        config = config.with_log_file(LogFileConfig::new(state_dir, "cli"));
    }
    init_tracing(&config)?;
    Ok(())
}

/// Filter directive enabling `level` for the workspace crates only
pub fn level_filter(level: Level) -> String {
    let level_str = level.as_str().to_lowercase();
    format!("storefront={level_str},storefront_http={level_str},storefront_core={level_str}")
}
