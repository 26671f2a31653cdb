//! CLI configuration utilities

use anyhow::Result;
use std::path::{Path, PathBuf};
use storefront_core::StorefrontConfig;
use storefront_core::config::default_state_dir;

/// Default configuration file inside a state directory
pub fn default_config_path(state_dir: &Path) -> PathBuf {
    state_dir.join("config.toml")
}

/// Load the effective configuration
///
/// An explicit `path` must exist. Without one, `STATE_DIR/config.toml` is
/// used when present. `state_dir` overrides `session.state_dir`.
pub fn load(path: Option<&Path>, state_dir: Option<PathBuf>) -> Result<StorefrontConfig> {
    let base = state_dir.clone().unwrap_or_else(default_state_dir);
    let implicit = default_config_path(&base);
    let source = match path {
        Some(path) => Some(path.to_path_buf()),
        None => implicit.is_file().then_some(implicit),
    };

    let mut config = StorefrontConfig::load(source.as_deref())?;
    if let Some(dir) = state_dir {
        config.session.state_dir = dir;
    }
    Ok(config)
}

/// Generate a default configuration file
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    StorefrontConfig::default().save(path.as_ref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = default_config_path(dir.path());
        generate_default_config(&path).unwrap();

        let config = load(None, Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(config.session.state_dir, dir.path());
        assert_eq!(config.api, StorefrontConfig::default().api);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(load(Some(&missing), Some(dir.path().to_path_buf())).is_err());
    }
}
