//! Configuration management for the storefront client
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `STOREFRONT_*` environment variables. Nested keys use a double underscore,
//! e.g. `STOREFRONT_API__BASE_URL` or `STOREFRONT_CACHE__BANNER_TTL_SECS`.

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "STOREFRONT";

/// Main client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Log level filter (e.g., "info", "debug", "storefront_http=trace")
    pub log_level: String,

    /// Remote API configuration
    pub api: ApiConfig,

    /// Session persistence configuration
    pub session: SessionConfig,

    /// Client-side cache configuration
    pub cache: CacheConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,

    /// Path prefix of the auth endpoints (`<auth>/token/`, `<auth>/confirm/`, ...)
    pub auth_prefix: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// Default content language for localized endpoints
    pub language: String,
}

/// Session persistence configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the persisted session and log files
    pub state_dir: PathBuf,

    /// File name of the persisted token store inside `state_dir`
    pub token_file: String,
}

/// Client-side cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long fetched banners stay fresh, in seconds
    pub banner_ttl_secs: u64,

    /// Maximum number of languages kept in the banner cache
    pub banner_capacity: u64,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            api: ApiConfig::default(),
            session: SessionConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            auth_prefix: "/auth".to_string(),
            timeout_secs: 30,
            user_agent: format!("storefront-client/{}", env!("CARGO_PKG_VERSION")),
            language: "en".to_string(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            token_file: "session.json".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            banner_ttl_secs: 300,
            banner_capacity: 16,
        }
    }
}

impl ApiConfig {
    /// Request timeout as a [`Duration`]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SessionConfig {
    /// Full path of the persisted token store
    pub fn token_path(&self) -> PathBuf {
        self.state_dir.join(&self.token_file)
    }
}

impl CacheConfig {
    /// Banner freshness window as a [`Duration`]
    pub const fn banner_ttl(&self) -> Duration {
        Duration::from_secs(self.banner_ttl_secs)
    }
}

/// Default state directory: `$STOREFRONT_STATE_DIR`, else the platform data dir
pub fn default_state_dir() -> PathBuf {
    std::env::var("STOREFRONT_STATE_DIR").map_or_else(
        |_| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("storefront")
        },
        PathBuf::from,
    )
}

impl StorefrontConfig {
    /// Load configuration from defaults, an optional file and the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a value cannot be parsed,
    /// or the resulting configuration is invalid
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        Self::load_with_env(path, None)
    }

    /// Load configuration, reading overrides from `env` instead of the process
    /// environment when it is given
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a value cannot be parsed,
    /// or the resulting configuration is invalid
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<::config::Map<String, String>>,
    ) -> CoreResult<Self> {
        let defaults = Self::default();

        let mut builder = ::config::Config::builder()
            .set_default("api.base_url", defaults.api.base_url)?
            .set_default("api.auth_prefix", defaults.api.auth_prefix)?
            .set_default("api.timeout_secs", defaults.api.timeout_secs)?
            .set_default("api.user_agent", defaults.api.user_agent)?
            .set_default("api.language", defaults.api.language)?
            .set_default(
                "session.state_dir",
                defaults.session.state_dir.to_string_lossy().to_string(),
            )?
            .set_default("session.token_file", defaults.session.token_file)?
            .set_default("cache.banner_ttl_secs", defaults.cache.banner_ttl_secs)?
            .set_default("cache.banner_capacity", defaults.cache.banner_capacity)?
            .set_default("log_level", defaults.log_level)?;

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path));
        }

        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values that cannot be expressed in the type system
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value
    pub fn validate(&self) -> CoreResult<()> {
        let url = url::Url::parse(&self.api.base_url).map_err(|e| {
            CoreError::invalid_config(format!("api.base_url '{}': {e}", self.api.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::invalid_config(format!(
                "api.base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if !self.api.auth_prefix.is_empty() && !self.api.auth_prefix.starts_with('/') {
            return Err(CoreError::invalid_config(
                "api.auth_prefix must start with '/'",
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(CoreError::invalid_config("api.timeout_secs must be positive"));
        }
        if self.session.token_file.is_empty() {
            return Err(CoreError::invalid_config("session.token_file is empty"));
        }
        Ok(())
    }

    /// Write this configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> ::config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_load_without_sources() {
        let config = StorefrontConfig::load_with_env(None, Some(env(&[]))).unwrap();
        let defaults = StorefrontConfig::default();
        assert_eq!(config.api, defaults.api);
        assert_eq!(config.cache, defaults.cache);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(
            &path,
            r#"
log_level = "debug"

[api]
base_url = "https://shop.example.com/api"
auth_prefix = "/users"

[cache]
banner_ttl_secs = 60
"#,
        )
        .unwrap();

        let config = StorefrontConfig::load_with_env(Some(&path), Some(env(&[]))).unwrap();
        assert_eq!(config.api.base_url, "https://shop.example.com/api");
        assert_eq!(config.api.auth_prefix, "/users");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.cache.banner_ttl(), Duration::from_secs(60));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(&path, "[api]\nbase_url = \"https://file.example.com\"\n").unwrap();

        let config = StorefrontConfig::load_with_env(
            Some(&path),
            Some(env(&[
                ("STOREFRONT_API__BASE_URL", "https://env.example.com"),
                ("STOREFRONT_API__TIMEOUT_SECS", "5"),
            ])),
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://env.example.com");
        assert_eq!(config.api.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = StorefrontConfig::load_with_env(
            None,
            Some(env(&[("STOREFRONT_API__BASE_URL", "ftp://shop.example.com")])),
        );
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storefront.toml");
        let mut config = StorefrontConfig::default();
        config.api.language = "ru".to_string();
        config.save(&path).unwrap();

        let loaded = StorefrontConfig::load_with_env(Some(&path), Some(env(&[]))).unwrap();
        assert_eq!(loaded, config);
    }
}
