//! Configuration management for Top Movies
//!
//! Configuration comes from a TOML file when one is found, with defaults for
//! anything the file leaves out. The API key is resolved separately so it can
//! be supplied on the command line or through the environment instead of
//! living in a file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::{CacheConfig, ClientConfig, LoaderConfig, RankedListSource, ResponseCacheConfig};
use crate::constants::{api, config as paths, env, list};
use crate::errors::{ConfigError, ConfigResult};

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP client settings
    pub client: ClientConfig,
    /// Transport-level response cache
    pub response_cache: ResponseCacheConfig,
    /// Decoded image cache
    pub image_cache: CacheConfig,
    /// Image loader behaviour
    pub loader: LoaderConfig,
    /// Ranked list source and view
    pub list: ListConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Ranked list settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Ranked list endpoint; the API key is appended as the last path segment
    pub endpoint: String,
    /// API key, lowest precedence after `--api-key` and the environment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Items shown when no search query is active
    pub preview_limit: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            endpoint: api::TOP_MOVIES_URL.to_string(),
            api_key: None,
            preview_limit: list::DEFAULT_PREVIEW_LIMIT,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration
    ///
    /// An explicit `config_file_override` must exist. Without one, the
    /// standard locations are searched and defaults are used when none has
    /// a file.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) if path.exists() => Some(path),
            Some(path) => return Err(ConfigError::NotFound { path }),
            None => Self::find_config_file(),
        };

        match config_path {
            Some(path) => Self::load_from_file(&path).await,
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Find configuration file in standard locations
    pub fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(paths::LOCAL_FILE_NAME)];
        if let Some(user_path) = Self::default_config_path() {
            search_paths.push(user_path);
        }

        for path in search_paths {
            if path.exists() {
                debug!("Found config file: {}", path.display());
                return Some(path);
            }
        }

        debug!("No config file found in standard locations");
        None
    }

    /// Default config file path for the current user
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(paths::APP_DIR_NAME).join(paths::USER_FILE_NAME))
    }

    /// Load and validate configuration from a TOML file
    pub async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Reject values that would leave a component unusable
    pub fn validate(&self) -> ConfigResult<()> {
        if self.image_cache.capacity == 0 {
            return Err(invalid("image_cache.capacity", "0", "Capacity must be at least 1"));
        }
        if self.response_cache.enabled && self.response_cache.capacity == 0 {
            return Err(invalid(
                "response_cache.capacity",
                "0",
                "Capacity must be at least 1, or set enabled = false",
            ));
        }
        if self.response_cache.enabled && self.response_cache.max_entry_bytes == 0 {
            return Err(invalid(
                "response_cache.max_entry_bytes",
                "0",
                "Limit must be at least 1 byte",
            ));
        }
        if self.list.preview_limit == 0 {
            return Err(invalid("list.preview_limit", "0", "Limit must be at least 1"));
        }
        if let Err(e) = url::Url::parse(&self.list.endpoint) {
            return Err(invalid("list.endpoint", &self.list.endpoint, &e.to_string()));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(invalid(
                "logging.level",
                &self.logging.level,
                "Expected one of error, warn, info, debug, trace",
            ));
        }
        Ok(())
    }

    /// Resolve the API key: command line, then environment, then config file
    pub fn resolve_api_key(&self, cli_key: Option<&str>) -> ConfigResult<String> {
        self.resolve_api_key_from(cli_key, std::env::var(env::API_KEY).ok())
    }

    fn resolve_api_key_from(
        &self,
        cli_key: Option<&str>,
        env_key: Option<String>,
    ) -> ConfigResult<String> {
        cli_key
            .map(str::to_string)
            .or(env_key)
            .or_else(|| self.list.api_key.clone())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingValue {
                field: "api_key".to_string(),
                hint: format!(
                    "Pass --api-key, set {} (a .env file works), or set list.api_key",
                    env::API_KEY
                ),
            })
    }

    /// Ranked list source for the configured endpoint
    pub fn list_source(&self, api_key: impl Into<String>) -> RankedListSource {
        RankedListSource::new(self.list.endpoint.as_str(), api_key)
    }

    /// Copy with secrets masked, for display
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.list.api_key.is_some() {
            config.list.api_key = Some("<redacted>".to_string());
        }
        config
    }

    /// Render as TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write a commented default config file at `path` unless one exists
    ///
    /// Returns `false` when the file was already there.
    pub async fn write_default(path: &Path) -> ConfigResult<bool> {
        if path.exists() {
            return Ok(false);
        }

        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }
        tokio::fs::write(path, Self::generate_default_config_content())
            .await
            .map_err(write_error)?;

        info!("Created default configuration: {}", path.display());
        Ok(true)
    }

    /// Default configuration content with comments
    pub fn generate_default_config_content() -> String {
        let defaults = AppConfig::default();
        format!(
            r#"# Top Movies Configuration
# Remove or change any setting; missing values fall back to defaults.

[client]
request_timeout = "{request_timeout}"
connect_timeout = "{connect_timeout}"
pool_idle_timeout = "{pool_idle_timeout}"
pool_max_per_host = {pool_max_per_host}
tcp_nodelay = true
user_agent = "{user_agent}"

[client.default_headers]
# Accept = "application/json"

[response_cache]
# Keeps validated GET responses in memory, keyed by the full request
enabled = true
capacity = {response_capacity}
max_entry_bytes = {max_entry_bytes}

[image_cache]
# Decoded poster images kept in memory, least recently used evicted first
capacity = {image_capacity}

[loader]
# Share one request between concurrent loads of the same poster
coalesce_in_flight = false

[list]
endpoint = "{endpoint}"
preview_limit = {preview_limit}
# api_key = "k_xxxxxxxx"  # Prefer {env_key} or --api-key

[logging]
level = "warn"  # error, warn, info, debug, trace
"#,
            request_timeout = humantime::format_duration(defaults.client.request_timeout),
            connect_timeout = humantime::format_duration(defaults.client.connect_timeout),
            pool_idle_timeout = humantime::format_duration(
                defaults.client.pool_idle_timeout.unwrap_or_default()
            ),
            pool_max_per_host = defaults.client.pool_max_per_host,
            user_agent = defaults.client.user_agent,
            response_capacity = defaults.response_cache.capacity,
            max_entry_bytes = defaults.response_cache.max_entry_bytes,
            image_capacity = defaults.image_cache.capacity,
            endpoint = defaults.list.endpoint,
            preview_limit = defaults.list.preview_limit,
            env_key = env::API_KEY,
        )
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_creation() {
        let config = AppConfig::default();

        // Verify defaults are reasonable
        assert_eq!(config.list.preview_limit, list::DEFAULT_PREVIEW_LIMIT);
        assert_eq!(config.list.endpoint, api::TOP_MOVIES_URL);
        assert_eq!(config.logging.level, "warn");
        assert!(config.response_cache.enabled);
        assert!(!config.loader.coalesce_in_flight);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_generation() {
        let content = AppConfig::generate_default_config_content();

        // Should be valid TOML that matches the defaults
        let parsed: AppConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed, AppConfig::default());
        assert!(content.contains("# Top Movies Configuration"));
        assert!(content.contains("[image_cache]"));
    }

    #[tokio::test]
    async fn test_config_loading_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        // Should fail when explicitly specified
        let result = AppConfig::load(Some(config_path)).await;
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_config_loading_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let test_config = r#"
[client]
request_timeout = "5s"
pool_idle_timeout = "2m"

[client.default_headers]
Accept = "application/json"

[image_cache]
capacity = 32

[list]
preview_limit = 5
api_key = "from-file"

[logging]
level = "debug"
"#;
        tokio::fs::write(&config_path, test_config).await.unwrap();

        let config = AppConfig::load(Some(config_path)).await.unwrap();

        // Custom values
        assert_eq!(config.client.request_timeout, Duration::from_secs(5));
        assert_eq!(config.client.pool_idle_timeout, Some(Duration::from_secs(120)));
        assert_eq!(
            config.client.default_headers.get("Accept").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(config.image_cache.capacity, 32);
        assert_eq!(config.list.preview_limit, 5);
        assert_eq!(config.logging.level, "debug");

        // Defaults for unspecified values
        assert_eq!(config.response_cache, ResponseCacheConfig::default());
        assert_eq!(config.list.endpoint, api::TOP_MOVIES_URL);
    }

    #[tokio::test]
    async fn test_invalid_toml_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        tokio::fs::write(&config_path, "[image_cache\ncapacity = ").await.unwrap();

        let result = AppConfig::load_from_file(&config_path).await;
        assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
    }

    #[tokio::test]
    async fn test_zero_capacity_rejected_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("zero.toml");
        tokio::fs::write(&config_path, "[image_cache]\ncapacity = 0\n").await.unwrap();

        let result = AppConfig::load_from_file(&config_path).await;
        match result {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "image_cache.capacity"),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rules() {
        let mut config = AppConfig::default();
        config.response_cache.capacity = 0;
        assert!(config.validate().is_err());

        // A disabled response cache may have any size
        config.response_cache.enabled = false;
        assert!(config.validate().is_ok());

        let mut config = AppConfig::default();
        config.list.preview_limit = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.list.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_key_precedence() {
        let mut config = AppConfig::default();
        config.list.api_key = Some("file".to_string());

        let key = config
            .resolve_api_key_from(Some("cli"), Some("env".to_string()))
            .unwrap();
        assert_eq!(key, "cli");

        let key = config
            .resolve_api_key_from(None, Some("env".to_string()))
            .unwrap();
        assert_eq!(key, "env");

        let key = config.resolve_api_key_from(None, None).unwrap();
        assert_eq!(key, "file");
    }

    #[test]
    fn test_api_key_missing() {
        let config = AppConfig::default();
        let result = config.resolve_api_key_from(Some("   "), None);
        assert!(matches!(result, Err(ConfigError::MissingValue { .. })));
    }

    #[test]
    fn test_redacted_toml_hides_key() {
        let mut config = AppConfig::default();
        config.list.api_key = Some("k_secret".to_string());

        let rendered = config.redacted().to_toml().unwrap();
        assert!(!rendered.contains("k_secret"));
        assert!(rendered.contains("<redacted>"));

        // Without a key the field is omitted entirely
        let rendered = AppConfig::default().to_toml().unwrap();
        assert!(!rendered.contains("api_key"));
        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[tokio::test]
    async fn test_write_default_once() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        assert!(AppConfig::write_default(&config_path).await.unwrap());
        assert!(!AppConfig::write_default(&config_path).await.unwrap());

        let config = AppConfig::load(Some(config_path)).await.unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_list_source_uses_endpoint() {
        let mut config = AppConfig::default();
        config.list.endpoint = "http://localhost:9000/top".to_string();
        assert_eq!(
            config.list_source("k").descriptor().address(),
            "http://localhost:9000/top/k"
        );
    }
}
