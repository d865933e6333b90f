//! Storefront configuration.
//!
//! Loaded from TOML (or JSON, by extension), then overridden by
//! `DIGISTORE_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::SdkError;

/// Environment variable overriding `data.dir`.
pub const ENV_DATA_DIR: &str = "DIGISTORE_DATA_DIR";
/// Environment variable overriding `storage.path` (and forcing the file backend).
pub const ENV_STORAGE_PATH: &str = "DIGISTORE_STORAGE_PATH";
/// Environment variable overriding `logging.level`.
pub const ENV_LOG: &str = "DIGISTORE_LOG";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Reference data location.
    #[serde(default)]
    pub data: DataConfig,

    /// Where engine state is persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StorefrontConfig {
    /// Load config from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SdkError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SdkError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let parsed = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            toml::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|reason| SdkError::Config {
            path: path.display().to_string(),
            reason,
        })
    }

    /// Parse TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SdkError> {
        toml::from_str(content).map_err(|e| SdkError::Config {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Save config to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SdkError> {
        let path = path.as_ref();
        let to_config_error = |reason: String| SdkError::Config {
            path: path.display().to_string(),
            reason,
        };

        let content = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            serde_json::to_string_pretty(self).map_err(|e| to_config_error(e.to_string()))?
        } else {
            toml::to_string_pretty(self).map_err(|e| to_config_error(e.to_string()))?
        };

        std::fs::write(path, content).map_err(|e| to_config_error(e.to_string()))
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.data.dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup(ENV_STORAGE_PATH).filter(|v| !v.is_empty()) {
            self.storage.backend = StorageBackend::File;
            self.storage.path = PathBuf::from(path);
        }
        if let Some(level) = lookup(ENV_LOG).filter(|v| !v.is_empty()) {
            self.logging.level = level;
        }
        self
    }

    /// Resolve relative paths against `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        if self.data.dir.is_relative() {
            self.data.dir = base.join(&self.data.dir);
        }
        if let Some(messages) = self.data.messages_dir.as_mut() {
            if messages.is_relative() {
                *messages = base.join(&*messages);
            }
        }
        if self.storage.path.is_relative() {
            self.storage.path = base.join(&self.storage.path);
        }
        self
    }
}

/// Reference data location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding `products.json`, `coupons.json` and friends.
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,

    /// Message catalog directory (default: `<dir>/messages`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages_dir: Option<PathBuf>,
}

impl DataConfig {
    pub fn messages_dir(&self) -> PathBuf {
        self.messages_dir
            .clone()
            .unwrap_or_else(|| self.dir.join("messages"))
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            messages_dir: None,
        }
    }
}

/// Storage backend kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// State lives only as long as the process.
    Memory,
    /// One JSON file per record.
    #[default]
    File,
}

/// Persistence configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file backend.
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".digistore")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
        }
    }
}

/// Simulated session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Simulated round-trip latency in milliseconds.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
}

fn default_latency_ms() -> u64 {
    1000
}

impl SessionConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `digistore_commerce=debug`.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Generate a default `digistore.toml`.
pub fn generate_default_config() -> String {
    r#"# DigiStore configuration

[data]
dir = "data"
# messages_dir = "data/messages"

[storage]
backend = "file"   # or "memory"
path = ".digistore"

[session]
latency_ms = 1000

[logging]
level = "warn"
format = "pretty"  # or "json"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_parses_to_defaults() {
        let config = StorefrontConfig::from_toml_str(&generate_default_config()).unwrap();
        assert_eq!(config, StorefrontConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = StorefrontConfig::from_toml_str(
            r#"
            [storage]
            backend = "memory"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.path, PathBuf::from(".digistore"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.session.latency(), Duration::from_secs(1));
        assert_eq!(config.data.messages_dir(), PathBuf::from("data/messages"));
    }

    #[test]
    fn test_invalid_config() {
        let result = StorefrontConfig::from_toml_str("[storage]\nbackend = \"s3\"\n");
        assert!(matches!(result, Err(SdkError::Config { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_DATA_DIR, "/srv/digistore/data"),
            (ENV_STORAGE_PATH, "/var/lib/digistore"),
            (ENV_LOG, "debug"),
        ]
        .into_iter()
        .collect();

        let mut base = StorefrontConfig::default();
        base.storage.backend = StorageBackend::Memory;
        let config = base.with_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.data.dir, PathBuf::from("/srv/digistore/data"));
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.path, PathBuf::from("/var/lib/digistore"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StorefrontConfig::default();
        config.session.latency_ms = 5;

        for name in ["digistore.toml", "digistore.json"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(StorefrontConfig::load(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_resolve_paths() {
        let config = StorefrontConfig::default().resolve_paths(Path::new("/opt/shop"));
        assert_eq!(config.data.dir, PathBuf::from("/opt/shop/data"));
        assert_eq!(config.storage.path, PathBuf::from("/opt/shop/.digistore"));
        assert_eq!(config.data.messages_dir(), PathBuf::from("/opt/shop/data/messages"));
    }

    #[test]
    fn test_resolve_paths_covers_messages_dir() {
        let mut config = StorefrontConfig::default();
        config.data.messages_dir = Some(PathBuf::from("i18n"));
        let config = config.resolve_paths(Path::new("/opt/shop"));
        assert_eq!(config.data.messages_dir(), PathBuf::from("/opt/shop/i18n"));

        let mut config = StorefrontConfig::default();
        config.data.messages_dir = Some(PathBuf::from("/srv/i18n"));
        let config = config.resolve_paths(Path::new("/opt/shop"));
        assert_eq!(config.data.messages_dir(), PathBuf::from("/srv/i18n"));
    }
}
