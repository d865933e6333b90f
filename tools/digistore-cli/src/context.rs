//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use digistore_sdk::{telemetry, Storefront, StorefrontConfig};

use crate::output::Output;

/// Config file names searched for, in order, from the working directory up.
pub const CONFIG_NAMES: [&str; 3] = ["digistore.toml", ".digistore.toml", "digistore.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// Storefront configuration, paths resolved and env overrides applied.
    pub config: StorefrontConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, Path::new(path));
                let config = StorefrontConfig::load(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?;
                (config, Some(path))
            }
            // Try to find config in current directory or parent directories
            None => match find_config(&cwd) {
                Some((path, config)) => (config, Some(path)),
                None => (StorefrontConfig::default(), None),
            },
        };

        // Relative paths are relative to the config file
        let base = config_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.clone());
        let mut config = config.resolve_paths(&base).with_env_overrides();
        if output.is_verbose() {
            config.logging.level = "debug".to_string();
        }

        telemetry::init(&config.logging);
        output.debug(&match &config_path {
            Some(path) => format!("Using config {}", path.display()),
            None => "No config file found, using defaults".to_string(),
        });

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Open the storefront described by the configuration.
    pub fn storefront(&self) -> Result<Storefront> {
        Storefront::open(&self.config).with_context(|| {
            format!(
                "Failed to open storefront (data: {}, storage: {})",
                self.config.data.dir.display(),
                self.config.storage.path.display()
            )
        })
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.cwd, Path::new(path))
    }
}

fn resolve(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Find config file in directory tree.
fn find_config(start: &Path) -> Option<(PathBuf, StorefrontConfig)> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                if let Ok(config) = StorefrontConfig::load(&config_path) {
                    return Some((config_path, config));
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            root.path().join("digistore.toml"),
            "[session]\nlatency_ms = 5\n",
        )
        .unwrap();

        let (path, config) = find_config(&nested).unwrap();
        assert_eq!(path, root.path().join("digistore.toml"));
        assert_eq!(config.session.latency_ms, 5);
    }

    #[test]
    fn test_resolve_keeps_absolute() {
        let cwd = Path::new("/work");
        assert_eq!(resolve(cwd, Path::new("/etc/x")), PathBuf::from("/etc/x"));
        assert_eq!(resolve(cwd, Path::new("x")), PathBuf::from("/work/x"));
    }
}
