//! Configuration loading and persistence with atomic file operations.

use crate::schema::Config;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use transtag_common::{Result, TransError};

/// Overrides `locales.dir`.
pub const ENV_LOCALES_DIR: &str = "TRANSTAG_LOCALES_DIR";
/// Overrides `render.language`.
pub const ENV_LANGUAGE: &str = "TRANSTAG_LANGUAGE";
/// Overrides `render.domain`.
pub const ENV_DOMAIN: &str = "TRANSTAG_DOMAIN";

/// Configuration loader with atomic file operations.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this loader reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads configuration from file, then applies environment overrides.
    ///
    /// A missing file yields the defaults.
    pub fn load(&self) -> Result<Config> {
        self.load_with_env(|name| std::env::var(name).ok())
    }

    /// Like [`load`](Self::load), reading overrides through `env`.
    pub fn load_with_env<F>(&self, env: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match fs::read_to_string(&self.path) {
            Ok(content) => {
                debug!(path = %self.path.display(), "Read configuration file");
                Self::parse(&content)?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No configuration file, using defaults");
                Config::default()
            }
            Err(e) => return Err(e.into()),
        };

        Self::apply_env_overrides(&mut config, env);
        config.validate()?;
        Ok(config)
    }

    /// Parses TOML text without overrides or validation.
    pub fn parse(content: &str) -> Result<Config> {
        toml::from_str(content).map_err(|e| TransError::Serialization(e.to_string()))
    }

    /// Saves configuration to file atomically.
    ///
    /// The content goes to a temporary file in the target directory first
    /// and is then renamed over the destination.
    pub fn save(&self, config: &Config) -> Result<()> {
        let content = toml::to_string_pretty(config).map_err(|e| TransError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(content.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| TransError::Io(e.error))?;

        info!(path = %self.path.display(), "Saved configuration");
        Ok(())
    }

    fn apply_env_overrides<F>(config: &mut Config, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = env(ENV_LOCALES_DIR) {
            config.locales.dir = PathBuf::from(dir);
        }

        if let Some(language) = env(ENV_LANGUAGE) {
            config.render.language = language;
        }

        if let Some(domain) = env(ENV_DOMAIN) {
            config.render.domain = domain;
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(crate::defaults::DEFAULT_CONFIG_FILE)
    }
}
