//! Application configuration.
//!
//! Settings are read from `config.json` under the user's config directory and
//! can be overridden with `FLEETQUERY_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Directory name under the platform config directory.
const APP_DIR: &str = "fleetquery";
const CONFIG_FILE: &str = "config.json";
const ENV_PREFIX: &str = "FLEETQUERY";

/// Runtime settings for the console front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// World snapshot to open; the bundled demo world is used when unset.
    pub world_path: Option<PathBuf>,
    /// Directory receiving log files.
    pub log_dir: PathBuf,
    /// Start in scenario editor mode.
    pub editor_mode: bool,
    /// Treat the session as a networked game.
    pub networked: bool,
    /// Fixed seed for the session random generator.
    pub rng_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            world_path: None,
            log_dir: config_dir().join("logs"),
            editor_mode: false,
            networked: false,
            rng_seed: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from `path`, layering environment overrides on top.
    /// A missing file yields the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::new(&path.to_string_lossy(), FileFormat::Json).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;
        settings
            .try_deserialize()
            .with_context(|| format!("invalid config {}", path.display()))
    }

    /// Write this configuration as pretty JSON.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory {}", parent.display())
            })?;
        }
        let serialized =
            serde_json::to_string_pretty(self).context("failed to serialize configuration")?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write config {}", path.display()))
    }
}

/// Platform config directory for this application.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Location of the configuration file.
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Write the default configuration if no file exists yet.
pub fn ensure_default_config() -> Result<()> {
    ensure_default_config_at(config_path())
}

fn ensure_default_config_at(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    AppConfig::default().persist(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.json"))?;
        assert!(!config.editor_mode);
        assert!(!config.networked);
        assert_eq!(config.rng_seed, None);
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"{ "world_path": "/tmp/world.json", "editor_mode": true, "rng_seed": 7 }"#,
        )?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.world_path, Some(PathBuf::from("/tmp/world.json")));
        assert!(config.editor_mode);
        assert!(!config.networked);
        assert_eq!(config.rng_seed, Some(7));
        Ok(())
    }

    #[test]
    fn default_config_is_written_once() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join(CONFIG_FILE);
        ensure_default_config_at(&path)?;
        assert!(path.exists());

        fs::write(&path, r#"{ "networked": true }"#)?;
        ensure_default_config_at(&path)?;
        assert!(AppConfig::load_from(&path)?.networked);
        Ok(())
    }
}
