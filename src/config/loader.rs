//! Configuration loading utilities
//!
//! Provides helper functions for loading configuration from various sources
//! with proper error handling and validation.

use crate::{Result, config::Settings};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory name used under the platform config dir
const APP_DIR: &str = "ablesci-checkin";

/// Settings plus every problem that was worked around while loading them
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub settings: Settings,
    /// Skipped overrides and reset fields, in discovery order
    pub warnings: Vec<String>,
}

/// Configuration loader with multiple source support
#[derive(Debug)]
pub struct ConfigLoader {
    /// Default settings
    defaults: Settings,
}

impl ConfigLoader {
    /// Create new configuration loader
    pub fn new() -> Self {
        Self {
            defaults: Settings::default(),
        }
    }

    /// Load configuration with precedence order:
    /// 1. Command line arguments (highest priority, applied by the caller)
    /// 2. Environment variables
    /// 3. Configuration file
    /// 4. Default values (lowest priority)
    ///
    /// Only an unreadable or malformed file is an error. A bad environment
    /// variable or an invalid value costs that one setting, never the rest.
    pub fn load(&self, config_file: Option<&Path>) -> Result<LoadedConfig> {
        let mut settings = self.defaults.clone();
        let mut warnings = Vec::new();

        match config_file {
            Some(path) if path.exists() => {
                info!("Loading configuration from file: {:?}", path);
                settings = Settings::from_file(path)?;
            }
            Some(path) => {
                warnings.push(format!(
                    "configuration file {} not found, using defaults",
                    path.display()
                ));
            }
            None => {
                if let Some(path) = default_config_path().filter(|p| p.exists()) {
                    info!("Loading configuration from default location: {:?}", path);
                    settings = Settings::from_file(&path)?;
                }
            }
        }

        Ok(Self::finish(settings, warnings))
    }

    /// Defaults plus environment overrides, ignoring any file
    pub fn from_env_only(&self) -> LoadedConfig {
        Self::finish(self.defaults.clone(), Vec::new())
    }

    fn finish(mut settings: Settings, mut warnings: Vec<String>) -> LoadedConfig {
        debug!("Applying environment variable overrides");
        warnings.extend(settings.merge_with_env());
        warnings.extend(settings.sanitize());

        debug!("Final configuration: {:?}", settings);

        LoadedConfig { settings, warnings }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Platform default config file, e.g. `~/.config/ablesci-checkin/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}
