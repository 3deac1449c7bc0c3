//! TOML-based configuration for sqlmorph.
//!
//! Example configuration:
//! ```toml
//! [render]
//! max_depth = 256
//! param_style = "colon"
//!
//! [capabilities.mysql]
//! enable = ["nulls_ordering"]
//!
//! [capabilities.postgres]
//! disable = ["aggregate_filter"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::sql::dialect::ParamStyle;

/// Default limit on expression nesting during a render.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Render limits and placeholder style.
    pub render: RenderSettings,

    /// Per-dialect capability overrides, keyed by dialect name.
    pub capabilities: HashMap<String, CapabilityOverride>,
}

/// Render settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Maximum expression nesting before a render fails.
    pub max_depth: usize,

    /// Placeholder style; the dialect's own style when unset.
    pub param_style: Option<ParamStyle>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            param_style: None,
        }
    }
}

/// Features to add to or remove from a dialect's built-in set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CapabilityOverride {
    pub enable: Vec<String>,
    pub disable: Vec<String>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings = Self::from_toml(&content)?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SQLMORPH_CONFIG`
    /// 2. `./sqlmorph.toml`
    /// 3. `~/.config/sqlmorph/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("SQLMORPH_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("sqlmorph.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("sqlmorph").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok(Settings::default())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.render.max_depth == 0 {
            return Err(SettingsError::InvalidConfig(
                "render.max_depth must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
