//! Renderer configuration (imvec.toml)

use crate::polygon::ShadingPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level renderer configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RendererConfig {
    #[serde(default)]
    pub shading: ShadingPolicy,
    #[serde(default)]
    pub text: TextConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

/// Glyph run handling
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TextConfig {
    /// Draw glyph cells as text; when off they go through the polygon path
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Family used for fonts that carry no name
    #[serde(default = "default_family")]
    pub default_family: String,
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_true() -> bool {
    true
}

fn default_family() -> String {
    "Arial".to_string()
}

fn default_locale() -> String {
    "en-US".to_string()
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_family: default_family(),
            locale: default_locale(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DebugConfig {
    /// Stroke every reconstructed polygon with this width
    #[serde(default)]
    pub outline_width: Option<f32>,
}

impl RendererConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded renderer config from {}", path.display());
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
