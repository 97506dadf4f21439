use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Directory `#include` directives resolve against when none is configured.
pub const DEFAULT_INCLUDE_DIR: &str = "shaders/include";

/// Shader pipeline configuration.
///
/// Every field has a default, so a partial (or empty) JSON object is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    /// Root directory for `#include` targets.
    pub include_dir: PathBuf,
    /// Remember uniform locations per program instead of querying the
    /// driver on every set call.
    pub cache_uniform_locations: bool,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            include_dir: PathBuf::from(DEFAULT_INCLUDE_DIR),
            cache_uniform_locations: true,
        }
    }
}

impl ShaderConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        Ok(config)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn with_include_dir(mut self, include_dir: impl Into<PathBuf>) -> Self {
        self.include_dir = include_dir.into();
        self
    }
}
