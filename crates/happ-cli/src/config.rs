//! happ configuration
//!
//! Looked up in order: `--config FILE`, `./.happ.yaml`, then
//! `~/.config/happ/config.yaml`. Command-line flags override file values.
//!
//! ```yaml
//! diff:
//!   ignoreOrderChanges: true
//!   ignoreWhitespaceChange: false
//!   additionalIdentifierPaths: [meta.id]
//!   color: auto
//!   format: text
//! verify:
//!   timeout: 5m
//! ```

use happ_diff::{ColorMode, DiffOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{CliError, Result};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = ".happ.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HappConfig {
    pub diff: DiffConfig,
    pub verify: VerifyConfig,
}

/// Output format of `happ diff`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    #[serde(flatten)]
    pub options: DiffOptions,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorMode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Limit for the whole verification stage; zero disables it
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            timeout: default_verify_timeout(),
        }
    }
}

fn default_verify_timeout() -> Duration {
    Duration::from_secs(5 * 60)
}

impl HappConfig {
    /// Load the explicit file, or the first config found in the lookup order
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        let candidates = [Some(PathBuf::from(LOCAL_CONFIG_FILE)), Self::default_path()];
        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                return Self::load_from(&path);
            }
        }
        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::io_context(format!("read config {}", path.display()), e))?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| CliError::config(path, e.to_string()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Get default configuration path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("happ").join("config.yaml"))
    }
}
