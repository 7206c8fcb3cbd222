//! Validation configuration.
//!
//! The caller assembles one [`ValidationConfig`] from whichever storage it
//! uses and passes it into every validation call; nothing here is read from
//! ambient globals. Loaders accept the TOML shape used by deployment config
//! files as well as the JSON shape stored alongside the board.

use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::core::lookup::NameSet;

/// Shared default configuration for callers with no stored overrides.
pub static DEFAULT_CONFIG: Lazy<ValidationConfig> = Lazy::new(ValidationConfig::default);

/// Knobs for one validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationConfig {
    /// Resource names excluded from conflict analysis entirely.
    pub ignored_resources: Vec<String>,
    /// Activity names excluded from same-day repetition checks.
    pub ignored_activities: Vec<String>,
    /// Keywords every scheduled bunk's day must contain somewhere.
    pub required_activities: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            ignored_resources: vec![
                "free".to_string(),
                "lunch".to_string(),
                "swim".to_string(),
                "dismissal".to_string(),
            ],
            ignored_activities: vec!["free".to_string(), "lunch".to_string()],
            required_activities: vec!["lunch".to_string()],
        }
    }
}

impl ValidationConfig {
    /// Normalized set of ignored resource names.
    pub fn ignored_resource_set(&self) -> NameSet {
        NameSet::from_names(&self.ignored_resources)
    }

    /// Normalized set of ignored activity names.
    pub fn ignored_activity_set(&self) -> NameSet {
        NameSet::from_names(&self.ignored_activities)
    }

    /// Load from a TOML string.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse validation config TOML")
    }

    /// Load from a JSON string.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let mut de = serde_json::Deserializer::from_str(contents);
        serde_path_to_error::deserialize(&mut de)
            .context("Failed to parse validation config JSON")
    }

    /// Load from a file, auto-detected by extension (`.toml` or `.json`).
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .context("Config file has no extension")?;

        match extension.to_lowercase().as_str() {
            "toml" => Self::from_toml_str(&contents),
            "json" => Self::from_json_str(&contents),
            _ => anyhow::bail!("Unsupported config format: {}", extension),
        }
    }
}
