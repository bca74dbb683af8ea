// File: src/config.rs
// Purpose: Configuration parsing from cadastro.toml

use crate::enrichment::StalePolicy;
use crate::session::ValidationMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub lookup: LookupConfig,

    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Postal-code lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Service root; requests go to `{base_url}/{cep}/json/`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// No timeout unless set
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub stale_responses: StalePolicy,
}

/// Form validation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ValidationConfig {
    #[serde(default)]
    pub mode: ValidationMode,
}

// Default values
fn default_base_url() -> String {
    "https://viacep.com.br/ws".to_string()
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            stale_responses: StalePolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./cadastro.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("cadastro.toml")
    }
}
