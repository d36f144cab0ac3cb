//! Startup configuration for delver
//!
//! Defaults are read once at process start: an optional TOML file, then
//! environment overrides (`LLM_PROVIDER`, `LLM_MODEL`,
//! `MAX_WEB_RESEARCH_LOOPS`, `ENGINE_URL`). These values only seed CLI
//! argument defaults; every request carries its own configuration as
//! explicit data and nothing writes back into this structure or the
//! environment after startup.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub defaults: DefaultsConfig,
    pub engine: EngineConfig,
}

/// Seed values for per-request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub provider: String,
    pub model: String,
    pub max_loops: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "o3-mini".to_string(),
            max_loops: 10,
        }
    }
}

/// Research engine endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub url: String,
    /// Deadline for one engine call, in seconds (no deadline when absent)
    pub timeout_secs: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Path of the user-level config file.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("delver").join("config.toml"))
    }

    /// Load configuration: file if present, then environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path)?;
                toml::from_str(&content)?
            }
            _ => Config::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            self.defaults.provider = provider;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            self.defaults.model = model;
        }
        if let Ok(loops) = std::env::var("MAX_WEB_RESEARCH_LOOPS") {
            match loops.parse() {
                Ok(n) => self.defaults.max_loops = n,
                Err(_) => tracing::warn!("Ignoring non-numeric MAX_WEB_RESEARCH_LOOPS: {}", loops),
            }
        }
        if let Ok(url) = std::env::var("ENGINE_URL") {
            self.engine.url = url;
        }
    }
}
