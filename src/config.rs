use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::models::CompletionPolicy;

const APP_NAME: &str = "project-ledger";
const CONFIG_FILE: &str = "config.json";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PLEDGER_CONFIG";

/// How summaries are printed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SummaryFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Whether completing an already completed or cancelled project is allowed.
    pub completion_policy: CompletionPolicy,
    pub summary_format: SummaryFormat,
}

impl AppConfig {
    /// Load configuration from `path`, `$PLEDGER_CONFIG`, or the user's config
    /// directory, in that order.
    /// Returns default config if the file doesn't exist or fails to parse.
    pub fn load(path: Option<&Path>) -> Self {
        let resolved = match path {
            Some(p) => Some(p.to_path_buf()),
            None => std::env::var_os(CONFIG_ENV)
                .map(PathBuf::from)
                .or_else(|| get_config_path().ok()),
        };

        let Some(config_path) = resolved else {
            return Self::default();
        };

        match Self::try_load(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn try_load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).context("Failed to read config file")?;

        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        tracing::debug!("Loaded config from {}", config_path.display());
        Ok(config)
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
