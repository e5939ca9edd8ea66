//! Configuration management for worklens.
//!
//! The tracker's base URL and bearer token are opaque prerequisites of the
//! pipeline. They come either from the environment (`JIRA_URL` and
//! `JIRA_TOKEN`, with `.env` support) or from a JSON configuration file
//! under the user's home directory. The environment wins so deployments
//! can override a stored file without touching it.

use crate::api::jira::JiraConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::PathBuf;

/// Configuration file name inside the application directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Application directory under the user's home.
const APP_DIR: &str = ".worklens";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    pub jira: JiraConfig,
}

impl Config {
    /// Loads configuration from the environment, falling back to the
    /// stored `config.json`.
    pub fn read() -> Result<Self> {
        dotenv::dotenv().ok();

        if let (Ok(api_url), Ok(token)) = (env::var("JIRA_URL"), env::var("JIRA_TOKEN")) {
            return Ok(Self {
                jira: JiraConfig { api_url, token },
            });
        }

        let path = Self::file_path()?;
        let file = File::open(&path).with_context(|| format!("Configuration file not found: {}", path.display()))?;
        serde_json::from_reader(file).with_context(|| "Failed to parse configuration")
    }

    /// Persists the configuration to `config.json`, creating the
    /// application directory if needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::file_path()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = File::create(&path).with_context(|| "Failed to save configuration")?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    fn file_path() -> Result<PathBuf> {
        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| anyhow!("Home directory not found"))?;
        Ok(PathBuf::from(home).join(APP_DIR).join(CONFIG_FILE_NAME))
    }
}
