use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Context, Result, anyhow};

use crate::reply::DEFAULT_REPLY_DELAY;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Simulated typing delay before the bot answers
    pub reply_delay_ms: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reply_delay_ms: DEFAULT_REPLY_DELAY.as_millis() as u64,
            log_file: None,
        }
    }
}

impl Config {
    /// Load from the user config directory, falling back to defaults when the
    /// file does not exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    #[cfg(test)]
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Apply command-line overrides on top of file values
    pub fn with_overrides(mut self, reply_delay_ms: Option<u64>, log_file: Option<PathBuf>) -> Self {
        if let Some(ms) = reply_delay_ms {
            self.reply_delay_ms = ms;
        }
        if log_file.is_some() {
            self.log_file = log_file;
        }
        self
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    /// Log file in use: explicit setting, else `museum-mate.log` beside the config
    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("museum-mate.log")),
        }
    }

    fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("museum-mate"))
    }

    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}
