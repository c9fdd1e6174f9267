use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gateway::CommandGateway;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub log_dir: PathBuf,
    pub autosave_delay_ms: u64,
    pub sequence_timeout_ms: u64,
    pub undo_limit: usize,
    pub message_timeout_secs: u64,
    /// External evaluation and suggestion service. Analysis keys are
    /// disabled without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<CommandGateway>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zwicky");

        Self {
            data_path: data_dir.join("boxes.json"),
            log_dir: crate::logging::default_log_dir(),
            autosave_delay_ms: 1000,
            sequence_timeout_ms: 1000,
            undo_limit: 50,
            message_timeout_secs: 5,
            gateway: None,
        }
    }
}

impl AppConfig {
    /// `<config_dir>/zwicky/config.toml`
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("zwicky").join("config.toml"))
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    pub fn sequence_timeout(&self) -> Duration {
        Duration::from_millis(self.sequence_timeout_ms)
    }

    pub fn message_timeout(&self) -> Duration {
        Duration::from_secs(self.message_timeout_secs)
    }
}
