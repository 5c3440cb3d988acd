//! Application configuration and constants.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Main loop tick rate in milliseconds (target 60 FPS = ~16ms)
    pub tick_rate_ms: u64,

    /// How many ticks to show status messages (180 = ~3s at 60fps)
    pub status_timeout_ticks: u64,

    /// Lines to scroll per key press
    pub scroll_step: usize,

    /// Width of the sidebar in characters
    pub sidebar_width: u16,

    /// Entries shown in the dashboard activity list
    pub recent_activity_limit: usize,

    /// Where F3 writes transcript exports
    pub export_dir: PathBuf,

    /// Log file used while the terminal UI owns the screen
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            status_timeout_ticks: 180,
            scroll_step: 3,
            sidebar_width: 28,
            recent_activity_limit: 10,
            export_dir: PathBuf::from("."),
            log_file: std::env::temp_dir().join("drivechat.log"),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

/// Preset commands offered by the "/" popup
pub const COMMANDS: &[(&str, &str)] = &[
    ("LIST /ProjectX", "Show files in ProjectX folder"),
    ("SUMMARY /ProjectX", "AI summary of all documents"),
    ("MOVE /ProjectX/presentation.pptx /Archive/", "Move presentation to archive"),
    ("Show me files in /Documents", "Natural language query"),
    ("LIST /", "Show top-level folders"),
    ("DELETE /Archive/old_report.pdf", "Delete an archived report"),
    ("HELP", "Show available commands"),
];
