//! Configuration module
//!
//! Handles loading and managing configuration.

mod env;
mod file;

pub use env::EnvConfig;
pub use file::{expand_path, find_config, is_yaml_file, CONFIG_LOCATIONS};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::utils::LogLevel;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scan subdirectories when resolving a directory
    pub recursive: bool,

    /// Shell program and arguments used to run test commands
    pub shell: Vec<String>,

    /// Colorize console output
    pub color: bool,

    /// chrono format string for the log file preamble
    pub timestamp_format: String,

    /// File name prefix for per-suite XML reports
    pub xml_file_prefix: String,

    /// Default log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            shell: default_shell(),
            color: true,
            timestamp_format: "%d-%b-%Y %H:%M:%S".to_string(),
            xml_file_prefix: "TEST-".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

#[cfg(windows)]
fn default_shell() -> Vec<String> {
    vec!["cmd".to_string(), "/C".to_string()]
}

#[cfg(not(windows))]
fn default_shell() -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string()]
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, the environment, or the standard locations
    pub fn resolve(explicit: Option<&Path>, env: &EnvConfig) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env.config_file.as_deref().map(expand_path))
            .or_else(find_config);

        let mut config = match path {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::load(&path)?
            }
            None => Self::default(),
        };
        config.apply_env(env);
        Ok(config)
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(recursive) = env.recursive {
            self.recursive = recursive;
        }
        if let Some(color) = env.color {
            self.color = color;
        }
        if let Some(level) = &env.log_level {
            self.log_level = level.clone();
        }
    }

    /// Configured log level, after environment overrides
    pub fn log_level(&self) -> Result<LogLevel> {
        self.log_level
            .parse()
            .map_err(|e| anyhow!("Invalid log_level {:?}: {}", self.log_level, e))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.shell.is_empty() {
            anyhow::bail!("shell must name a program, e.g. [\"sh\", \"-c\"]");
        }
        if self.timestamp_format.is_empty() {
            anyhow::bail!("timestamp_format must not be empty");
        }
        Ok(())
    }
}
