//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "TESTRUN";

/// Configuration overrides read from environment variables
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Config file from TESTRUN_CONFIG
    pub config_file: Option<String>,
    /// Log level from TESTRUN_LOG
    pub log_level: Option<String>,
    /// Recursive scanning from TESTRUN_RECURSIVE
    pub recursive: Option<bool>,
    /// Color from TESTRUN_COLOR, forced off by NO_COLOR
    pub color: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}_{name}"));

        let color = if lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            Some(false)
        } else {
            get("COLOR").map(|v| parse_bool(&v))
        };

        Self {
            config_file: get("CONFIG"),
            log_level: get("LOG"),
            recursive: get("RECURSIVE").map(|v| parse_bool(&v)),
            color,
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.config_file.is_some()
            || self.log_level.is_some()
            || self.recursive.is_some()
            || self.color.is_some()
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "enabled"
    )
}
