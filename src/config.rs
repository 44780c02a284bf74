// Thu Oct 15 2026 - Alex

use crate::types::Endianness;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endianness: Endianness,
    pub lenient_enums: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endianness: Endianness::Little,
            lenient_enums: true,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    pub fn with_lenient_enums(mut self, lenient: bool) -> Self {
        self.lenient_enums = lenient;
        self
    }

    pub fn with_log_level(mut self, level: &str) -> Self {
        self.log_level = level.to_string();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        match self.log_level.to_lowercase().as_str() {
            "off" | "error" | "warn" | "warning" | "info" | "debug" | "trace" => Ok(()),
            other => Err(format!("unknown log level {}", other)),
        }
    }
}
