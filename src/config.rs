//! Configuration module for stream scanners
//!
//! Configuration arrives as JSON bytes from the embedding application.
//! Nothing here touches the filesystem.

use serde::Deserialize;

use crate::streaming::{Pattern, RingError};

/// Scanner configuration
#[derive(Clone, Debug, Deserialize)]
pub struct ScannerConfig {
    /// Text to search for, matched byte-for-byte as UTF-8
    pub pattern: String,

    /// Name reported on match (defaults to the pattern itself)
    #[serde(default)]
    pub name: Option<String>,

    /// Window size in bytes (defaults to the pattern length)
    #[serde(default)]
    pub capacity: Option<usize>,

    /// Whether to log matched patterns
    #[serde(default = "default_log_matches")]
    pub log_matches: bool,
}

fn default_log_matches() -> bool {
    true
}

impl ScannerConfig {
    /// Build a config for `pattern` with all defaults
    pub fn for_pattern(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            name: None,
            capacity: None,
            log_matches: default_log_matches(),
        }
    }

    /// Parse configuration from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config_str = std::str::from_utf8(bytes)
            .map_err(|e| ConfigError::InvalidUtf8(e.to_string()))?;

        let config: Self = serde_json::from_str(config_str)
            .map_err(|e| ConfigError::InvalidJson(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no scanner could be built from
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pattern.is_empty() {
            return Err(ConfigError::Invalid(RingError::EmptyPattern));
        }
        match self.capacity {
            Some(0) => Err(ConfigError::Invalid(RingError::ZeroCapacity)),
            Some(capacity) if capacity < self.pattern.len() => {
                Err(ConfigError::Invalid(RingError::PatternTooLong {
                    pattern_len: self.pattern.len(),
                    capacity,
                }))
            }
            _ => Ok(()),
        }
    }

    /// Window size the scanner will allocate
    pub fn window_capacity(&self) -> usize {
        self.capacity.unwrap_or(self.pattern.len())
    }

    pub fn to_pattern(&self) -> Pattern {
        match &self.name {
            Some(name) => Pattern::new(name, self.pattern.as_bytes()),
            None => Pattern::from_string(&self.pattern),
        }
    }
}

/// Configuration parsing errors
#[derive(Debug)]
pub enum ConfigError {
    InvalidUtf8(String),
    InvalidJson(String),
    Invalid(RingError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidUtf8(e) => write!(f, "Invalid UTF-8: {}", e),
            ConfigError::InvalidJson(e) => write!(f, "Invalid JSON: {}", e),
            ConfigError::Invalid(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
