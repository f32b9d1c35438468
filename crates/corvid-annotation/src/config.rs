//! Materialization settings
//!
//! Settings load from TOML:
//!
//! ```toml
//! max_depth = 16
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default nesting limit for annotations and arrays
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Errors that can occur while loading settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the settings file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Parsed but out of range
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Limits applied while materializing annotation trees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterializeConfig {
    /// Maximum nesting of annotations and arrays below the top-level node
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for MaterializeConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

impl MaterializeConfig {
    /// Parse settings from a TOML string
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ValidationError(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(MaterializeConfig::default().max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(
            MaterializeConfig::from_toml_str("").unwrap(),
            MaterializeConfig::default()
        );
    }

    #[test]
    fn test_parse_max_depth() {
        let config = MaterializeConfig::from_toml_str("max_depth = 3").unwrap();
        assert_eq!(config.max_depth, 3);
    }

    #[test]
    fn test_rejects_zero_depth() {
        let err = MaterializeConfig::from_toml_str("max_depth = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = MaterializeConfig::from_toml_str("max_dept = 3").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.toml");
        std::fs::write(&path, "max_depth = 8\n").unwrap();
        assert_eq!(MaterializeConfig::from_file(&path).unwrap().max_depth, 8);

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            MaterializeConfig::from_file(&missing),
            Err(ConfigError::IoError(_))
        ));
    }
}
