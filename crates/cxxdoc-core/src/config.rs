//! Domain configuration (`cxxdoc.toml`)

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// What the registry does when a fullname is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// The later registration replaces the earlier one without a message.
    #[default]
    Overwrite,
    /// The later registration still wins, but the collision is logged and recorded.
    Warn,
}

/// Settings for the C++ domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DomainConfig {
    /// Registry behaviour on duplicate fullnames.
    #[serde(rename = "collision-policy")]
    pub collision_policy: CollisionPolicy,

    /// Append `()` to titles of function references that lack them.
    #[serde(rename = "add-function-parentheses")]
    pub add_function_parentheses: bool,

    /// Log unresolved references at warn level instead of debug.
    #[serde(rename = "warn-unresolved")]
    pub warn_unresolved: bool,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            collision_policy: CollisionPolicy::Overwrite,
            add_function_parentheses: true,
            warn_unresolved: false,
        }
    }
}

impl DomainConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = DomainConfig::from_toml_str("").unwrap();
        assert_eq!(config, DomainConfig::default());
        assert_eq!(config.collision_policy, CollisionPolicy::Overwrite);
        assert!(config.add_function_parentheses);
    }

    #[test]
    fn parse_all_fields() {
        let config = DomainConfig::from_toml_str(
            r#"
collision-policy = "warn"
add-function-parentheses = false
warn-unresolved = true
"#,
        )
        .unwrap();
        assert_eq!(config.collision_policy, CollisionPolicy::Warn);
        assert!(!config.add_function_parentheses);
        assert!(config.warn_unresolved);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = DomainConfig::from_toml_str("colision-policy = \"warn\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "collision-policy = \"warn\"").unwrap();
        let config = DomainConfig::load(file.path()).unwrap();
        assert_eq!(config.collision_policy, CollisionPolicy::Warn);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = DomainConfig::load(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
