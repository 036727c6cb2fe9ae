//! Engine configuration.

use std::path::Path;

use crate::error::ConfigError;

/// How a grant decides that it collides with an existing access right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateCheck {
    /// Any existing right with the same subject and endpoint is a duplicate.
    #[default]
    Endpoint,
    /// Only the first right found for the subject is compared to the endpoint.
    FirstRight,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AclConfig {
    pub duplicate_check: DuplicateCheck,
    /// Let the name-or-description search term match global group descriptions.
    pub match_global_group_descriptions: bool,
}

impl Default for AclConfig {
    fn default() -> Self {
        AclConfig { duplicate_check: DuplicateCheck::Endpoint, match_global_group_descriptions: true }
    }
}

impl AclConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = AclConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AclConfig::default());

        let config = AclConfig::from_json_str(r#"{"duplicate_check":"first_right"}"#).unwrap();
        assert_eq!(config.duplicate_check, DuplicateCheck::FirstRight);
        assert!(config.match_global_group_descriptions);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"match_global_group_descriptions": false}}"#).unwrap();
        let config = AclConfig::from_json_file(file.path()).unwrap();
        assert!(!config.match_global_group_descriptions);
        assert_eq!(config.duplicate_check, DuplicateCheck::Endpoint);
    }

    #[test]
    fn test_bad_input_is_reported() {
        assert!(matches!(AclConfig::from_json_str("not json"), Err(ConfigError::Parse(_))));
        assert!(matches!(AclConfig::from_json_file("/nonexistent/acl.json"), Err(ConfigError::Io(_))));
    }
}
