//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default depth up to which nodes start expanded.
pub const DEFAULT_EXPANSION_DEPTH: usize = 1;

/// Default cap on history label length, in chars.
pub const DEFAULT_HISTORY_LABEL_MAX_LEN: usize = 80;

/// Settings that shape a [`Workspace`](crate::Workspace) and its documents.
///
/// Every field is optional in TOML; missing fields take their defaults.
///
/// ```
/// use json_nav::EditorConfig;
///
/// let config = EditorConfig::from_toml_str("default_expansion_depth = 3").unwrap();
/// assert_eq!(config.default_expansion_depth, 3);
/// assert!(config.pretty);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Nodes at depth `<=` this are expanded unless overridden.
    pub default_expansion_depth: usize,
    /// Pretty-print serialized documents.
    pub pretty: bool,
    /// Longer commit labels are cut to this many chars.
    pub history_label_max_len: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_expansion_depth: DEFAULT_EXPANSION_DEPTH,
            pretty: true,
            history_label_max_len: DEFAULT_HISTORY_LABEL_MAX_LEN,
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML config file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(EditorConfig::from_toml_str("").unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_full_config() {
        let config = EditorConfig::from_toml_str(
            "default_expansion_depth = 0\npretty = false\nhistory_label_max_len = 12\n",
        )
        .unwrap();
        assert_eq!(
            config,
            EditorConfig {
                default_expansion_depth: 0,
                pretty: false,
                history_label_max_len: 12,
            }
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = EditorConfig::from_toml_str("theme = \"dark\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("json-nav.toml");
        std::fs::write(&file, "pretty = false").unwrap();
        let config = EditorConfig::load(&file).unwrap();
        assert!(!config.pretty);
        assert!(matches!(
            EditorConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
