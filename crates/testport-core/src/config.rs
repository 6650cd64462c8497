//! Configuration handling for testport (`testport.toml`).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "testport.toml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown rule id: {id}")]
    UnknownRule { id: String },
}

/// testport configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Rule selection
    #[serde(default)]
    pub rules: RulesConfig,

    /// Rewrite behavior
    #[serde(default)]
    pub rewrite: RewriteConfig,
}

/// `[rules]` table
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RulesConfig {
    /// Rule ids that are never reported nor fixed
    #[serde(default)]
    pub disabled: Vec<String>,
}

/// `[rewrite]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewriteConfig {
    /// Render synthesized type names in their shortest unambiguous form
    #[serde(default = "default_simplify_type_names")]
    pub simplify_type_names: bool,
}

fn default_simplify_type_names() -> bool {
    true
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            simplify_type_names: default_simplify_type_names(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load `testport.toml` from `dir`, or defaults when it does not exist
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            debug!(path = %config_path.display(), "loading config");
            Self::load(&config_path)
        } else {
            debug!(dir = %dir.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }

    /// Reject disabled rule ids that `is_known` does not recognize
    pub fn check_rule_ids(&self, is_known: impl Fn(&str) -> bool) -> Result<(), ConfigError> {
        match self.rules.disabled.iter().find(|id| !is_known(id)) {
            Some(id) => Err(ConfigError::UnknownRule { id: id.clone() }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_every_rule_and_simplification() {
        let config = Config::default();
        assert!(config.rules.disabled.is_empty());
        assert!(config.rewrite.simplify_type_names);
    }

    #[test]
    fn empty_file_uses_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn parse_full_config() {
        let config = Config::parse(
            r#"
[rules]
disabled = ["MSX000", "MSX209"]

[rewrite]
simplify_type_names = false
"#,
        )
        .unwrap();
        assert_eq!(config.rules.disabled, vec!["MSX000", "MSX209"]);
        assert!(!config.rewrite.simplify_type_names);
    }

    #[test]
    fn partial_rewrite_table_keeps_default() {
        let config = Config::parse("[rewrite]\n").unwrap();
        assert!(config.rewrite.simplify_type_names);
    }

    #[test]
    fn load_from_dir_without_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_from_dir(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn load_from_dir_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[rules]\ndisabled = [\"MSX100\"]\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.rules.disabled, vec!["MSX100"]);
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[rules\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("testport.toml"));
    }

    #[test]
    fn check_rule_ids_rejects_unknown() {
        let config = Config::parse("[rules]\ndisabled = [\"MSX100\", \"NOPE\"]\n").unwrap();
        let err = config.check_rule_ids(|id| id.starts_with("MSX")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRule { ref id } if id == "NOPE"));
    }
}
