//! Error types and error code constants for testport.
//!
//! `PortError` is the single error type rendered by the CLI. Domain crates
//! keep their own error enums (`SyntaxError`, `EditorError`, `RewriteError`)
//! and bridge into it with `From` impls.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: Resolution errors (file or document not found, malformed unit)
//! - `4`: Apply errors (a rewrite could not be applied)
//! - `10`: Internal errors (bugs, unexpected state)

use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad flag, unknown rule id, bad config).
    InvalidArguments = 2,
    /// Resolution errors (file not found, malformed compiled unit).
    ResolutionError = 3,
    /// Apply errors (rewrite failed, stale finding).
    ApplyError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum PortError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// The compiled unit handed to the engine is malformed.
    #[error("invalid input: {message}")]
    InvalidInput {
        message: String,
        file: Option<String>,
    },

    /// Configuration could not be loaded.
    #[error("config error: {message}")]
    Config {
        message: String,
        path: Option<String>,
    },

    /// A rewrite could not be applied.
    #[error("rewrite error: {message}")]
    Rewrite {
        message: String,
        file: Option<String>,
    },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl From<&PortError> for OutputErrorCode {
    fn from(err: &PortError) -> Self {
        match err {
            PortError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            PortError::Config { .. } => OutputErrorCode::InvalidArguments,
            PortError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            PortError::InvalidInput { .. } => OutputErrorCode::ResolutionError,
            PortError::Rewrite { .. } => OutputErrorCode::ApplyError,
            PortError::Internal { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<PortError> for OutputErrorCode {
    fn from(err: PortError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Bridge: ConfigError -> PortError
// ============================================================================

impl From<ConfigError> for PortError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Read { path, source } => {
                if source.kind() == std::io::ErrorKind::NotFound {
                    PortError::FileNotFound {
                        path: path.display().to_string(),
                    }
                } else {
                    PortError::Config {
                        message: format!("cannot read {}: {}", path.display(), source),
                        path: Some(path.display().to_string()),
                    }
                }
            }
            ConfigError::Parse { path, source } => PortError::Config {
                message: format!("cannot parse {}: {}", path.display(), source),
                path: Some(path.display().to_string()),
            },
            ConfigError::UnknownRule { id } => PortError::Config {
                message: format!("unknown rule id in [rules] disabled: {}", id),
                path: None,
            },
        }
    }
}

impl PortError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        PortError::InvalidArguments {
            message: message.into(),
            details: None,
        }
    }

    /// Create an invalid arguments error with JSON details.
    pub fn invalid_args_with_details(
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        PortError::InvalidArguments {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        PortError::FileNotFound { path: path.into() }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        PortError::InvalidInput {
            message: message.into(),
            file: None,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    mod error_code_mapping {
        use super::*;

        #[test]
        fn invalid_arguments_maps_to_invalid_arguments() {
            let err = PortError::invalid_args("unknown rule MSX999");
            assert_eq!(
                OutputErrorCode::from(&err),
                OutputErrorCode::InvalidArguments
            );
            assert_eq!(err.error_code().code(), 2);
        }

        #[test]
        fn file_not_found_maps_to_resolution_error() {
            let err = PortError::file_not_found("unit.json");
            assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);
        }

        #[test]
        fn invalid_input_maps_to_resolution_error() {
            let err = PortError::invalid_input("duplicate node id 4");
            assert_eq!(err.error_code().code(), 3);
        }

        #[test]
        fn rewrite_maps_to_apply_error() {
            let err = PortError::Rewrite {
                message: "stale finding".to_string(),
                file: Some("Tests.cs".to_string()),
            };
            assert_eq!(err.error_code().code(), 4);
        }

        #[test]
        fn internal_maps_to_internal_error() {
            let err = PortError::internal("unexpected state");
            assert_eq!(err.error_code().code(), 10);
        }
    }

    mod config_bridge {
        use super::*;

        #[test]
        fn missing_config_file_is_file_not_found() {
            let err: PortError = ConfigError::Read {
                path: PathBuf::from("testport.toml"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }
            .into();
            assert!(matches!(err, PortError::FileNotFound { .. }));
        }

        #[test]
        fn unknown_rule_is_config_error() {
            let err: PortError = ConfigError::UnknownRule {
                id: "MSX999".to_string(),
            }
            .into();
            assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
            assert!(err.to_string().contains("MSX999"));
        }
    }

    mod error_display {
        use super::*;

        #[test]
        fn invalid_arguments_display() {
            let err = PortError::invalid_args("missing field");
            assert_eq!(err.to_string(), "invalid arguments: missing field");
        }

        #[test]
        fn file_not_found_display() {
            let err = PortError::file_not_found("unit.json");
            assert_eq!(err.to_string(), "file not found: unit.json");
        }
    }

    #[test]
    fn display_shows_code() {
        assert_eq!(format!("{}", OutputErrorCode::ApplyError), "4");
        assert_eq!(format!("{}", OutputErrorCode::InternalError), "10");
    }
}
