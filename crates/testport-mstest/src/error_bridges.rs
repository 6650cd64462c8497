//! `impl From<X> for PortError` conversions for the migration engine's errors.

use testport_core::PortError;

use crate::rewrite::RewriteError;
use crate::rules::UnknownRuleId;

// ============================================================================
// Bridge: RewriteError -> PortError
// ============================================================================

impl From<RewriteError> for PortError {
    fn from(err: RewriteError) -> Self {
        match err {
            RewriteError::DocumentNotFound { path } => PortError::InvalidInput {
                message: format!("finding refers to unknown document {}", path),
                file: Some(path),
            },
            RewriteError::StaleFinding { .. } => PortError::Rewrite {
                message: err.to_string(),
                file: None,
            },
            RewriteError::Invariant { .. } => PortError::internal(err.to_string()),
            RewriteError::Editor(inner) => PortError::from(inner),
        }
    }
}

// ============================================================================
// Bridge: UnknownRuleId -> PortError
// ============================================================================

impl From<UnknownRuleId> for PortError {
    fn from(err: UnknownRuleId) -> Self {
        PortError::invalid_args_with_details(
            err.to_string(),
            serde_json::json!({ "rule": err.0 }),
        )
    }
}
