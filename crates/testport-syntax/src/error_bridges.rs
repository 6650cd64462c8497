//! `impl From<X> for PortError` conversions for the syntax model's errors.
//!
//! These live here rather than in `testport-core` because core does not
//! know the syntax types.

use testport_core::PortError;

use crate::editor::EditorError;
use crate::semantic::MetadataError;
use crate::tree::SyntaxError;

// ============================================================================
// Bridge: SyntaxError -> PortError
// ============================================================================

impl From<SyntaxError> for PortError {
    fn from(err: SyntaxError) -> Self {
        PortError::invalid_input(err.to_string())
    }
}

// ============================================================================
// Bridge: MetadataError -> PortError
// ============================================================================

impl From<MetadataError> for PortError {
    fn from(err: MetadataError) -> Self {
        PortError::invalid_input(format!("metadata: {}", err))
    }
}

// ============================================================================
// Bridge: EditorError -> PortError
// ============================================================================

impl From<EditorError> for PortError {
    fn from(err: EditorError) -> Self {
        match err {
            // a rebuilt tree that fails validation is a bug, not bad input
            EditorError::Syntax(inner) => {
                PortError::internal(format!("edited tree is malformed: {}", inner))
            }
            other => PortError::Rewrite {
                message: other.to_string(),
                file: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeId;
    use testport_core::OutputErrorCode;

    #[test]
    fn duplicate_ids_are_invalid_input() {
        let err: PortError = SyntaxError::DuplicateId(NodeId(7)).into();
        assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);
        assert!(err.to_string().contains("duplicate node id #7"));
    }

    #[test]
    fn duplicate_types_are_invalid_input() {
        let err: PortError = MetadataError::DuplicateType("Xunit.Assert".to_string()).into();
        assert_eq!(err.error_code().code(), 3);
        assert!(err.to_string().contains("Xunit.Assert"));
    }

    #[test]
    fn edit_conflicts_are_apply_errors() {
        let err: PortError = EditorError::Conflict(NodeId(3)).into();
        assert_eq!(err.error_code(), OutputErrorCode::ApplyError);
    }

    #[test]
    fn malformed_rebuilds_are_internal() {
        let err: PortError = EditorError::Syntax(SyntaxError::DuplicateId(NodeId(1))).into();
        assert_eq!(err.error_code(), OutputErrorCode::InternalError);
    }
}
