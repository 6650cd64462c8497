//! Rewrites of single findings.
//!
//! [`Rewriter::rewrite`] registers the edits for one finding with an
//! [`EditSession`]. Nothing is written until the session finishes, so fix-all
//! can rewrite every finding of a document against the same original tree.
//!
//! A rewrite that cannot apply is not an error: it returns
//! [`RewriteOutcome::NoEdit`] with the reason and leaves the document
//! untouched. Errors are reserved for stale findings, conflicting edits and
//! broken invariants between the classifier and the rule table.

mod assert;
mod attribute;
mod lifecycle;

use std::fmt;

use testport_syntax::semantic::AttributeOperation;
use testport_syntax::{EditorError, Node, NodeId, NodeKind, Operation};
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::{Catalog, CatalogEntry};
use crate::classify::{AttributeKind, Construct};
use crate::options::MigrationOptions;
use crate::report::Finding;
use crate::rules::{attribute_entries, RuleId};
use crate::session::EditSession;

/// Error type for rewrites.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("document not found: {path}")]
    DocumentNotFound { path: String },

    #[error("stale {rule} finding on node {node}: {reason}")]
    StaleFinding {
        rule: RuleId,
        node: NodeId,
        reason: String,
    },

    #[error("{rule} finding on node {node}: {message}")]
    Invariant {
        rule: RuleId,
        node: NodeId,
        message: String,
    },

    #[error(transparent)]
    Editor(#[from] EditorError),
}

/// Result type for rewrite operations.
pub type RewriteResult<T> = Result<T, RewriteError>;

/// Why a finding was left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoEditReason {
    /// The rule reports the construct but has no rewrite for it.
    NoRewriteRegistered,
    /// The method has rewrites, none for this many arguments.
    UnsupportedArity { method: String, arguments: usize },
    /// Named arguments that cannot be put back in parameter order.
    NamedArgumentsOutOfPlace,
    /// A user-defined subtype of a framework attribute.
    NotExactType,
    /// The unit does not know the target type.
    TargetSymbolMissing(CatalogEntry),
    NotOnMethod,
    NotInType,
    /// The type already declares a parameterless constructor.
    ConstructorExists,
    /// The initializer takes parameters a constructor could not supply.
    ParameterizedInitializer,
    /// The type already implements `IDisposable` or declares `Dispose`.
    AlreadyDisposable,
    /// The type has more than one method with this lifecycle attribute.
    MultipleLifecycleMethods(AttributeKind),
}

impl fmt::Display for NoEditReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoEditReason::NoRewriteRegistered => f.write_str("no rewrite registered"),
            NoEditReason::UnsupportedArity { method, arguments } => {
                write!(f, "no rewrite for {method} with {arguments} argument(s)")
            }
            NoEditReason::NamedArgumentsOutOfPlace => {
                f.write_str("named arguments do not map onto parameter positions")
            }
            NoEditReason::NotExactType => f.write_str("attribute is a user-defined subtype"),
            NoEditReason::TargetSymbolMissing(entry) => {
                write!(f, "target type {entry} is not referenced by the unit")
            }
            NoEditReason::NotOnMethod => f.write_str("attribute is not applied to a method"),
            NoEditReason::NotInType => f.write_str("method is not declared in a type"),
            NoEditReason::ConstructorExists => {
                f.write_str("type already declares a parameterless constructor")
            }
            NoEditReason::ParameterizedInitializer => f.write_str("initializer method takes parameters"),
            NoEditReason::AlreadyDisposable => f.write_str("type is already disposable"),
            NoEditReason::MultipleLifecycleMethods(kind) => {
                write!(f, "type has more than one [{}] method", kind.as_str())
            }
        }
    }
}

/// What a rewrite did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// Edits were registered; `edited` is the node replaced or removed.
    Applied { rule: RuleId, edited: NodeId },
    NoEdit(NoEditReason),
}

impl RewriteOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RewriteOutcome::Applied { .. })
    }
}

/// Rewrites findings using one unit's catalog.
#[derive(Debug, Clone, Copy)]
pub struct Rewriter<'c, 'o> {
    catalog: &'c Catalog<'o>,
    options: &'c MigrationOptions,
}

impl<'c, 'o> Rewriter<'c, 'o> {
    pub fn new(catalog: &'c Catalog<'o>, options: &'c MigrationOptions) -> Self {
        Rewriter { catalog, options }
    }

    pub fn catalog(&self) -> &'c Catalog<'o> {
        self.catalog
    }

    pub fn simplify_type_names(&self) -> bool {
        self.options.simplify_type_names
    }

    /// Register the edits for `finding` with `session`.
    pub fn rewrite(&self, finding: &Finding, session: &mut EditSession<'_>) -> RewriteResult<RewriteOutcome> {
        let node = session.resolve(finding)?.clone();
        let outcome = match finding.construct() {
            Construct::ThrownAssertionException => RewriteOutcome::NoEdit(NoEditReason::NoRewriteRegistered),
            Construct::AssertionCall { family, method } => {
                assert::rewrite_assertion(self, finding, &node, *family, method, session)?
            }
            Construct::AttributeApplication { attribute } => {
                self.rewrite_attribute(finding, &node, *attribute, session)?
            }
        };
        match &outcome {
            RewriteOutcome::Applied { rule, edited } => {
                debug!(rule = %rule, construct = %finding.construct(), node = %edited, "rewrite registered");
            }
            RewriteOutcome::NoEdit(reason) => {
                debug!(rule = %finding.rule, construct = %finding.construct(), %reason, "no edit");
            }
        }
        Ok(outcome)
    }

    fn rewrite_attribute(
        &self,
        finding: &Finding,
        node: &Node,
        kind: AttributeKind,
        session: &mut EditSession<'_>,
    ) -> RewriteResult<RewriteOutcome> {
        if attribute_entries(kind).is_empty() {
            return Ok(RewriteOutcome::NoEdit(NoEditReason::NoRewriteRegistered));
        }
        let operation = self.attribute_operation(finding, session)?;
        // rewrites use exact identity; subtypes are only reported
        let Some(entry) = operation
            .attribute_type
            .and_then(|ty| {
                attribute_entries(kind)
                    .iter()
                    .copied()
                    .find(|entry| self.catalog.is(ty, *entry))
            })
        else {
            return Ok(RewriteOutcome::NoEdit(NoEditReason::NotExactType));
        };
        match kind {
            AttributeKind::TestInitialize => lifecycle::rewrite_initializer(self, finding, node, entry, session),
            AttributeKind::TestCleanup => lifecycle::rewrite_cleanup(self, finding, node, entry, session),
            _ => attribute::rewrite_attribute(self, finding, node, entry, &operation, session),
        }
    }

    fn attribute_operation(&self, finding: &Finding, session: &EditSession<'_>) -> RewriteResult<AttributeOperation> {
        match session.document().operation(finding.node()) {
            Some(Operation::Attribute(operation)) => Ok(operation.clone()),
            _ => {
                warn!(rule = %finding.rule, node = %finding.node(), "attribute finding without attribute operation");
                Err(invariant(finding, "no attribute operation bound to the node"))
            }
        }
    }
}

/// The classifier and the rule table disagree about `finding`.
fn invariant(finding: &Finding, message: impl Into<String>) -> RewriteError {
    RewriteError::Invariant {
        rule: finding.rule,
        node: finding.node(),
        message: message.into(),
    }
}

/// Clone of the expression under an argument or attribute argument node.
fn argument_expression(argument: &Node) -> Option<Node> {
    match &argument.kind {
        NodeKind::Argument { expression, .. }
        | NodeKind::AttributeArgument { expression, .. } => Some((**expression).clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_read_as_sentences() {
        assert_eq!(
            NoEditReason::TargetSymbolMissing(CatalogEntry::XunitAssert).to_string(),
            "target type Xunit.Assert is not referenced by the unit"
        );
        assert_eq!(
            NoEditReason::MultipleLifecycleMethods(AttributeKind::TestCleanup).to_string(),
            "type has more than one [TestCleanup] method"
        );
        assert_eq!(
            NoEditReason::UnsupportedArity {
                method: "IsInstanceOfType".to_string(),
                arguments: 3
            }
            .to_string(),
            "no rewrite for IsInstanceOfType with 3 argument(s)"
        );
        assert_eq!(
            NoEditReason::ParameterizedInitializer.to_string(),
            "initializer method takes parameters"
        );
    }
}
