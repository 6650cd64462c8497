//! Fix-all: every selected finding of a document, applied in one pass.

use std::collections::HashSet;

use testport_core::diff::unified_diff;
use testport_core::output::{DocumentFixResult, SkippedFinding};
use testport_core::ContentHash;
use testport_syntax::{Compilation, Document, MetadataTable, NodeId};
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::options::MigrationOptions;
use crate::report::{report_compilation, Finding};
use crate::rewrite::{RewriteError, RewriteOutcome, RewriteResult, Rewriter};
use crate::session::EditSession;

/// Result of fixing one document.
#[derive(Debug, Clone)]
pub struct DocumentFix {
    /// The document after the edits, bound again.
    pub document: Document,
    pub applied: Vec<Finding>,
    /// Findings left open, with the reason.
    pub skipped: Vec<(Finding, String)>,
    original_text: String,
}

impl DocumentFix {
    pub fn path(&self) -> &str {
        &self.document.path
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn changed(&self) -> bool {
        self.document.text() != self.original_text
    }

    /// Output form. Dry runs carry a diff instead of the new text.
    pub fn to_result(&self, dry_run: bool) -> DocumentFixResult {
        let text = self.document.text();
        DocumentFixResult {
            path: self.path().to_string(),
            hash_before: ContentHash::compute(self.original_text.as_bytes()),
            hash_after: ContentHash::compute(text.as_bytes()),
            applied: self.applied.iter().map(Finding::to_info).collect(),
            skipped: self
                .skipped
                .iter()
                .map(|(finding, reason)| SkippedFinding {
                    finding: finding.to_info(),
                    reason: reason.clone(),
                })
                .collect(),
            diff: dry_run.then(|| unified_diff(self.path(), &self.original_text, &text)),
            text: (!dry_run).then_some(text),
        }
    }
}

/// Rewrite `findings` of `document` through a single edit session.
///
/// Findings of rules not selected by the options are skipped. A rewrite that
/// cannot apply, or whose edit conflicts with one registered earlier, leaves
/// its finding open; only a broken invariant aborts the document.
pub fn fix_document(
    rewriter: &Rewriter<'_, '_>,
    metadata: &MetadataTable,
    document: &Document,
    findings: &[Finding],
    options: &MigrationOptions,
) -> RewriteResult<DocumentFix> {
    let mut session = EditSession::new(document);
    let mut registered: Vec<(Finding, NodeId)> = Vec::new();
    let mut skipped = Vec::new();

    for finding in findings {
        if !finding.rule.has_fix() {
            skipped.push((finding.clone(), "no fix available".to_string()));
            continue;
        }
        if !options.is_selected_for_fix(finding.rule) {
            skipped.push((finding.clone(), "rule not selected".to_string()));
            continue;
        }
        match rewriter.rewrite(finding, &mut session) {
            Ok(RewriteOutcome::Applied { edited, .. }) => registered.push((finding.clone(), edited)),
            Ok(RewriteOutcome::NoEdit(reason)) => skipped.push((finding.clone(), reason.to_string())),
            Err(error @ (RewriteError::Editor(_) | RewriteError::StaleFinding { .. })) => {
                warn!(rule = %finding.rule, at = %finding.location, %error, "finding skipped");
                skipped.push((finding.clone(), error.to_string()));
            }
            Err(error) => return Err(error),
        }
    }

    let edited = session.finish()?;
    let unapplied: HashSet<NodeId> = edited.unapplied.iter().copied().collect();
    let mut applied = Vec::new();
    for (finding, edited_node) in registered {
        if unapplied.contains(&edited_node) {
            skipped.push((finding, "superseded by another edit".to_string()));
        } else {
            applied.push(finding);
        }
    }
    skipped.sort_by(|(a, _), (b, _)| a.output_order(b));

    let original_text = document.text();
    let document = Document::bound(document.path.clone(), edited.tree, metadata);
    info!(
        document = %document.path,
        applied = applied.len(),
        skipped = skipped.len(),
        "fixed document"
    );
    Ok(DocumentFix {
        document,
        applied,
        skipped,
        original_text,
    })
}

/// Report and fix every document of `compilation`.
pub fn fix_compilation(compilation: &Compilation, options: &MigrationOptions) -> RewriteResult<Vec<DocumentFix>> {
    let findings = report_compilation(compilation, options);
    let catalog = Catalog::new(compilation);
    let rewriter = Rewriter::new(&catalog, options);

    if let Some(orphan) = findings
        .iter()
        .find(|f| compilation.document(&f.document).is_none())
    {
        return Err(RewriteError::DocumentNotFound {
            path: orphan.document.clone(),
        });
    }

    let fixes = compilation
        .documents
        .iter()
        .map(|document| {
            let own: Vec<Finding> = findings
                .iter()
                .filter(|f| f.document == document.path)
                .cloned()
                .collect();
            fix_document(&rewriter, &compilation.metadata, document, &own, options)
        })
        .collect::<RewriteResult<Vec<_>>>()?;

    info!(
        documents = fixes.len(),
        changed = fixes.iter().filter(|f| f.changed()).count(),
        "fix-all complete"
    );
    Ok(fixes)
}

/// Replace the documents of `compilation` with their fixed versions.
pub fn apply_fixes(compilation: &mut Compilation, fixes: Vec<DocumentFix>) {
    for fix in fixes {
        compilation.upsert(fix.document);
    }
}
