//! One edit session per document.
//!
//! An [`EditSession`] owns the document editor that every rewrite of the
//! document registers its edits with, plus the rendering the findings were
//! located against. Fix-all opens one session per document, so edits from
//! many findings land in a single rebuild.

use testport_syntax::bind::Scope;
use testport_syntax::{
    Document, DocumentEditor, EditedTree, Node, NodeId, Rendered, SyntaxGenerator, SyntaxTree,
};

use crate::report::Finding;
use crate::rewrite::RewriteError;

pub struct EditSession<'d> {
    document: &'d Document,
    rendered: Rendered,
    editor: DocumentEditor,
}

impl<'d> EditSession<'d> {
    pub fn new(document: &'d Document) -> Self {
        EditSession {
            document,
            rendered: document.render(),
            editor: DocumentEditor::new(document.tree.clone()),
        }
    }

    pub fn document(&self) -> &'d Document {
        self.document
    }

    /// The tree before any edit of this session.
    pub fn tree(&self) -> &SyntaxTree {
        self.editor.original()
    }

    pub fn editor(&mut self) -> &mut DocumentEditor {
        &mut self.editor
    }

    pub fn generator(&mut self) -> &mut SyntaxGenerator {
        self.editor.generator()
    }

    /// Using directives and namespaces in effect at `node`.
    pub fn scope(&self, node: NodeId) -> Scope {
        Scope::at(self.tree(), node)
    }

    /// The node `finding` was reported on, checked against the document as
    /// it is now.
    ///
    /// A finding is stale when it belongs to another document, or its node
    /// is gone, changed shape or moved since the finding was reported.
    pub fn resolve(&self, finding: &Finding) -> Result<&Node, RewriteError> {
        let stale = |reason: &str| RewriteError::StaleFinding {
            rule: finding.rule,
            node: finding.node(),
            reason: reason.to_string(),
        };
        if finding.document != self.document.path {
            return Err(stale("finding belongs to another document"));
        }
        let node = self
            .tree()
            .find(finding.node())
            .ok_or_else(|| stale("node no longer exists"))?;
        if node.syntax_kind() != finding.construct().node_kind() {
            return Err(stale("node changed kind"));
        }
        if let Some(span) = finding.span() {
            if self.rendered.span(node.id) != Some(span) {
                return Err(stale("node moved"));
            }
        }
        Ok(node)
    }

    /// Apply every registered edit.
    pub fn finish(self) -> Result<EditedTree, RewriteError> {
        Ok(self.editor.finish()?)
    }
}
