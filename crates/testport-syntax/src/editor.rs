//! Tree-diffing document editor.
//!
//! [`DocumentEditor`] collects edits keyed by the id of the node they target
//! and applies all of them in one rebuilding pass over the original tree.
//! Because edits never refer to byte offsets, one replacement cannot
//! invalidate the target of another edit.
//!
//! # Edit Primitives
//!
//! | Primitive | Effect |
//! |-----------|--------|
//! | `replace_node(id, node)` | The node is replaced by `node`; the walk continues into the replacement, so edits on carried-over children still apply |
//! | `remove_node(id)` | The node is dropped from its parent's list; attribute lists emptied this way are dropped too |
//! | `add_base_type(id, node)` | `node` is appended to the base list of a type declaration |
//!
//! # Example
//!
//! ```
//! use testport_syntax::editor::DocumentEditor;
//! use testport_syntax::factory::SyntaxGenerator;
//! use testport_syntax::printer::render;
//! use testport_syntax::tree::SyntaxTree;
//!
//! let mut g = SyntaxGenerator::default();
//! let name = g.identifier_name("TestMethod");
//! let attribute = g.attribute(name, None);
//! let attribute_id = attribute.id;
//! let list = g.attribute_list(vec![attribute]);
//! let class = g.class_declaration("Test", vec![list], vec![]);
//! let tree = SyntaxTree::new(g.compilation_unit(vec![class])).unwrap();
//!
//! let mut editor = DocumentEditor::new(tree);
//! let fact = editor.generator().identifier_name("Fact");
//! let fact = editor.generator().attribute(fact, None);
//! editor.replace_node(attribute_id, fact).unwrap();
//!
//! let edited = editor.finish().unwrap();
//! assert_eq!(render(&edited.tree).text, "[Fact]\nclass Test\n{\n}\n");
//! ```

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;
use tracing::debug;

use crate::factory::SyntaxGenerator;
use crate::tree::{ChildMapper, Node, NodeId, NodeKind, Slot, SyntaxError, SyntaxKind, SyntaxTree};

/// Error type for document edits.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("node {0} not found in the document")]
    NodeNotFound(NodeId),

    #[error("node {0} is not a list element and cannot be removed")]
    NotRemovable(NodeId),

    #[error("node {id} is a {found}, expected a type declaration")]
    NotATypeDeclaration { id: NodeId, found: SyntaxKind },

    #[error("conflicting edits for node {0}")]
    Conflict(NodeId),

    #[error("edited tree is malformed: {0}")]
    Syntax(#[from] SyntaxError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Change {
    Replace(Node),
    Remove,
}

/// Collects node edits over one document and applies them together.
#[derive(Debug, Clone)]
pub struct DocumentEditor {
    original: SyntaxTree,
    generator: SyntaxGenerator,
    changes: BTreeMap<NodeId, Change>,
    base_types: BTreeMap<NodeId, Vec<Node>>,
}

/// Result of [`DocumentEditor::finish`].
#[derive(Debug, Clone)]
pub struct EditedTree {
    pub tree: SyntaxTree,
    /// Targets whose edits never applied (their node vanished from the
    /// rebuilt tree, e.g. inside a removed subtree).
    pub unapplied: Vec<NodeId>,
}

impl DocumentEditor {
    pub fn new(original: SyntaxTree) -> Self {
        let generator = SyntaxGenerator::starting_at(original.next_id());
        DocumentEditor {
            original,
            generator,
            changes: BTreeMap::new(),
            base_types: BTreeMap::new(),
        }
    }

    /// The tree as it was before any edit.
    pub fn original(&self) -> &SyntaxTree {
        &self.original
    }

    /// Generator for synthesized nodes; its ids never collide with the
    /// original tree.
    pub fn generator(&mut self) -> &mut SyntaxGenerator {
        &mut self.generator
    }

    /// Number of registered edits.
    pub fn edit_count(&self) -> usize {
        self.changes.len() + self.base_types.values().map(Vec::len).sum::<usize>()
    }

    pub fn has_edit(&self, id: NodeId) -> bool {
        self.changes.contains_key(&id) || self.base_types.contains_key(&id)
    }

    pub fn replace_node(&mut self, id: NodeId, replacement: Node) -> Result<(), EditorError> {
        if !self.original.contains(id) {
            return Err(EditorError::NodeNotFound(id));
        }
        if self.changes.contains_key(&id) {
            return Err(EditorError::Conflict(id));
        }
        self.changes.insert(id, Change::Replace(replacement));
        Ok(())
    }

    /// Remove a list element. Removing the same node twice is a no-op.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), EditorError> {
        if !self.original.contains(id) {
            return Err(EditorError::NodeNotFound(id));
        }
        if self.original.slot(id) != Some(Slot::List) {
            return Err(EditorError::NotRemovable(id));
        }
        match self.changes.get(&id) {
            None => {
                self.changes.insert(id, Change::Remove);
                Ok(())
            }
            Some(Change::Remove) => Ok(()),
            Some(Change::Replace(_)) => Err(EditorError::Conflict(id)),
        }
    }

    pub fn add_base_type(&mut self, id: NodeId, base_type: Node) -> Result<(), EditorError> {
        let node = self
            .original
            .find(id)
            .ok_or(EditorError::NodeNotFound(id))?;
        if !matches!(node.kind, NodeKind::TypeDeclaration { .. }) {
            return Err(EditorError::NotATypeDeclaration {
                id,
                found: node.syntax_kind(),
            });
        }
        self.base_types.entry(id).or_default().push(base_type);
        Ok(())
    }

    /// Apply every edit in one rebuilding pass.
    pub fn finish(self) -> Result<EditedTree, EditorError> {
        let DocumentEditor {
            original,
            changes,
            mut base_types,
            ..
        } = self;
        let root_id = original.root().id;
        let mut rebuilder = Rebuilder {
            changes: &changes,
            base_types: &mut base_types,
            applied: HashSet::new(),
        };
        let root = rebuilder
            .rebuild(original.into_root())?
            .ok_or(EditorError::NotRemovable(root_id))?;
        let applied = rebuilder.applied;

        let mut unapplied: Vec<NodeId> = changes
            .keys()
            .filter(|id| !applied.contains(id))
            .copied()
            .collect();
        unapplied.extend(base_types.keys().copied());
        unapplied.sort();
        unapplied.dedup();

        debug!(
            edits = changes.len(),
            unapplied = unapplied.len(),
            "applied document edits"
        );

        Ok(EditedTree {
            tree: SyntaxTree::new(root)?,
            unapplied,
        })
    }
}

struct Rebuilder<'e> {
    changes: &'e BTreeMap<NodeId, Change>,
    base_types: &'e mut BTreeMap<NodeId, Vec<Node>>,
    applied: HashSet<NodeId>,
}

impl Rebuilder<'_> {
    fn rebuild(&mut self, node: Node) -> Result<Option<Node>, EditorError> {
        let id = node.id;
        let changes = self.changes;
        if !self.applied.contains(&id) {
            if let Some(change) = changes.get(&id) {
                self.applied.insert(id);
                return match change {
                    Change::Remove => Ok(None),
                    Change::Replace(replacement) => self.rebuild(replacement.clone()),
                };
            }
        }

        let Node {
            id,
            leading,
            trailing,
            kind,
        } = node;
        let mut kind = kind.try_map_children(self)?;
        if let NodeKind::TypeDeclaration { base_types, .. } = &mut kind {
            if let Some(extra) = self.base_types.remove(&id) {
                base_types.extend(extra);
            }
        }
        Ok(Some(Node {
            id,
            leading,
            trailing,
            kind,
        }))
    }
}

impl ChildMapper for Rebuilder<'_> {
    type Error = EditorError;

    fn map_list_item(&mut self, node: Node) -> Result<Option<Node>, EditorError> {
        let rebuilt = self.rebuild(node)?;
        Ok(rebuilt.filter(|n| {
            !matches!(&n.kind, NodeKind::AttributeList { attributes, .. } if attributes.is_empty())
        }))
    }

    fn map_single(&mut self, node: Node) -> Result<Node, EditorError> {
        let id = node.id;
        self.rebuild(node)?.ok_or(EditorError::NotRemovable(id))
    }
}
