//! Compiled units: documents plus the metadata they are bound against.
//!
//! A [`Compilation`] is what a host front end hands to the engine. It
//! serializes to JSON as
//!
//! ```json
//! { "metadata": [ { "metadata_name": "..." } ],
//!   "documents": [ { "path": "Tests.cs", "tree": { ... }, "operations": [ ... ] } ] }
//! ```
//!
//! Documents without operations can be bound with
//! [`Compilation::bind_unbound_documents`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use testport_core::ContentHash;

use crate::bind::bind_document;
use crate::printer::{render, Rendered};
use crate::semantic::{MetadataTable, Operation, SymbolOracle, TypeHandle};
use crate::tree::{NodeId, SyntaxTree};

/// One source document: its tree and the operations bound to its nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DocumentRepr", into = "DocumentRepr")]
pub struct Document {
    pub path: String,
    pub tree: SyntaxTree,
    operations: Vec<Operation>,
    by_syntax: HashMap<NodeId, usize>,
}

#[derive(Serialize, Deserialize)]
struct DocumentRepr {
    path: String,
    tree: SyntaxTree,
    #[serde(default)]
    operations: Vec<Operation>,
}

impl From<DocumentRepr> for Document {
    fn from(repr: DocumentRepr) -> Self {
        Document::new(repr.path, repr.tree, repr.operations)
    }
}

impl From<Document> for DocumentRepr {
    fn from(document: Document) -> Self {
        DocumentRepr {
            path: document.path,
            tree: document.tree,
            operations: document.operations,
        }
    }
}

impl Document {
    pub fn new(path: impl Into<String>, tree: SyntaxTree, operations: Vec<Operation>) -> Self {
        let by_syntax = operations
            .iter()
            .enumerate()
            .map(|(i, op)| (op.syntax(), i))
            .collect();
        Document {
            path: path.into(),
            tree,
            operations,
            by_syntax,
        }
    }

    /// Bind `tree` against `metadata` and build the document.
    pub fn bound(path: impl Into<String>, tree: SyntaxTree, metadata: &MetadataTable) -> Self {
        let operations = bind_document(metadata, &tree);
        Document::new(path, tree, operations)
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Operation bound to `node`, if any.
    pub fn operation(&self, node: NodeId) -> Option<&Operation> {
        self.by_syntax.get(&node).map(|&i| &self.operations[i])
    }

    pub fn render(&self) -> Rendered {
        render(&self.tree)
    }

    pub fn text(&self) -> String {
        self.render().text
    }

    pub fn content_hash(&self) -> ContentHash {
        ContentHash::compute(self.text().as_bytes())
    }
}

/// A compiled unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Compilation {
    pub metadata: MetadataTable,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl Compilation {
    pub fn new(metadata: MetadataTable) -> Self {
        Compilation {
            metadata,
            documents: Vec::new(),
        }
    }

    pub fn document(&self, path: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.path == path)
    }

    /// Add a document, binding it against this unit's metadata.
    pub fn add_source(&mut self, path: impl Into<String>, tree: SyntaxTree) -> &Document {
        let document = Document::bound(path, tree, &self.metadata);
        self.upsert(document)
    }

    /// Insert a document, replacing one with the same path.
    pub fn upsert(&mut self, document: Document) -> &Document {
        let index = match self.documents.iter().position(|d| d.path == document.path) {
            Some(index) => {
                self.documents[index] = document;
                index
            }
            None => {
                self.documents.push(document);
                self.documents.len() - 1
            }
        };
        &self.documents[index]
    }

    /// Bind every document that carries no operations. Returns how many
    /// documents were bound.
    pub fn bind_unbound_documents(&mut self) -> usize {
        let mut bound = 0;
        for document in &mut self.documents {
            if document.operations.is_empty() {
                let operations = bind_document(&self.metadata, &document.tree);
                *document = Document::new(document.path.clone(), document.tree.clone(), operations);
                bound += 1;
            }
        }
        bound
    }
}

impl SymbolOracle for Compilation {
    fn resolve(&self, metadata_name: &str) -> Option<TypeHandle> {
        self.metadata.resolve(metadata_name)
    }

    fn metadata_name(&self, ty: TypeHandle) -> Option<&str> {
        self.metadata.metadata_name(ty)
    }

    fn base_type(&self, ty: TypeHandle) -> Option<TypeHandle> {
        self.metadata.base_type(ty)
    }

    fn all_interfaces(&self, ty: TypeHandle) -> Vec<TypeHandle> {
        self.metadata.all_interfaces(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::SyntaxGenerator;
    use crate::semantic::TypeDefinition;

    fn unit() -> Compilation {
        let metadata = MetadataTable::try_from(vec![
            TypeDefinition::class("Sample.Helper"),
        ])
        .unwrap();
        let mut compilation = Compilation::new(metadata);

        let mut g = SyntaxGenerator::default();
        let using = g.using_directive("Sample");
        let receiver = g.identifier_name("Helper");
        let name = g.identifier_name("Run");
        let access = g.member_access(receiver, name);
        let call = g.invocation(access, vec![]);
        let statement = g.expression_statement(call);
        let unit = g.compilation_unit(vec![using, statement]);
        compilation.add_source("A.cs", SyntaxTree::new(unit).unwrap());
        compilation
    }

    #[test]
    fn add_source_binds_operations() {
        let compilation = unit();
        let document = compilation.document("A.cs").unwrap();
        assert_eq!(document.operations().len(), 1);
        let op = &document.operations()[0];
        assert!(document.operation(op.syntax()).is_some());
    }

    #[test]
    fn json_roundtrip_keeps_operation_index() {
        let compilation = unit();
        let json = serde_json::to_string(&compilation).unwrap();
        let back: Compilation = serde_json::from_str(&json).unwrap();
        let document = back.document("A.cs").unwrap();
        let syntax = document.operations()[0].syntax();
        assert!(document.operation(syntax).is_some());
        assert_eq!(back, compilation);
    }

    #[test]
    fn bind_unbound_documents_only_touches_empty_ones() {
        let mut compilation = unit();
        let tree = compilation.documents[0].tree.clone();
        compilation.upsert(Document::new("B.cs", tree, vec![]));
        assert_eq!(compilation.bind_unbound_documents(), 1);
        assert_eq!(compilation.document("B.cs").unwrap().operations().len(), 1);
        assert_eq!(compilation.bind_unbound_documents(), 0);
    }

    #[test]
    fn content_hash_tracks_text() {
        let compilation = unit();
        let document = compilation.document("A.cs").unwrap();
        assert_eq!(document.text(), "using Sample;\nHelper.Run();\n");
        assert_eq!(
            document.content_hash(),
            ContentHash::compute(b"using Sample;\nHelper.Run();\n")
        );
    }
}
