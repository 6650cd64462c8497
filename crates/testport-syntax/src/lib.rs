//! Syntax and semantic model for testport.
//!
//! testport does not parse C#. A host front end hands over a compiled unit
//! as JSON: owned syntax trees with stable node ids, the bound operations
//! attached to those nodes and a metadata table that answers type identity
//! questions. This crate models that unit and provides the machinery the
//! migration engine edits it with.
//!
//! # Overview
//!
//! - **Trees**: [`Node`], [`NodeKind`] and [`SyntaxTree`] with an id index,
//!   parent chains and descendant iteration.
//! - **Synthesis**: [`SyntaxGenerator`] builds new nodes with fresh ids.
//! - **Printing**: [`render`] turns a tree into text plus byte spans.
//! - **Editing**: [`DocumentEditor`] collects id-keyed edits and applies
//!   them in one rebuild pass.
//! - **Semantics**: [`SymbolOracle`], [`MetadataTable`] and the bound
//!   [`Operation`]s; [`bind`] fills operations in for bare syntax.
//!
//! # Quick Start
//!
//! ```
//! use testport_syntax::{render, SyntaxGenerator, SyntaxTree};
//!
//! let mut g = SyntaxGenerator::default();
//! let receiver = g.identifier_name("Assert");
//! let name = g.identifier_name("True");
//! let access = g.member_access(receiver, name);
//! let value = g.opaque("false");
//! let argument = g.argument(value);
//! let call = g.invocation(access, vec![argument]);
//! let statement = g.expression_statement(call);
//! let unit = g.compilation_unit(vec![statement]);
//!
//! let tree = SyntaxTree::new(unit).unwrap();
//! assert_eq!(render(&tree).text, "Assert.True(false);\n");
//! ```

pub mod bind;
pub mod compilation;
pub mod editor;
mod error_bridges;
pub mod factory;
pub mod printer;
pub mod semantic;
pub mod simplify;
pub mod tree;
pub mod visit;

pub use compilation::{Compilation, Document};
pub use editor::{DocumentEditor, EditedTree, EditorError};
pub use factory::{SyntaxGenerator, WithTrivia};
pub use printer::{render, render_node, Rendered};
pub use semantic::{
    MetadataError, MetadataTable, Operation, SymbolOracle, TypeDefinition, TypeHandle,
    ValueOperation,
};
pub use tree::{Node, NodeId, NodeKind, SyntaxError, SyntaxKind, SyntaxTree, Trivia};
pub use visit::{walk, VisitResult, Visitor};
