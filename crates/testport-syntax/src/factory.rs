//! Builders for synthesized syntax.
//!
//! `SyntaxGenerator` hands out fresh [`NodeId`]s so that synthesized nodes
//! never collide with ids of the tree they are inserted into. Seed it with
//! [`SyntaxTree::next_id`](crate::tree::SyntaxTree::next_id).

use crate::tree::{ArgumentName, BlockLayout, Node, NodeId, NodeKind, Trivia, TypeKeyword};

#[derive(Debug, Clone)]
pub struct SyntaxGenerator {
    next_id: u32,
}

impl Default for SyntaxGenerator {
    fn default() -> Self {
        SyntaxGenerator { next_id: 1 }
    }
}

impl SyntaxGenerator {
    pub fn starting_at(next_id: NodeId) -> Self {
        SyntaxGenerator {
            next_id: next_id.0.max(1),
        }
    }

    /// Allocate a fresh id.
    pub fn fresh_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Id the next allocation will return.
    pub fn peek_id(&self) -> NodeId {
        NodeId(self.next_id)
    }

    pub fn node(&mut self, kind: NodeKind) -> Node {
        Node::new(self.fresh_id(), kind)
    }

    // ------------------------------------------------------------------
    // Names
    // ------------------------------------------------------------------

    pub fn identifier_name(&mut self, identifier: impl Into<String>) -> Node {
        self.node(NodeKind::IdentifierName {
            identifier: identifier.into(),
        })
    }

    pub fn generic_name(&mut self, identifier: impl Into<String>, type_arguments: Vec<Node>) -> Node {
        self.node(NodeKind::GenericName {
            identifier: identifier.into(),
            type_arguments,
        })
    }

    /// `A.B.C` as a left-nested chain of qualified names.
    pub fn qualified_name(&mut self, dotted: &str) -> Node {
        let mut segments = dotted.split('.');
        let first = segments.next().unwrap_or_default();
        let mut name = self.identifier_name(first);
        for segment in segments {
            let right = self.identifier_name(segment);
            name = self.node(NodeKind::QualifiedName {
                left: Box::new(name),
                right: Box::new(right),
            });
        }
        name
    }

    pub fn opaque(&mut self, text: impl Into<String>) -> Node {
        self.node(NodeKind::Opaque { text: text.into() })
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    pub fn member_access(&mut self, expression: Node, name: Node) -> Node {
        self.node(NodeKind::MemberAccess {
            expression: Box::new(expression),
            name: Box::new(name),
        })
    }

    pub fn invocation(&mut self, expression: Node, arguments: Vec<Node>) -> Node {
        self.node(NodeKind::Invocation {
            expression: Box::new(expression),
            arguments,
        })
    }

    pub fn argument(&mut self, expression: Node) -> Node {
        self.node(NodeKind::Argument {
            name: None,
            expression: Box::new(expression),
        })
    }

    pub fn named_argument(&mut self, name: impl Into<String>, expression: Node) -> Node {
        self.node(NodeKind::Argument {
            name: Some(name.into()),
            expression: Box::new(expression),
        })
    }

    pub fn object_creation(&mut self, type_name: Node, arguments: Vec<Node>) -> Node {
        self.node(NodeKind::ObjectCreation {
            type_name: Box::new(type_name),
            arguments,
        })
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    pub fn expression_statement(&mut self, expression: Node) -> Node {
        self.node(NodeKind::ExpressionStatement {
            expression: Box::new(expression),
        })
    }

    pub fn throw_statement(&mut self, expression: Option<Node>) -> Node {
        self.node(NodeKind::ThrowStatement {
            expression: expression.map(Box::new),
        })
    }

    pub fn block(&mut self, statements: Vec<Node>, layout: BlockLayout) -> Node {
        self.node(NodeKind::Block { statements, layout })
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    pub fn attribute(&mut self, name: Node, arguments: Option<Vec<Node>>) -> Node {
        self.node(NodeKind::Attribute {
            name: Box::new(name),
            arguments,
        })
    }

    pub fn attribute_argument(&mut self, name: Option<ArgumentName>, expression: Node) -> Node {
        self.node(NodeKind::AttributeArgument {
            name,
            expression: Box::new(expression),
        })
    }

    pub fn attribute_list(&mut self, attributes: Vec<Node>) -> Node {
        self.node(NodeKind::AttributeList {
            target: None,
            attributes,
        })
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    pub fn using_directive(&mut self, namespace: &str) -> Node {
        let name = self.qualified_name(namespace);
        self.node(NodeKind::UsingDirective {
            alias: None,
            name: Box::new(name),
        })
    }

    pub fn using_alias(&mut self, alias: impl Into<String>, target: &str) -> Node {
        let name = self.qualified_name(target);
        self.node(NodeKind::UsingDirective {
            alias: Some(alias.into()),
            name: Box::new(name),
        })
    }

    pub fn namespace(&mut self, name: &str, members: Vec<Node>) -> Node {
        let name = self.qualified_name(name);
        self.node(NodeKind::Namespace {
            name: Box::new(name),
            members,
        })
    }

    pub fn compilation_unit(&mut self, members: Vec<Node>) -> Node {
        self.node(NodeKind::CompilationUnit { members })
    }

    pub fn class_declaration(
        &mut self,
        identifier: impl Into<String>,
        attribute_lists: Vec<Node>,
        members: Vec<Node>,
    ) -> Node {
        self.node(NodeKind::TypeDeclaration {
            attribute_lists,
            modifiers: Vec::new(),
            keyword: TypeKeyword::Class,
            identifier: identifier.into(),
            base_types: Vec::new(),
            members,
        })
    }

    pub fn parameter(&mut self, type_name: Node, identifier: impl Into<String>) -> Node {
        self.node(NodeKind::Parameter {
            type_name: Box::new(type_name),
            identifier: identifier.into(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn method_declaration(
        &mut self,
        attribute_lists: Vec<Node>,
        modifiers: &[&str],
        return_type: Node,
        identifier: impl Into<String>,
        parameters: Vec<Node>,
        body: Option<Node>,
        expression_body: Option<Node>,
    ) -> Node {
        self.node(NodeKind::MethodDeclaration {
            attribute_lists,
            modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
            return_type: Box::new(return_type),
            identifier: identifier.into(),
            parameters,
            body: body.map(Box::new),
            expression_body: expression_body.map(Box::new),
        })
    }

    pub fn constructor_declaration(
        &mut self,
        attribute_lists: Vec<Node>,
        modifiers: &[&str],
        identifier: impl Into<String>,
        body: Node,
    ) -> Node {
        self.node(NodeKind::ConstructorDeclaration {
            attribute_lists,
            modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
            identifier: identifier.into(),
            parameters: Vec::new(),
            body: Box::new(body),
        })
    }
}

/// Builder-style trivia helpers.
pub trait WithTrivia: Sized {
    fn with_leading(self, trivia: Vec<Trivia>) -> Self;
    fn with_trailing(self, trivia: Vec<Trivia>) -> Self;
}

impl WithTrivia for Node {
    fn with_leading(mut self, trivia: Vec<Trivia>) -> Self {
        self.leading = trivia;
        self
    }

    fn with_trailing(mut self, trivia: Vec<Trivia>) -> Self {
        self.trailing = trivia;
        self
    }
}
