//! Owned syntax tree with stable node ids.
//!
//! The tree models the subset of C# the migration engine reads and writes:
//! using directives, namespaces, type and member declarations, attributes,
//! blocks and a handful of statement and expression forms. Everything else
//! is carried as `Opaque` text and printed verbatim.
//!
//! Every node carries a [`NodeId`] that is unique within its tree. Ids
//! survive edits: the document editor keys its edits by id, and nodes carried
//! over into a replacement keep their original ids.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identity of a node inside one [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors raised when assembling a tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("duplicate node id {0}")]
    DuplicateId(NodeId),
}

/// Whitespace, line breaks and comments attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Trivia {
    Whitespace(String),
    EndOfLine,
    /// Comment text including its delimiters (`// ...` or `/* ... */`).
    Comment(String),
}

/// Declaration keyword of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKeyword {
    Class,
    Struct,
    Record,
    Interface,
}

impl TypeKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKeyword::Class => "class",
            TypeKeyword::Struct => "struct",
            TypeKeyword::Record => "record",
            TypeKeyword::Interface => "interface",
        }
    }
}

/// How a block is laid out when printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockLayout {
    /// `{ a; b; }` on the declaration line.
    #[default]
    Inline,
    /// Braces on their own lines, one statement per line.
    Indented,
}

/// Name of a named attribute argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentName {
    /// `Name = value`: assigns a property or field of the attribute.
    Equals(String),
    /// `name: value`: binds a constructor parameter by name.
    Colon(String),
}

/// A syntax node: identity, trivia and shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading: Vec<Trivia>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing: Vec<Trivia>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// Shape of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    CompilationUnit {
        members: Vec<Node>,
    },
    UsingDirective {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alias: Option<String>,
        name: Box<Node>,
    },
    Namespace {
        name: Box<Node>,
        members: Vec<Node>,
    },
    TypeDeclaration {
        #[serde(default)]
        attribute_lists: Vec<Node>,
        #[serde(default)]
        modifiers: Vec<String>,
        keyword: TypeKeyword,
        identifier: String,
        #[serde(default)]
        base_types: Vec<Node>,
        #[serde(default)]
        members: Vec<Node>,
    },
    MethodDeclaration {
        #[serde(default)]
        attribute_lists: Vec<Node>,
        #[serde(default)]
        modifiers: Vec<String>,
        return_type: Box<Node>,
        identifier: String,
        #[serde(default)]
        parameters: Vec<Node>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<Box<Node>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expression_body: Option<Box<Node>>,
    },
    ConstructorDeclaration {
        #[serde(default)]
        attribute_lists: Vec<Node>,
        #[serde(default)]
        modifiers: Vec<String>,
        identifier: String,
        #[serde(default)]
        parameters: Vec<Node>,
        body: Box<Node>,
    },
    Parameter {
        type_name: Box<Node>,
        identifier: String,
    },
    AttributeList {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
        attributes: Vec<Node>,
    },
    Attribute {
        name: Box<Node>,
        /// `None` when the attribute has no parentheses at all.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        arguments: Option<Vec<Node>>,
    },
    AttributeArgument {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<ArgumentName>,
        expression: Box<Node>,
    },
    Block {
        statements: Vec<Node>,
        #[serde(default)]
        layout: BlockLayout,
    },
    ExpressionStatement {
        expression: Box<Node>,
    },
    ThrowStatement {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expression: Option<Box<Node>>,
    },
    Invocation {
        expression: Box<Node>,
        arguments: Vec<Node>,
    },
    Argument {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        expression: Box<Node>,
    },
    MemberAccess {
        expression: Box<Node>,
        name: Box<Node>,
    },
    ObjectCreation {
        type_name: Box<Node>,
        #[serde(default)]
        arguments: Vec<Node>,
    },
    IdentifierName {
        identifier: String,
    },
    GenericName {
        identifier: String,
        type_arguments: Vec<Node>,
    },
    QualifiedName {
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Source text the model does not interpret; usable as an expression or
    /// a statement (then including its terminator).
    Opaque {
        text: String,
    },
}

/// Fieldless mirror of [`NodeKind`], used to check node shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxKind {
    CompilationUnit,
    UsingDirective,
    Namespace,
    TypeDeclaration,
    MethodDeclaration,
    ConstructorDeclaration,
    Parameter,
    AttributeList,
    Attribute,
    AttributeArgument,
    Block,
    ExpressionStatement,
    ThrowStatement,
    Invocation,
    Argument,
    MemberAccess,
    ObjectCreation,
    IdentifierName,
    GenericName,
    QualifiedName,
    Opaque,
}

impl SyntaxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyntaxKind::CompilationUnit => "compilation_unit",
            SyntaxKind::UsingDirective => "using_directive",
            SyntaxKind::Namespace => "namespace",
            SyntaxKind::TypeDeclaration => "type_declaration",
            SyntaxKind::MethodDeclaration => "method_declaration",
            SyntaxKind::ConstructorDeclaration => "constructor_declaration",
            SyntaxKind::Parameter => "parameter",
            SyntaxKind::AttributeList => "attribute_list",
            SyntaxKind::Attribute => "attribute",
            SyntaxKind::AttributeArgument => "attribute_argument",
            SyntaxKind::Block => "block",
            SyntaxKind::ExpressionStatement => "expression_statement",
            SyntaxKind::ThrowStatement => "throw_statement",
            SyntaxKind::Invocation => "invocation",
            SyntaxKind::Argument => "argument",
            SyntaxKind::MemberAccess => "member_access",
            SyntaxKind::ObjectCreation => "object_creation",
            SyntaxKind::IdentifierName => "identifier_name",
            SyntaxKind::GenericName => "generic_name",
            SyntaxKind::QualifiedName => "qualified_name",
            SyntaxKind::Opaque => "opaque",
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a child is held by its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// A mandatory child (`Box<Node>`).
    Required,
    /// A child that may be absent (`Option<Box<Node>>`).
    Optional,
    /// An element of a child list; the only removable position.
    List,
}

/// Callbacks used by [`NodeKind::try_map_children`] to rebuild a node.
pub trait ChildMapper {
    type Error;

    /// Map an element of a child list; `None` removes it.
    fn map_list_item(&mut self, node: Node) -> Result<Option<Node>, Self::Error>;

    /// Map a required or present optional child.
    fn map_single(&mut self, node: Node) -> Result<Node, Self::Error>;
}

impl NodeKind {
    pub fn syntax_kind(&self) -> SyntaxKind {
        match self {
            NodeKind::CompilationUnit { .. } => SyntaxKind::CompilationUnit,
            NodeKind::UsingDirective { .. } => SyntaxKind::UsingDirective,
            NodeKind::Namespace { .. } => SyntaxKind::Namespace,
            NodeKind::TypeDeclaration { .. } => SyntaxKind::TypeDeclaration,
            NodeKind::MethodDeclaration { .. } => SyntaxKind::MethodDeclaration,
            NodeKind::ConstructorDeclaration { .. } => SyntaxKind::ConstructorDeclaration,
            NodeKind::Parameter { .. } => SyntaxKind::Parameter,
            NodeKind::AttributeList { .. } => SyntaxKind::AttributeList,
            NodeKind::Attribute { .. } => SyntaxKind::Attribute,
            NodeKind::AttributeArgument { .. } => SyntaxKind::AttributeArgument,
            NodeKind::Block { .. } => SyntaxKind::Block,
            NodeKind::ExpressionStatement { .. } => SyntaxKind::ExpressionStatement,
            NodeKind::ThrowStatement { .. } => SyntaxKind::ThrowStatement,
            NodeKind::Invocation { .. } => SyntaxKind::Invocation,
            NodeKind::Argument { .. } => SyntaxKind::Argument,
            NodeKind::MemberAccess { .. } => SyntaxKind::MemberAccess,
            NodeKind::ObjectCreation { .. } => SyntaxKind::ObjectCreation,
            NodeKind::IdentifierName { .. } => SyntaxKind::IdentifierName,
            NodeKind::GenericName { .. } => SyntaxKind::GenericName,
            NodeKind::QualifiedName { .. } => SyntaxKind::QualifiedName,
            NodeKind::Opaque { .. } => SyntaxKind::Opaque,
        }
    }

    /// Children in source order, with the slot each one occupies.
    pub fn children_with_slots(&self) -> Vec<(&Node, Slot)> {
        fn push_list<'a>(out: &mut Vec<(&'a Node, Slot)>, nodes: &'a [Node]) {
            out.extend(nodes.iter().map(|n| (n, Slot::List)));
        }
        let mut out: Vec<(&Node, Slot)> = Vec::new();
        match self {
            NodeKind::CompilationUnit { members } => push_list(&mut out, members),
            NodeKind::UsingDirective { name, .. } => out.push((name, Slot::Required)),
            NodeKind::Namespace { name, members } => {
                out.push((name, Slot::Required));
                push_list(&mut out, members);
            }
            NodeKind::TypeDeclaration {
                attribute_lists,
                base_types,
                members,
                ..
            } => {
                push_list(&mut out, attribute_lists);
                push_list(&mut out, base_types);
                push_list(&mut out, members);
            }
            NodeKind::MethodDeclaration {
                attribute_lists,
                return_type,
                parameters,
                body,
                expression_body,
                ..
            } => {
                push_list(&mut out, attribute_lists);
                out.push((return_type, Slot::Required));
                push_list(&mut out, parameters);
                if let Some(body) = body {
                    out.push((body, Slot::Optional));
                }
                if let Some(expression) = expression_body {
                    out.push((expression, Slot::Optional));
                }
            }
            NodeKind::ConstructorDeclaration {
                attribute_lists,
                parameters,
                body,
                ..
            } => {
                push_list(&mut out, attribute_lists);
                push_list(&mut out, parameters);
                out.push((body, Slot::Required));
            }
            NodeKind::Parameter { type_name, .. } => out.push((type_name, Slot::Required)),
            NodeKind::AttributeList { attributes, .. } => push_list(&mut out, attributes),
            NodeKind::Attribute { name, arguments } => {
                out.push((name, Slot::Required));
                if let Some(arguments) = arguments {
                    push_list(&mut out, arguments);
                }
            }
            NodeKind::AttributeArgument { expression, .. } => {
                out.push((expression, Slot::Required))
            }
            NodeKind::Block { statements, .. } => push_list(&mut out, statements),
            NodeKind::ExpressionStatement { expression } => {
                out.push((expression, Slot::Required))
            }
            NodeKind::ThrowStatement { expression } => {
                if let Some(expression) = expression {
                    out.push((expression, Slot::Optional));
                }
            }
            NodeKind::Invocation {
                expression,
                arguments,
            } => {
                out.push((expression, Slot::Required));
                push_list(&mut out, arguments);
            }
            NodeKind::Argument { expression, .. } => out.push((expression, Slot::Required)),
            NodeKind::MemberAccess { expression, name } => {
                out.push((expression, Slot::Required));
                out.push((name, Slot::Required));
            }
            NodeKind::ObjectCreation {
                type_name,
                arguments,
            } => {
                out.push((type_name, Slot::Required));
                push_list(&mut out, arguments);
            }
            NodeKind::GenericName { type_arguments, .. } => push_list(&mut out, type_arguments),
            NodeKind::QualifiedName { left, right } => {
                out.push((left, Slot::Required));
                out.push((right, Slot::Required));
            }
            NodeKind::IdentifierName { .. } | NodeKind::Opaque { .. } => {}
        }
        out
    }

    /// Rebuild this node's children through `mapper`, in source order.
    pub fn try_map_children<M: ChildMapper>(self, mapper: &mut M) -> Result<NodeKind, M::Error> {
        fn list<M: ChildMapper>(nodes: Vec<Node>, mapper: &mut M) -> Result<Vec<Node>, M::Error> {
            let mut out = Vec::with_capacity(nodes.len());
            for node in nodes {
                if let Some(node) = mapper.map_list_item(node)? {
                    out.push(node);
                }
            }
            Ok(out)
        }
        fn single<M: ChildMapper>(node: Box<Node>, mapper: &mut M) -> Result<Box<Node>, M::Error> {
            Ok(Box::new(mapper.map_single(*node)?))
        }
        fn optional<M: ChildMapper>(
            node: Option<Box<Node>>,
            mapper: &mut M,
        ) -> Result<Option<Box<Node>>, M::Error> {
            node.map(|n| single(n, mapper)).transpose()
        }

        Ok(match self {
            NodeKind::CompilationUnit { members } => NodeKind::CompilationUnit {
                members: list(members, mapper)?,
            },
            NodeKind::UsingDirective { alias, name } => NodeKind::UsingDirective {
                alias,
                name: single(name, mapper)?,
            },
            NodeKind::Namespace { name, members } => NodeKind::Namespace {
                name: single(name, mapper)?,
                members: list(members, mapper)?,
            },
            NodeKind::TypeDeclaration {
                attribute_lists,
                modifiers,
                keyword,
                identifier,
                base_types,
                members,
            } => NodeKind::TypeDeclaration {
                attribute_lists: list(attribute_lists, mapper)?,
                modifiers,
                keyword,
                identifier,
                base_types: list(base_types, mapper)?,
                members: list(members, mapper)?,
            },
            NodeKind::MethodDeclaration {
                attribute_lists,
                modifiers,
                return_type,
                identifier,
                parameters,
                body,
                expression_body,
            } => NodeKind::MethodDeclaration {
                attribute_lists: list(attribute_lists, mapper)?,
                modifiers,
                return_type: single(return_type, mapper)?,
                identifier,
                parameters: list(parameters, mapper)?,
                body: optional(body, mapper)?,
                expression_body: optional(expression_body, mapper)?,
            },
            NodeKind::ConstructorDeclaration {
                attribute_lists,
                modifiers,
                identifier,
                parameters,
                body,
            } => NodeKind::ConstructorDeclaration {
                attribute_lists: list(attribute_lists, mapper)?,
                modifiers,
                identifier,
                parameters: list(parameters, mapper)?,
                body: single(body, mapper)?,
            },
            NodeKind::Parameter {
                type_name,
                identifier,
            } => NodeKind::Parameter {
                type_name: single(type_name, mapper)?,
                identifier,
            },
            NodeKind::AttributeList { target, attributes } => NodeKind::AttributeList {
                target,
                attributes: list(attributes, mapper)?,
            },
            NodeKind::Attribute { name, arguments } => NodeKind::Attribute {
                name: single(name, mapper)?,
                arguments: arguments.map(|a| list(a, mapper)).transpose()?,
            },
            NodeKind::AttributeArgument { name, expression } => NodeKind::AttributeArgument {
                name,
                expression: single(expression, mapper)?,
            },
            NodeKind::Block { statements, layout } => NodeKind::Block {
                statements: list(statements, mapper)?,
                layout,
            },
            NodeKind::ExpressionStatement { expression } => NodeKind::ExpressionStatement {
                expression: single(expression, mapper)?,
            },
            NodeKind::ThrowStatement { expression } => NodeKind::ThrowStatement {
                expression: optional(expression, mapper)?,
            },
            NodeKind::Invocation {
                expression,
                arguments,
            } => NodeKind::Invocation {
                expression: single(expression, mapper)?,
                arguments: list(arguments, mapper)?,
            },
            NodeKind::Argument { name, expression } => NodeKind::Argument {
                name,
                expression: single(expression, mapper)?,
            },
            NodeKind::MemberAccess { expression, name } => NodeKind::MemberAccess {
                expression: single(expression, mapper)?,
                name: single(name, mapper)?,
            },
            NodeKind::ObjectCreation {
                type_name,
                arguments,
            } => NodeKind::ObjectCreation {
                type_name: single(type_name, mapper)?,
                arguments: list(arguments, mapper)?,
            },
            NodeKind::GenericName {
                identifier,
                type_arguments,
            } => NodeKind::GenericName {
                identifier,
                type_arguments: list(type_arguments, mapper)?,
            },
            NodeKind::QualifiedName { left, right } => NodeKind::QualifiedName {
                left: single(left, mapper)?,
                right: single(right, mapper)?,
            },
            kind @ (NodeKind::IdentifierName { .. } | NodeKind::Opaque { .. }) => kind,
        })
    }
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Node {
            id,
            leading: Vec::new(),
            trailing: Vec::new(),
            kind,
        }
    }

    pub fn syntax_kind(&self) -> SyntaxKind {
        self.kind.syntax_kind()
    }

    /// Children in source order.
    pub fn children(&self) -> Vec<&Node> {
        self.kind
            .children_with_slots()
            .into_iter()
            .map(|(node, _)| node)
            .collect()
    }

    /// Copy leading and trailing trivia from `other`.
    pub fn with_trivia_from(mut self, other: &Node) -> Self {
        self.leading = other.leading.clone();
        self.trailing = other.trailing.clone();
        self
    }

    /// Dotted text of a name node (`A.B.C`), ignoring type arguments.
    ///
    /// Returns `None` for nodes that are not names.
    pub fn as_dotted_name(&self) -> Option<String> {
        match &self.kind {
            NodeKind::IdentifierName { identifier } | NodeKind::GenericName { identifier, .. } => {
                Some(identifier.clone())
            }
            NodeKind::QualifiedName { left, right } | NodeKind::MemberAccess {
                expression: left,
                name: right,
            } => Some(format!("{}.{}", left.as_dotted_name()?, right.as_dotted_name()?)),
            _ => None,
        }
    }

    /// Attributes of all attribute lists of a declaration.
    pub fn attribute_lists(&self) -> &[Node] {
        match &self.kind {
            NodeKind::TypeDeclaration {
                attribute_lists, ..
            }
            | NodeKind::MethodDeclaration {
                attribute_lists, ..
            }
            | NodeKind::ConstructorDeclaration {
                attribute_lists, ..
            } => attribute_lists,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone)]
struct IndexEntry {
    parent: Option<NodeId>,
    slot: Option<Slot>,
    /// Child positions from the root.
    path: Vec<usize>,
}

/// A rooted tree plus an id index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Node", into = "Node")]
pub struct SyntaxTree {
    root: Node,
    index: TreeIndex,
}

#[derive(Debug, Clone, Default)]
struct TreeIndex {
    entries: HashMap<NodeId, IndexEntry>,
    next_id: u32,
}

impl PartialEq for SyntaxTree {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

impl Eq for SyntaxTree {}

impl SyntaxTree {
    /// Index `root`. Fails when two nodes share an id.
    pub fn new(root: Node) -> Result<Self, SyntaxError> {
        let mut index = TreeIndex::default();
        let mut stack: Vec<(&Node, Option<NodeId>, Option<Slot>, Vec<usize>)> =
            vec![(&root, None, None, Vec::new())];
        while let Some((node, parent, slot, path)) = stack.pop() {
            if index.entries.contains_key(&node.id) {
                return Err(SyntaxError::DuplicateId(node.id));
            }
            index.next_id = index.next_id.max(node.id.0.saturating_add(1));
            for (i, (child, child_slot)) in node.kind.children_with_slots().into_iter().enumerate() {
                let mut child_path = path.clone();
                child_path.push(i);
                stack.push((child, Some(node.id), Some(child_slot), child_path));
            }
            index.entries.insert(node.id, IndexEntry { parent, slot, path });
        }
        Ok(SyntaxTree { root, index })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    /// First id not used by any node of the tree.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.index.next_id)
    }

    pub fn len(&self) -> usize {
        self.index.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.entries.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.entries.contains_key(&id)
    }

    pub fn find(&self, id: NodeId) -> Option<&Node> {
        let entry = self.index.entries.get(&id)?;
        let mut node = &self.root;
        for &i in &entry.path {
            node = node.kind.children_with_slots().get(i)?.0;
        }
        Some(node)
    }

    pub fn parent(&self, id: NodeId) -> Option<&Node> {
        let parent = self.index.entries.get(&id)?.parent?;
        self.find(parent)
    }

    /// Slot the node occupies in its parent (`None` for the root or unknown ids).
    pub fn slot(&self, id: NodeId) -> Option<Slot> {
        self.index.entries.get(&id)?.slot
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<&Node> {
        let mut out = Vec::new();
        let mut current = self.index.entries.get(&id).and_then(|e| e.parent);
        while let Some(parent) = current {
            match self.find(parent) {
                Some(node) => out.push(node),
                None => break,
            }
            current = self.index.entries.get(&parent).and_then(|e| e.parent);
        }
        out
    }

    /// All nodes below `node` (excluding it), in pre-order.
    pub fn descendants<'t>(&'t self, node: &'t Node) -> Vec<&'t Node> {
        let mut out = Vec::new();
        let mut stack: Vec<&Node> = node.children().into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(next.children().into_iter().rev());
        }
        out
    }

    /// Every node of the tree in pre-order, root first.
    pub fn nodes(&self) -> Vec<&Node> {
        let mut out = vec![&self.root];
        out.extend(self.descendants(&self.root));
        out
    }
}

impl TryFrom<Node> for SyntaxTree {
    type Error = SyntaxError;

    fn try_from(root: Node) -> Result<Self, Self::Error> {
        SyntaxTree::new(root)
    }
}

impl From<SyntaxTree> for Node {
    fn from(tree: SyntaxTree) -> Self {
        tree.root
    }
}
