//! Semantic model: type handles, the symbol oracle and bound operations.
//!
//! A host front end describes the types of a compiled unit in a
//! [`MetadataTable`] and attaches bound [`Operation`]s to syntax nodes.
//! The migration engine only ever asks the [`SymbolOracle`] questions; it
//! never looks at the table directly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tree::NodeId;

/// Opaque handle to a type known to a [`SymbolOracle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeHandle(pub u32);

/// Type identity and hierarchy queries.
pub trait SymbolOracle: Send + Sync {
    /// Resolve a fully-qualified metadata name (`Namespace.Type`).
    fn resolve(&self, metadata_name: &str) -> Option<TypeHandle>;

    fn metadata_name(&self, ty: TypeHandle) -> Option<&str>;

    /// Direct base type, if it is known.
    fn base_type(&self, ty: TypeHandle) -> Option<TypeHandle>;

    /// Every interface implemented by `ty`, including inherited ones.
    fn all_interfaces(&self, ty: TypeHandle) -> Vec<TypeHandle>;
}

/// Type category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Interface,
}

/// One type of the metadata table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub metadata_name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    /// Parameter names of each public constructor, used to bind positional
    /// attribute arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructors: Vec<Vec<String>>,
}

impl TypeDefinition {
    pub fn class(metadata_name: impl Into<String>) -> Self {
        TypeDefinition {
            metadata_name: metadata_name.into(),
            kind: TypeKind::Class,
            base: None,
            interfaces: Vec::new(),
            constructors: Vec::new(),
        }
    }

    pub fn interface(metadata_name: impl Into<String>) -> Self {
        TypeDefinition {
            kind: TypeKind::Interface,
            ..TypeDefinition::class(metadata_name)
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn implementing(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_constructor(mut self, parameters: &[&str]) -> Self {
        self.constructors
            .push(parameters.iter().map(|p| p.to_string()).collect());
        self
    }

    /// Namespace part of the metadata name (empty for global types).
    pub fn namespace(&self) -> &str {
        self.metadata_name
            .rsplit_once('.')
            .map(|(ns, _)| ns)
            .unwrap_or("")
    }

    /// Simple name (last segment of the metadata name).
    pub fn simple_name(&self) -> &str {
        self.metadata_name
            .rsplit_once('.')
            .map(|(_, name)| name)
            .unwrap_or(&self.metadata_name)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("type {0} is declared twice")]
    DuplicateType(String),
}

/// Table-backed [`SymbolOracle`].
///
/// Handles are indices into the table, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TypeDefinition>", into = "Vec<TypeDefinition>")]
pub struct MetadataTable {
    types: Vec<TypeDefinition>,
    by_name: HashMap<String, TypeHandle>,
}

impl MetadataTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, definition: TypeDefinition) -> Result<TypeHandle, MetadataError> {
        if self.by_name.contains_key(&definition.metadata_name) {
            return Err(MetadataError::DuplicateType(definition.metadata_name));
        }
        let handle = TypeHandle(self.types.len() as u32);
        self.by_name.insert(definition.metadata_name.clone(), handle);
        self.types.push(definition);
        Ok(handle)
    }

    pub fn definition(&self, ty: TypeHandle) -> Option<&TypeDefinition> {
        self.types.get(ty.0 as usize)
    }

    pub fn definitions(&self) -> &[TypeDefinition] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Whether any type lives in `namespace` or one of its sub-namespaces.
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.types.iter().any(|t| {
            let ns = t.namespace();
            ns == namespace
                || ns
                    .strip_prefix(namespace)
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }
}

impl TryFrom<Vec<TypeDefinition>> for MetadataTable {
    type Error = MetadataError;

    fn try_from(types: Vec<TypeDefinition>) -> Result<Self, Self::Error> {
        let mut table = MetadataTable::new();
        for definition in types {
            table.add(definition)?;
        }
        Ok(table)
    }
}

impl From<MetadataTable> for Vec<TypeDefinition> {
    fn from(table: MetadataTable) -> Self {
        table.types
    }
}

impl SymbolOracle for MetadataTable {
    fn resolve(&self, metadata_name: &str) -> Option<TypeHandle> {
        self.by_name.get(metadata_name).copied()
    }

    fn metadata_name(&self, ty: TypeHandle) -> Option<&str> {
        self.definition(ty).map(|d| d.metadata_name.as_str())
    }

    fn base_type(&self, ty: TypeHandle) -> Option<TypeHandle> {
        let base = self.definition(ty)?.base.as_deref()?;
        self.resolve(base)
    }

    fn all_interfaces(&self, ty: TypeHandle) -> Vec<TypeHandle> {
        let mut out: Vec<TypeHandle> = Vec::new();
        let mut pending: Vec<TypeHandle> = Vec::new();

        // walk the base chain; the guard bounds malformed cyclic tables
        let mut current = Some(ty);
        let mut steps = 0;
        while let Some(t) = current {
            if steps > self.types.len() {
                break;
            }
            steps += 1;
            if let Some(definition) = self.definition(t) {
                pending.extend(definition.interfaces.iter().filter_map(|i| self.resolve(i)));
            }
            current = self.base_type(t);
        }

        while let Some(interface) = pending.pop() {
            if out.contains(&interface) {
                continue;
            }
            out.push(interface);
            if let Some(definition) = self.definition(interface) {
                pending.extend(definition.interfaces.iter().filter_map(|i| self.resolve(i)));
            }
        }
        out
    }
}

/// Walk the base chain of `ty` (starting with `ty` itself).
pub fn base_chain(oracle: &dyn SymbolOracle, ty: TypeHandle) -> Vec<TypeHandle> {
    let mut chain = vec![ty];
    let mut current = oracle.base_type(ty);
    while let Some(t) = current {
        if chain.contains(&t) {
            break;
        }
        chain.push(t);
        current = oracle.base_type(t);
    }
    chain
}

// ============================================================================
// Bound operations
// ============================================================================

/// The method an invocation calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodReference {
    /// Type declaring the method; `None` when the receiver is not a type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containing_type: Option<TypeHandle>,
    pub name: String,
}

/// An argument and the parameter it binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundArgument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    /// The `Argument` / `AttributeArgument` node.
    pub syntax: NodeId,
}

/// `Member = value` in an attribute's argument list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberAssignment {
    pub member: String,
    /// The `AttributeArgument` node.
    pub syntax: NodeId,
}

/// Value of an expression together with the conversions applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueOperation {
    Conversion {
        implicit: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ty: Option<TypeHandle>,
        operand: Box<ValueOperation>,
    },
    Value {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ty: Option<TypeHandle>,
    },
}

impl ValueOperation {
    pub fn ty(&self) -> Option<TypeHandle> {
        match self {
            ValueOperation::Conversion { ty, .. } | ValueOperation::Value { ty } => *ty,
        }
    }

    /// Peel implicit conversions off the value.
    pub fn strip_implicit_conversions(&self) -> &ValueOperation {
        let mut current = self;
        while let ValueOperation::Conversion {
            implicit: true,
            operand,
            ..
        } = current
        {
            current = &**operand;
        }
        current
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationOperation {
    pub syntax: NodeId,
    pub target: MethodReference,
    #[serde(default)]
    pub arguments: Vec<BoundArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeOperation {
    pub syntax: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_type: Option<TypeHandle>,
    #[serde(default)]
    pub arguments: Vec<BoundArgument>,
    #[serde(default)]
    pub initializers: Vec<MemberAssignment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrowOperation {
    pub syntax: NodeId,
    /// `None` for a rethrow (`throw;`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<ValueOperation>,
}

/// A bound operation attached to one syntax node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    Invocation(InvocationOperation),
    Attribute(AttributeOperation),
    Throw(ThrowOperation),
}

impl Operation {
    pub fn syntax(&self) -> NodeId {
        match self {
            Operation::Invocation(op) => op.syntax,
            Operation::Attribute(op) => op.syntax,
            Operation::Throw(op) => op.syntax,
        }
    }
}
