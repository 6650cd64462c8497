//! Name binding against a metadata table.
//!
//! This is the small slice of a compiler's binder the engine needs when a
//! host hands over bare syntax: type names are resolved through the using
//! directives and enclosing namespaces in scope, and invocations, attributes
//! and throw statements get their bound [`Operation`]s.
//!
//! Lookup order for a (possibly dotted) type name:
//!
//! 1. a using alias matching the first segment;
//! 2. each enclosing namespace, innermost first, then the global namespace;
//! 3. for single-segment names, the imported namespaces. More than one
//!    distinct hit is ambiguous and resolves to nothing.

use tracing::trace;

use crate::semantic::{
    AttributeOperation, BoundArgument, InvocationOperation, MemberAssignment, MetadataTable,
    MethodReference, Operation, SymbolOracle, ThrowOperation, TypeHandle, ValueOperation,
};
use crate::tree::{ArgumentName, Node, NodeId, NodeKind, SyntaxTree};
use crate::visit::{walk, VisitResult, Visitor};

/// Metadata name every thrown value converts to.
const EXCEPTION_TYPE: &str = "System.Exception";

/// Suffix the language allows to omit from attribute names.
pub const ATTRIBUTE_SUFFIX: &str = "Attribute";

/// Names visible at one point of a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// Enclosing namespaces, innermost first.
    pub namespaces: Vec<String>,
    /// Imported namespaces (`using N;`), innermost declarations first.
    pub imports: Vec<String>,
    /// `using A = N.T;` as (alias, target), innermost declarations first.
    pub aliases: Vec<(String, String)>,
}

impl Scope {
    /// Scope in effect at `node`.
    pub fn at(tree: &SyntaxTree, node: NodeId) -> Scope {
        let mut scope = Scope::default();
        let mut namespace_segments: Vec<String> = Vec::new();

        for ancestor in tree.ancestors(node) {
            let members = match &ancestor.kind {
                NodeKind::Namespace { name, members } => {
                    if let Some(name) = name.as_dotted_name() {
                        namespace_segments.push(name);
                    }
                    members
                }
                NodeKind::CompilationUnit { members } => members,
                _ => continue,
            };
            for member in members {
                if let NodeKind::UsingDirective { alias, name } = &member.kind {
                    let Some(target) = name.as_dotted_name() else {
                        continue;
                    };
                    match alias {
                        Some(alias) => scope.aliases.push((alias.clone(), target)),
                        None => scope.imports.push(target),
                    }
                }
            }
        }

        // declarations were collected innermost first; `namespace A.B`
        // encloses both `A` and `A.B`
        namespace_segments.reverse();
        let mut full = String::new();
        for segment in namespace_segments.iter().flat_map(|n| n.split('.')) {
            if !full.is_empty() {
                full.push('.');
            }
            full.push_str(segment);
            scope.namespaces.insert(0, full.clone());
        }
        scope
    }

    pub fn alias(&self, name: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|(alias, _)| alias == name)
            .map(|(_, target)| target.as_str())
    }

    pub fn imports_namespace(&self, namespace: &str) -> bool {
        self.imports.iter().any(|i| i == namespace)
    }
}

fn join(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}

/// Resolve a dotted type name as written at a point with `scope`.
pub fn resolve_type(oracle: &dyn SymbolOracle, scope: &Scope, name: &str) -> Option<TypeHandle> {
    let (first, rest) = match name.split_once('.') {
        Some((first, rest)) => (first, Some(rest)),
        None => (name, None),
    };

    if let Some(target) = scope.alias(first) {
        let full = match rest {
            Some(rest) => join(target, rest),
            None => target.to_string(),
        };
        return oracle.resolve(&full);
    }

    for namespace in scope.namespaces.iter().map(String::as_str).chain([""]) {
        if let Some(ty) = oracle.resolve(&join(namespace, name)) {
            return Some(ty);
        }
    }

    if rest.is_some() {
        return None;
    }
    let mut hits: Vec<TypeHandle> = scope
        .imports
        .iter()
        .filter_map(|import| oracle.resolve(&join(import, name)))
        .collect();
    hits.sort();
    hits.dedup();
    match hits.as_slice() {
        [single] => Some(*single),
        _ => None,
    }
}

/// Resolve an attribute name, trying the `Attribute`-suffixed form first.
pub fn resolve_attribute(oracle: &dyn SymbolOracle, scope: &Scope, name: &str) -> Option<TypeHandle> {
    if !name.ends_with(ATTRIBUTE_SUFFIX) {
        let suffixed = format!("{}{}", name, ATTRIBUTE_SUFFIX);
        if let Some(ty) = resolve_type(oracle, scope, &suffixed) {
            return Some(ty);
        }
    }
    resolve_type(oracle, scope, name)
}

/// Bind every invocation, attribute and throw statement of `tree`.
pub fn bind_document(metadata: &MetadataTable, tree: &SyntaxTree) -> Vec<Operation> {
    let mut binder = NameBinder {
        metadata,
        tree,
        operations: Vec::new(),
    };
    walk(&mut binder, tree.root());
    trace!(operations = binder.operations.len(), "bound document");
    binder.operations
}

/// Visitor producing bound operations.
pub struct NameBinder<'a> {
    metadata: &'a MetadataTable,
    tree: &'a SyntaxTree,
    operations: Vec<Operation>,
}

impl NameBinder<'_> {
    fn scope(&self, node: &Node) -> Scope {
        Scope::at(self.tree, node.id)
    }

    fn bind_invocation(&self, node: &Node) -> Option<Operation> {
        let NodeKind::Invocation {
            expression,
            arguments,
        } = &node.kind
        else {
            return None;
        };
        let (containing_type, name) = match &expression.kind {
            NodeKind::MemberAccess {
                expression: receiver,
                name,
            } => {
                let containing_type = receiver
                    .as_dotted_name()
                    .and_then(|n| resolve_type(self.metadata, &self.scope(node), &n));
                (containing_type, name.as_dotted_name()?)
            }
            NodeKind::IdentifierName { .. } | NodeKind::GenericName { .. } => {
                (None, expression.as_dotted_name()?)
            }
            _ => return None,
        };
        let arguments = arguments
            .iter()
            .map(|argument| BoundArgument {
                parameter: match &argument.kind {
                    NodeKind::Argument { name, .. } => name.clone(),
                    _ => None,
                },
                syntax: argument.id,
            })
            .collect();
        Some(Operation::Invocation(InvocationOperation {
            syntax: node.id,
            target: MethodReference {
                containing_type,
                name,
            },
            arguments,
        }))
    }

    fn bind_attribute(&self, node: &Node) -> Option<Operation> {
        let NodeKind::Attribute { name, arguments } = &node.kind else {
            return None;
        };
        let attribute_type = name
            .as_dotted_name()
            .and_then(|n| resolve_attribute(self.metadata, &self.scope(node), &n));
        let arguments = arguments.as_deref().unwrap_or_default();

        let constructor_arity = arguments
            .iter()
            .filter(|a| {
                !matches!(
                    &a.kind,
                    NodeKind::AttributeArgument {
                        name: Some(ArgumentName::Equals(_)),
                        ..
                    }
                )
            })
            .count();
        let parameters: &[String] = attribute_type
            .and_then(|ty| self.metadata.definition(ty))
            .and_then(|definition| {
                definition
                    .constructors
                    .iter()
                    .find(|c| c.len() == constructor_arity)
                    .or_else(|| definition.constructors.iter().find(|c| c.len() >= constructor_arity))
            })
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut bound = Vec::new();
        let mut initializers = Vec::new();
        let mut position = 0;
        for argument in arguments {
            let NodeKind::AttributeArgument { name, .. } = &argument.kind else {
                continue;
            };
            match name {
                Some(ArgumentName::Equals(member)) => initializers.push(MemberAssignment {
                    member: member.clone(),
                    syntax: argument.id,
                }),
                Some(ArgumentName::Colon(parameter)) => bound.push(BoundArgument {
                    parameter: Some(parameter.clone()),
                    syntax: argument.id,
                }),
                None => {
                    bound.push(BoundArgument {
                        parameter: parameters.get(position).cloned(),
                        syntax: argument.id,
                    });
                    position += 1;
                }
            }
        }

        Some(Operation::Attribute(AttributeOperation {
            syntax: node.id,
            attribute_type,
            arguments: bound,
            initializers,
        }))
    }

    fn bind_throw(&self, node: &Node) -> Option<Operation> {
        let NodeKind::ThrowStatement { expression } = &node.kind else {
            return None;
        };
        let exception = expression.as_deref().map(|expression| {
            let ty = match &expression.kind {
                NodeKind::ObjectCreation { type_name, .. } => type_name
                    .as_dotted_name()
                    .and_then(|n| resolve_type(self.metadata, &self.scope(node), &n)),
                _ => None,
            };
            let value = ValueOperation::Value { ty };
            match (ty, self.metadata.resolve(EXCEPTION_TYPE)) {
                (Some(thrown), Some(exception)) if thrown != exception => {
                    ValueOperation::Conversion {
                        implicit: true,
                        ty: Some(exception),
                        operand: Box::new(value),
                    }
                }
                _ => value,
            }
        });
        Some(Operation::Throw(ThrowOperation {
            syntax: node.id,
            exception,
        }))
    }
}

impl Visitor for NameBinder<'_> {
    fn visit_invocation(&mut self, node: &Node) -> VisitResult {
        if let Some(op) = self.bind_invocation(node) {
            self.operations.push(op);
        }
        VisitResult::Continue
    }

    fn visit_attribute(&mut self, node: &Node) -> VisitResult {
        if let Some(op) = self.bind_attribute(node) {
            self.operations.push(op);
        }
        VisitResult::Continue
    }

    fn visit_throw_statement(&mut self, node: &Node) -> VisitResult {
        if let Some(op) = self.bind_throw(node) {
            self.operations.push(op);
        }
        VisitResult::Continue
    }
}
