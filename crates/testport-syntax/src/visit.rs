//! Visitor trait for syntax tree traversal.
//!
//! Every node kind has a `visit_*` / `leave_*` pair. `visit_*` is called in
//! pre-order and controls descent through [`VisitResult`]; `leave_*` is
//! called in post-order, even when children were skipped.

use crate::tree::{Node, NodeKind};

/// Result of visiting a node - controls traversal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children.
    #[default]
    Continue,
    /// Skip children, continue with siblings. `leave_*` is still called.
    SkipChildren,
    /// Stop traversal entirely.
    Stop,
}

/// Generates `visit_*` and `leave_*` methods with default implementations.
macro_rules! visitor_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a `", stringify!($base_name), "` node.")]
                #[allow(unused_variables)]
                fn [<visit_ $base_name>](&mut self, node: &Node) -> VisitResult {
                    VisitResult::Continue
                }

                $(#[$meta])*
                #[doc = concat!("Leave a `", stringify!($base_name), "` node.")]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, node: &Node) {}
            )*
        }
    };
}

/// Immutable visitor over a syntax tree.
///
/// # Example
///
/// ```
/// use testport_syntax::factory::SyntaxGenerator;
/// use testport_syntax::tree::Node;
/// use testport_syntax::visit::{walk, Visitor, VisitResult};
///
/// struct Names(Vec<String>);
///
/// impl Visitor for Names {
///     fn visit_identifier_name(&mut self, node: &Node) -> VisitResult {
///         self.0.extend(node.as_dotted_name());
///         VisitResult::Continue
///     }
/// }
///
/// let mut g = SyntaxGenerator::default();
/// let name = g.qualified_name("Xunit.Assert");
/// let mut names = Names(Vec::new());
/// walk(&mut names, &name);
/// assert_eq!(names.0, vec!["Xunit", "Assert"]);
/// ```
pub trait Visitor {
    visitor_methods! {
        compilation_unit,
        using_directive,
        namespace,
        type_declaration,
        method_declaration,
        constructor_declaration,
        parameter,
        attribute_list,
        attribute,
        attribute_argument,
        block,
        expression_statement,
        throw_statement,
        invocation,
        argument,
        member_access,
        object_creation,
        identifier_name,
        generic_name,
        qualified_name,
        opaque,
    }
}

/// Walk `node` and its descendants. Returns `VisitResult::Stop` if the
/// visitor stopped the traversal.
pub fn walk<V: Visitor + ?Sized>(visitor: &mut V, node: &Node) -> VisitResult {
    let result = dispatch_visit(visitor, node);
    if result == VisitResult::Stop {
        return VisitResult::Stop;
    }
    if result == VisitResult::Continue {
        for child in node.children() {
            if walk(visitor, child) == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    dispatch_leave(visitor, node);
    VisitResult::Continue
}

macro_rules! dispatch {
    ($visitor:ident, $node:ident, $prefix:ident, $( $variant:ident => $base_name:ident ),* $(,)?) => {
        paste::paste! {
            match &$node.kind {
                $( NodeKind::$variant { .. } => $visitor.[<$prefix _ $base_name>]($node), )*
            }
        }
    };
}

fn dispatch_visit<V: Visitor + ?Sized>(visitor: &mut V, node: &Node) -> VisitResult {
    dispatch!(visitor, node, visit,
        CompilationUnit => compilation_unit,
        UsingDirective => using_directive,
        Namespace => namespace,
        TypeDeclaration => type_declaration,
        MethodDeclaration => method_declaration,
        ConstructorDeclaration => constructor_declaration,
        Parameter => parameter,
        AttributeList => attribute_list,
        Attribute => attribute,
        AttributeArgument => attribute_argument,
        Block => block,
        ExpressionStatement => expression_statement,
        ThrowStatement => throw_statement,
        Invocation => invocation,
        Argument => argument,
        MemberAccess => member_access,
        ObjectCreation => object_creation,
        IdentifierName => identifier_name,
        GenericName => generic_name,
        QualifiedName => qualified_name,
        Opaque => opaque,
    )
}

fn dispatch_leave<V: Visitor + ?Sized>(visitor: &mut V, node: &Node) {
    dispatch!(visitor, node, leave,
        CompilationUnit => compilation_unit,
        UsingDirective => using_directive,
        Namespace => namespace,
        TypeDeclaration => type_declaration,
        MethodDeclaration => method_declaration,
        ConstructorDeclaration => constructor_declaration,
        Parameter => parameter,
        AttributeList => attribute_list,
        Attribute => attribute,
        AttributeArgument => attribute_argument,
        Block => block,
        ExpressionStatement => expression_statement,
        ThrowStatement => throw_statement,
        Invocation => invocation,
        Argument => argument,
        MemberAccess => member_access,
        ObjectCreation => object_creation,
        IdentifierName => identifier_name,
        GenericName => generic_name,
        QualifiedName => qualified_name,
        Opaque => opaque,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::SyntaxGenerator;
    use crate::tree::BlockLayout;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        skip_blocks: bool,
        stop_at: Option<&'static str>,
    }

    impl Visitor for Recorder {
        fn visit_block(&mut self, _node: &Node) -> VisitResult {
            self.events.push("visit block".into());
            if self.skip_blocks {
                VisitResult::SkipChildren
            } else {
                VisitResult::Continue
            }
        }

        fn leave_block(&mut self, _node: &Node) {
            self.events.push("leave block".into());
        }

        fn visit_identifier_name(&mut self, node: &Node) -> VisitResult {
            let name = node.as_dotted_name().unwrap_or_default();
            self.events.push(format!("ident {}", name));
            if self.stop_at == Some("ident") {
                VisitResult::Stop
            } else {
                VisitResult::Continue
            }
        }
    }

    fn block() -> Node {
        let mut g = SyntaxGenerator::default();
        let a = g.identifier_name("a");
        let a = g.expression_statement(a);
        let b = g.identifier_name("b");
        let b = g.expression_statement(b);
        g.block(vec![a, b], BlockLayout::Inline)
    }

    #[test]
    fn visits_in_source_order_with_leave_after_children() {
        let mut recorder = Recorder::default();
        walk(&mut recorder, &block());
        assert_eq!(
            recorder.events,
            vec!["visit block", "ident a", "ident b", "leave block"]
        );
    }

    #[test]
    fn skip_children_still_leaves() {
        let mut recorder = Recorder {
            skip_blocks: true,
            ..Default::default()
        };
        walk(&mut recorder, &block());
        assert_eq!(recorder.events, vec!["visit block", "leave block"]);
    }

    #[test]
    fn stop_halts_traversal() {
        let mut recorder = Recorder {
            stop_at: Some("ident"),
            ..Default::default()
        };
        assert_eq!(walk(&mut recorder, &block()), VisitResult::Stop);
        assert_eq!(recorder.events, vec!["visit block", "ident a"]);
    }
}
