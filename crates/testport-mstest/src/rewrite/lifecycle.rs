//! Per-test setup and teardown methods.
//!
//! xUnit creates a fresh instance of the test class for every test, so a
//! `[TestInitialize]` method becomes the constructor and a `[TestCleanup]`
//! method becomes `Dispose()`, with the class implementing `IDisposable`.
//! A class that already has a constructor or is already disposable would
//! need the bodies merged; those findings are left alone.

use testport_syntax::bind::resolve_type;
use testport_syntax::simplify::{type_name_syntax, NameUse};
use testport_syntax::tree::{BlockLayout, Trivia};
use testport_syntax::{EditorError, Node, NodeId, NodeKind, Operation, SyntaxGenerator, SyntaxTree};

use super::{invariant, NoEditReason, RewriteOutcome, RewriteResult, Rewriter};
use crate::catalog::{Catalog, CatalogEntry};
use crate::classify::AttributeKind;
use crate::report::Finding;
use crate::rules::{attribute_rule, ArgumentPolicy, RuleTarget};
use crate::session::EditSession;

const DISPOSE: &str = "Dispose";

/// The method carrying `attribute` and the type declaring that method.
struct Owner {
    method: Node,
    ty: Node,
}

fn owner(tree: &SyntaxTree, attribute: NodeId) -> Result<Owner, NoEditReason> {
    let method = tree
        .parent(attribute)
        .and_then(|list| tree.parent(list.id))
        .filter(|m| matches!(m.kind, NodeKind::MethodDeclaration { .. }))
        .ok_or(NoEditReason::NotOnMethod)?;
    let ty = tree
        .parent(method.id)
        .filter(|t| matches!(t.kind, NodeKind::TypeDeclaration { .. }))
        .ok_or(NoEditReason::NotInType)?;
    Ok(Owner {
        method: method.clone(),
        ty: ty.clone(),
    })
}

fn type_members(ty: &Node) -> &[Node] {
    match &ty.kind {
        NodeKind::TypeDeclaration { members, .. } => members,
        _ => &[],
    }
}

/// Methods of `ty` carrying an attribute of kind `entry` (or a subtype).
fn lifecycle_methods(session: &EditSession<'_>, catalog: &Catalog<'_>, ty: &Node, entry: CatalogEntry) -> usize {
    type_members(ty)
        .iter()
        .filter(|member| matches!(member.kind, NodeKind::MethodDeclaration { .. }))
        .filter(|method| {
            method
                .attribute_lists()
                .iter()
                .flat_map(|list| list.children())
                .any(|attribute| match session.document().operation(attribute.id) {
                    Some(Operation::Attribute(op)) => op
                        .attribute_type
                        .is_some_and(|t| catalog.is_or_inherits_from(t, entry)),
                    _ => false,
                })
        })
        .count()
}

/// Attribute lists of `method` without `attribute`, plus the leading trivia
/// of lists that became empty.
fn remaining_attribute_lists(method: &Node, attribute: NodeId) -> (Vec<Node>, Vec<Trivia>) {
    let mut lists = Vec::new();
    let mut orphaned = Vec::new();
    for list in method.attribute_lists() {
        let mut list = list.clone();
        if let NodeKind::AttributeList { attributes, .. } = &mut list.kind {
            attributes.retain(|a| a.id != attribute);
            if attributes.is_empty() {
                orphaned.extend(list.leading);
                continue;
            }
        }
        lists.push(list);
    }
    (lists, orphaned)
}

/// Statements of the method body; an expression body becomes one statement.
fn body_statements(generator: &mut SyntaxGenerator, method: &Node) -> Vec<Node> {
    match &method.kind {
        NodeKind::MethodDeclaration {
            body: Some(body), ..
        } => match &body.kind {
            NodeKind::Block { statements, .. } => statements.clone(),
            _ => vec![(**body).clone()],
        },
        NodeKind::MethodDeclaration {
            expression_body: Some(expression),
            ..
        } => vec![generator.expression_statement((**expression).clone())],
        _ => Vec::new(),
    }
}

/// Trivia of the replaced method, led by what the dropped lists carried.
fn carry_trivia(mut replacement: Node, method: &Node, orphaned: Vec<Trivia>) -> Node {
    replacement.leading = orphaned;
    replacement.leading.extend(method.leading.iter().cloned());
    replacement.trailing = method.trailing.clone();
    replacement
}

fn check_policy(finding: &Finding, entry: CatalogEntry, policy: ArgumentPolicy) -> RewriteResult<RuleTarget> {
    match attribute_rule(entry) {
        Some(rule) if rule.policy == policy => Ok(rule.target),
        _ => Err(invariant(finding, format!("no {policy:?} rule for {entry}"))),
    }
}

fn ensure_unedited(session: &mut EditSession<'_>, method: &Node) -> RewriteResult<()> {
    if session.editor().has_edit(method.id) {
        return Err(EditorError::Conflict(method.id).into());
    }
    Ok(())
}

/// `[TestInitialize] void Setup() { ... }` to `public Test() { ... }`.
pub(super) fn rewrite_initializer(
    rewriter: &Rewriter<'_, '_>,
    finding: &Finding,
    node: &Node,
    entry: CatalogEntry,
    session: &mut EditSession<'_>,
) -> RewriteResult<RewriteOutcome> {
    let RuleTarget::Constructor = check_policy(finding, entry, ArgumentPolicy::SynthesizeConstructorBody)? else {
        return Err(invariant(finding, "initializer rule must target a constructor"));
    };
    let Owner { method, ty } = match owner(session.tree(), node.id) {
        Ok(owner) => owner,
        Err(reason) => return Ok(RewriteOutcome::NoEdit(reason)),
    };
    if let NodeKind::MethodDeclaration { parameters, .. } = &method.kind {
        if !parameters.is_empty() {
            return Ok(RewriteOutcome::NoEdit(NoEditReason::ParameterizedInitializer));
        }
    }
    // overloads with parameters can live next to the new constructor
    if type_members(&ty).iter().any(|m| {
        matches!(&m.kind, NodeKind::ConstructorDeclaration { parameters, .. } if parameters.is_empty())
    }) {
        return Ok(RewriteOutcome::NoEdit(NoEditReason::ConstructorExists));
    }
    if lifecycle_methods(session, rewriter.catalog(), &ty, entry) > 1 {
        return Ok(RewriteOutcome::NoEdit(NoEditReason::MultipleLifecycleMethods(
            AttributeKind::TestInitialize,
        )));
    }
    let NodeKind::TypeDeclaration { identifier, .. } = &ty.kind else {
        return Err(invariant(finding, "owner is not a type declaration"));
    };
    ensure_unedited(session, &method)?;

    let (lists, orphaned) = remaining_attribute_lists(&method, node.id);
    let generator = session.generator();
    let statements = body_statements(generator, &method);
    let body = generator.block(statements, BlockLayout::Indented);
    let constructor = generator.constructor_declaration(lists, &["public"], identifier.clone(), body);
    let constructor = carry_trivia(constructor, &method, orphaned);

    session.editor().replace_node(method.id, constructor)?;
    Ok(RewriteOutcome::Applied {
        rule: finding.rule,
        edited: method.id,
    })
}

/// `[TestCleanup] void Teardown() { ... }` to `public void Dispose() { ... }`
/// on a type that implements `IDisposable`.
pub(super) fn rewrite_cleanup(
    rewriter: &Rewriter<'_, '_>,
    finding: &Finding,
    node: &Node,
    entry: CatalogEntry,
    session: &mut EditSession<'_>,
) -> RewriteResult<RewriteOutcome> {
    let RuleTarget::Disposal(interface) = check_policy(finding, entry, ArgumentPolicy::SynthesizeDisposalBody)? else {
        return Err(invariant(finding, "cleanup rule must target disposal"));
    };
    let Some(disposable) = rewriter.catalog().handle(interface) else {
        return Ok(RewriteOutcome::NoEdit(NoEditReason::TargetSymbolMissing(interface)));
    };
    let Owner { method, ty } = match owner(session.tree(), node.id) {
        Ok(owner) => owner,
        Err(reason) => return Ok(RewriteOutcome::NoEdit(reason)),
    };

    let oracle = rewriter.catalog().oracle();
    let scope = session.scope(ty.id);
    let NodeKind::TypeDeclaration { base_types, .. } = &ty.kind else {
        return Err(invariant(finding, "owner is not a type declaration"));
    };
    let implements = base_types.iter().any(|base| {
        base.as_dotted_name()
            .and_then(|name| resolve_type(oracle, &scope, &name))
            == Some(disposable)
    });
    let declares_dispose = type_members(&ty).iter().any(|m| {
        m.id != method.id
            && matches!(&m.kind, NodeKind::MethodDeclaration { identifier, .. } if identifier == DISPOSE)
    });
    if implements || declares_dispose {
        return Ok(RewriteOutcome::NoEdit(NoEditReason::AlreadyDisposable));
    }
    if lifecycle_methods(session, rewriter.catalog(), &ty, entry) > 1 {
        return Ok(RewriteOutcome::NoEdit(NoEditReason::MultipleLifecycleMethods(
            AttributeKind::TestCleanup,
        )));
    }
    ensure_unedited(session, &method)?;

    let (lists, orphaned) = remaining_attribute_lists(&method, node.id);
    let simplify = rewriter.simplify_type_names();
    let generator = session.generator();
    let base = type_name_syntax(
        generator,
        oracle,
        &scope,
        interface.metadata_name(),
        NameUse::Type,
        simplify,
    );
    let (body, expression_body) = match &method.kind {
        NodeKind::MethodDeclaration {
            body: None,
            expression_body: Some(expression),
            ..
        } => (None, Some((**expression).clone())),
        _ => {
            let statements = body_statements(generator, &method);
            (Some(generator.block(statements, BlockLayout::Indented)), None)
        }
    };
    let return_type = generator.opaque("void");
    let dispose = generator.method_declaration(
        lists,
        &["public"],
        return_type,
        DISPOSE,
        Vec::new(),
        body,
        expression_body,
    );
    let dispose = carry_trivia(dispose, &method, orphaned);

    session.editor().add_base_type(ty.id, base)?;
    session.editor().replace_node(method.id, dispose)?;
    Ok(RewriteOutcome::Applied {
        rule: finding.rule,
        edited: method.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MSTEST_NAMESPACE;
    use crate::fixture::{ClassBuilder, UnitBuilder};
    use crate::options::MigrationOptions;
    use crate::report::report_compilation;
    use testport_syntax::printer::render;
    use testport_syntax::Compilation;

    fn rewrite_all(compilation: &Compilation) -> (String, Vec<RewriteOutcome>) {
        let options = MigrationOptions::default();
        let findings = report_compilation(compilation, &options);
        let catalog = Catalog::new(compilation);
        let rewriter = Rewriter::new(&catalog, &options);
        let mut session = EditSession::new(&compilation.documents[0]);
        let outcomes = findings
            .iter()
            .map(|f| rewriter.rewrite(f, &mut session).unwrap())
            .collect();
        let edited = session.finish().unwrap();
        (render(&edited.tree).text, outcomes)
    }

    fn unit(usings: &[&str], bases: &[&str], build: impl FnOnce(&mut ClassBuilder)) -> Compilation {
        let mut unit = UnitBuilder::new();
        unit.document("Tests.cs", |d| {
            d.using_mstest();
            for using in usings {
                d.using(using);
            }
            d.class_with_bases("Test", &[], bases, build);
        });
        unit.build()
    }

    #[test]
    fn initializer_becomes_constructor() {
        let compilation = unit(&[], &[], |c| {
            c.method("A", &["TestInitialize"], |b| {
                b.raw("x = 1;");
            })
            .comment("// test");
        });
        let (text, outcomes) = rewrite_all(&compilation);
        assert!(outcomes[0].is_applied());
        assert_eq!(
            text,
            format!(
                "using {MSTEST_NAMESPACE};\n\
                 public class Test\n\
                 {{\n    \
                     // test\n    \
                     public Test()\n    \
                     {{\n        \
                         x = 1;\n    \
                     }}\n\
                 }}\n"
            )
        );
    }

    #[test]
    fn comment_on_the_dropped_list_is_kept() {
        let compilation = unit(&[], &[], |c| {
            c.method("A", &["TestInitialize"], |_| {})
                .comment_on_attributes("// setup");
        });
        let (text, _) = rewrite_all(&compilation);
        assert!(text.contains("    // setup\n    public Test()\n    {\n    }"), "{text}");
    }

    #[test]
    fn expression_bodied_initializer() {
        let compilation = unit(&[], &[], |c| {
            c.expression_method("A", &["TestInitialize"], "Init()");
        });
        let (text, _) = rewrite_all(&compilation);
        assert!(text.contains("public Test()\n    {\n        Init();\n    }"), "{text}");
    }

    #[test]
    fn existing_constructor_blocks_the_initializer() {
        let compilation = unit(&[], &[], |c| {
            c.constructor(|_| {});
            c.method("A", &["TestInitialize"], |_| {});
        });
        let (text, outcomes) = rewrite_all(&compilation);
        assert_eq!(outcomes, vec![RewriteOutcome::NoEdit(NoEditReason::ConstructorExists)]);
        assert!(text.contains("[TestInitialize]"));
    }

    #[test]
    fn constructor_overloads_with_parameters_are_kept() {
        let compilation = unit(&[], &[], |c| {
            c.constructor(|_| {}).parameters(&["int seed"]);
            c.method("A", &["TestInitialize"], |b| {
                b.raw("x = 1;");
            });
        });
        let (text, outcomes) = rewrite_all(&compilation);
        assert!(outcomes[0].is_applied(), "{outcomes:?}");
        assert!(text.contains("public Test(int seed) { }"), "{text}");
        assert!(text.contains("public Test()\n    {\n        x = 1;\n    }"), "{text}");
        assert!(!text.contains("TestInitialize"), "{text}");
    }

    #[test]
    fn initializer_with_parameters_is_left_alone() {
        let compilation = unit(&[], &[], |c| {
            c.method("A", &["TestInitialize"], |b| {
                b.raw("x = seed;");
            })
            .parameters(&["int seed"]);
        });
        let (text, outcomes) = rewrite_all(&compilation);
        assert_eq!(outcomes, vec![RewriteOutcome::NoEdit(NoEditReason::ParameterizedInitializer)]);
        assert!(text.contains("[TestInitialize]"), "{text}");
        assert!(text.contains("public void A(int seed) { x = seed; }"), "{text}");
    }

    #[test]
    fn two_initializers_are_not_merged() {
        let compilation = unit(&[], &[], |c| {
            c.method("A", &["TestInitialize"], |_| {});
            c.method("B", &["TestInitialize"], |_| {});
        });
        let (_, outcomes) = rewrite_all(&compilation);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| *o
            == RewriteOutcome::NoEdit(NoEditReason::MultipleLifecycleMethods(
                AttributeKind::TestInitialize
            ))));
    }

    #[test]
    fn cleanup_becomes_dispose() {
        let compilation = unit(&["System"], &[], |c| {
            c.method("A", &["TestCleanup"], |_| {})
                .modifiers(&["public", "static"]);
        });
        let (text, outcomes) = rewrite_all(&compilation);
        assert!(outcomes[0].is_applied());
        assert_eq!(
            text,
            format!(
                "using {MSTEST_NAMESPACE};\n\
                 using System;\n\
                 public class Test : IDisposable\n\
                 {{\n    \
                     public void Dispose()\n    \
                     {{\n    \
                     }}\n\
                 }}\n"
            )
        );
    }

    #[test]
    fn interface_is_qualified_without_using_system() {
        let compilation = unit(&[], &[], |c| {
            c.method("A", &["TestCleanup"], |_| {});
        });
        let (text, _) = rewrite_all(&compilation);
        assert!(text.contains("public class Test : System.IDisposable\n"), "{text}");
    }

    #[test]
    fn disposable_types_are_left_alone() {
        let compilation = unit(&["System"], &["IDisposable"], |c| {
            c.method("A", &["TestCleanup"], |_| {});
        });
        let (_, outcomes) = rewrite_all(&compilation);
        assert_eq!(outcomes, vec![RewriteOutcome::NoEdit(NoEditReason::AlreadyDisposable)]);

        let compilation = unit(&[], &[], |c| {
            c.method("A", &["TestCleanup"], |_| {});
            c.method("Dispose", &[], |_| {});
        });
        let (_, outcomes) = rewrite_all(&compilation);
        assert_eq!(outcomes, vec![RewriteOutcome::NoEdit(NoEditReason::AlreadyDisposable)]);
    }

    #[test]
    fn setup_and_teardown_together() {
        let compilation = unit(&["System"], &[], |c| {
            c.method("Setup", &["TestInitialize"], |b| {
                b.raw("x = 1;");
            });
            c.method("Teardown", &["TestCleanup"], |b| {
                b.raw("x = 0;");
            });
        });
        let (text, outcomes) = rewrite_all(&compilation);
        assert!(outcomes.iter().all(RewriteOutcome::is_applied));
        assert!(text.contains("public class Test : IDisposable"));
        assert!(text.contains("public Test()\n    {\n        x = 1;\n    }"));
        assert!(text.contains("public void Dispose()\n    {\n        x = 0;\n    }"));
    }
}
