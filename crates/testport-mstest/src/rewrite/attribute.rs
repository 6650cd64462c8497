//! MSTest attributes to xUnit attributes.

use testport_syntax::semantic::AttributeOperation;
use testport_syntax::simplify::{type_name_syntax, NameUse};
use testport_syntax::tree::ArgumentName;
use testport_syntax::{Node, NodeId, NodeKind};

use super::{argument_expression, invariant, NoEditReason, RewriteOutcome, RewriteResult, Rewriter};
use crate::catalog::CatalogEntry;
use crate::report::Finding;
use crate::rules::{attribute_rule, ArgumentPolicy, RuleTarget};
use crate::session::EditSession;

pub(super) fn rewrite_attribute(
    rewriter: &Rewriter<'_, '_>,
    finding: &Finding,
    node: &Node,
    entry: CatalogEntry,
    operation: &AttributeOperation,
    session: &mut EditSession<'_>,
) -> RewriteResult<RewriteOutcome> {
    let NodeKind::Attribute { arguments, .. } = &node.kind else {
        return Err(invariant(finding, "attribute finding on a non-attribute"));
    };
    let Some(rule) = attribute_rule(entry) else {
        return Ok(RewriteOutcome::NoEdit(NoEditReason::NoRewriteRegistered));
    };
    let applied = RewriteOutcome::Applied {
        rule: finding.rule,
        edited: node.id,
    };

    let target = match rule.target {
        RuleTarget::RemoveAttribute => {
            session.editor().remove_node(node.id)?;
            return Ok(applied);
        }
        RuleTarget::Attribute(target) => target,
        other => {
            return Err(invariant(
                finding,
                format!("{other:?} is not an attribute rewrite"),
            ))
        }
    };
    if rewriter.catalog().get(target).is_none() {
        return Ok(RewriteOutcome::NoEdit(NoEditReason::TargetSymbolMissing(target)));
    }

    let new_arguments = match rule.policy {
        // the targets merged into take no arguments
        ArgumentPolicy::MergeAttributeArguments => None,
        ArgumentPolicy::CopyInOrder => Some(arguments.clone().unwrap_or_default()),
        ArgumentPolicy::ExtractNamedInitializer {
            parameter,
            property,
            target_property,
        } => {
            let bound = |syntax: NodeId| {
                arguments
                    .iter()
                    .flatten()
                    .find(|a| a.id == syntax)
                    .and_then(argument_expression)
            };
            let source = operation
                .arguments
                .iter()
                .find(|a| a.parameter.as_deref() == Some(parameter))
                .and_then(|a| bound(a.syntax));
            let initializer = operation
                .initializers
                .iter()
                .find(|i| i.member == property)
                .and_then(|i| bound(i.syntax));

            let generator = session.generator();
            let mut extracted = Vec::new();
            if let Some(source) = source {
                extracted.push(generator.attribute_argument(None, source));
            }
            if let Some(value) = initializer {
                extracted.push(generator.attribute_argument(
                    Some(ArgumentName::Equals(target_property.to_string())),
                    value,
                ));
            }
            Some(extracted)
        }
        other => {
            return Err(invariant(
                finding,
                format!("argument policy {other:?} does not apply to attributes"),
            ))
        }
    };

    let scope = session.scope(node.id);
    let oracle = rewriter.catalog().oracle();
    let simplify = rewriter.simplify_type_names();
    let generator = session.generator();
    let name = type_name_syntax(
        generator,
        oracle,
        &scope,
        target.metadata_name(),
        NameUse::Attribute,
        simplify,
    );
    let replacement = generator.attribute(name, new_arguments).with_trivia_from(node);
    session.editor().replace_node(node.id, replacement)?;
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, MSTEST_NAMESPACE};
    use crate::fixture::UnitBuilder;
    use crate::options::MigrationOptions;
    use crate::report::report_compilation;
    use crate::rules::RuleId;
    use testport_syntax::printer::render;
    use testport_syntax::semantic::TypeDefinition;
    use testport_syntax::Compilation;

    fn rewrite_all(compilation: &Compilation) -> (String, Vec<(RuleId, RewriteOutcome)>) {
        let options = MigrationOptions::default();
        let findings = report_compilation(compilation, &options);
        let catalog = Catalog::new(compilation);
        let rewriter = Rewriter::new(&catalog, &options);
        let mut session = EditSession::new(&compilation.documents[0]);
        let outcomes = findings
            .iter()
            .map(|f| (f.rule, rewriter.rewrite(f, &mut session).unwrap()))
            .collect();
        let edited = session.finish().unwrap();
        (render(&edited.tree).text, outcomes)
    }

    fn method_with(attributes: &'static [&'static str], xunit: bool) -> Compilation {
        let mut unit = UnitBuilder::new();
        unit.document("Tests.cs", |d| {
            d.using_mstest();
            if xunit {
                d.using_xunit();
            }
            d.class("Test", &[], |c| {
                c.method("Run", attributes, |_| {});
            });
        });
        unit.build()
    }

    #[test]
    fn test_method_becomes_fact() {
        let (text, _) = rewrite_all(&method_with(&["TestMethod"], true));
        assert!(text.contains("    [Fact]\n    public void Run() { }"), "{text}");
    }

    #[test]
    fn fact_is_qualified_when_xunit_is_not_imported() {
        let (text, _) = rewrite_all(&method_with(&["TestMethod(\"name\")"], false));
        assert!(text.contains("[Xunit.Fact]"), "{text}");
    }

    #[test]
    fn data_test_method_keeps_an_empty_argument_list() {
        let (text, _) = rewrite_all(&method_with(&["DataTestMethod"], true));
        assert!(text.contains("[Theory()]"), "{text}");
    }

    #[test]
    fn data_row_arguments_are_copied() {
        let (text, _) = rewrite_all(&method_with(
            &["DataTestMethod", "DataRow(\"a\", 1, DisplayName = \"x\")"],
            true,
        ));
        assert!(text.contains("[InlineData(\"a\", 1, DisplayName = \"x\")]"), "{text}");
    }

    #[test]
    fn dynamic_data_becomes_member_data() {
        let (text, _) = rewrite_all(&method_with(
            &["DynamicData(\"test\", DynamicDataDisplayNameDeclaringType = typeof(object))"],
            true,
        ));
        assert!(
            text.contains("[MemberData(\"test\", MemberType = typeof(object))]"),
            "{text}"
        );
    }

    #[test]
    fn dynamic_data_without_initializer() {
        let (text, _) = rewrite_all(&method_with(&["DynamicData(\"Rows\")"], true));
        assert!(text.contains("[MemberData(\"Rows\")]"), "{text}");
    }

    #[test]
    fn dynamic_data_without_source_name() {
        let (text, _) = rewrite_all(&method_with(
            &["DynamicData(DynamicDataDisplayNameDeclaringType = typeof(Rows))"],
            true,
        ));
        assert!(text.contains("[MemberData(MemberType = typeof(Rows))]"), "{text}");
    }

    #[test]
    fn test_class_is_removed_with_its_list() {
        let mut unit = UnitBuilder::new();
        unit.document("Tests.cs", |d| {
            d.using_mstest();
            d.class("Test", &["TestClass"], |_| {});
        });
        let (text, outcomes) = rewrite_all(&unit.build());
        assert!(outcomes[0].1.is_applied());
        assert_eq!(
            text,
            format!("using {MSTEST_NAMESPACE};\npublic class Test\n{{\n}}\n")
        );
    }

    #[test]
    fn subtypes_are_reported_but_not_rewritten() {
        let mut unit = UnitBuilder::new();
        unit.define(
            TypeDefinition::class("Tests.MyTestMethodAttribute")
                .with_base(format!("{MSTEST_NAMESPACE}.TestMethodAttribute"))
                .with_constructor(&[]),
        );
        unit.document("Tests.cs", |d| {
            d.using_mstest();
            d.namespace("Tests", |d| {
                d.class("Test", &[], |c| {
                    c.method("Run", &["MyTestMethod"], |_| {});
                });
            });
        });
        let (text, outcomes) = rewrite_all(&unit.build());
        assert_eq!(
            outcomes,
            vec![(RuleId::Msx201, RewriteOutcome::NoEdit(NoEditReason::NotExactType))]
        );
        assert!(text.contains("[MyTestMethod]"));
    }

    #[test]
    fn attributes_without_rewrite_are_left_alone() {
        let mut unit = UnitBuilder::new();
        unit.document("Tests.cs", |d| {
            d.using_mstest();
            d.class("Test", &[], |c| {
                c.method("Setup", &["ClassInitialize"], |_| {})
                    .modifiers(&["public", "static"]);
            });
        });
        let (text, outcomes) = rewrite_all(&unit.build());
        assert_eq!(
            outcomes,
            vec![(RuleId::Msx205, RewriteOutcome::NoEdit(NoEditReason::NoRewriteRegistered))]
        );
        assert!(text.contains("[ClassInitialize]"));
    }
}
