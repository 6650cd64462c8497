//! `Assert.X(...)` to `Xunit.Assert.Y(...)`.

use testport_syntax::simplify::{type_name_syntax, NameUse};
use testport_syntax::{Node, NodeKind};

use super::{argument_expression, invariant, NoEditReason, RewriteOutcome, RewriteResult, Rewriter};
use crate::catalog::CatalogEntry;
use crate::classify::AssertionFamily;
use crate::report::Finding;
use crate::rules::{assertion_rule, has_assertion_rule, ArgumentPolicy, RuleTarget};
use crate::session::EditSession;

pub(super) fn rewrite_assertion(
    rewriter: &Rewriter<'_, '_>,
    finding: &Finding,
    node: &Node,
    family: AssertionFamily,
    method: &str,
    session: &mut EditSession<'_>,
) -> RewriteResult<RewriteOutcome> {
    let NodeKind::Invocation {
        expression,
        arguments,
    } = &node.kind
    else {
        return Err(invariant(finding, "assertion finding on a non-invocation"));
    };
    let NodeKind::MemberAccess { name, .. } = &expression.kind else {
        return Err(invariant(finding, "assertion call without a receiver"));
    };

    let Some(rule) = assertion_rule(family, method, arguments.len()) else {
        let reason = if has_assertion_rule(family, method) {
            NoEditReason::UnsupportedArity {
                method: method.to_string(),
                arguments: arguments.len(),
            }
        } else {
            NoEditReason::NoRewriteRegistered
        };
        return Ok(RewriteOutcome::NoEdit(reason));
    };
    let RuleTarget::AssertMethod(target_method) = rule.target else {
        return Err(invariant(finding, "assertion rule without a target method"));
    };
    let Some(target) = rewriter.catalog().get(CatalogEntry::XunitAssert) else {
        return Ok(RewriteOutcome::NoEdit(NoEditReason::TargetSymbolMissing(
            CatalogEntry::XunitAssert,
        )));
    };

    // argument expressions keep their ids so edits inside them still apply
    let mut placed = Vec::with_capacity(arguments.len());
    for (index, argument) in finding.classified.arguments.iter().enumerate() {
        let expression = arguments
            .iter()
            .find(|a| a.id == argument.syntax)
            .and_then(argument_expression)
            .ok_or_else(|| invariant(finding, "bound argument missing from the call"))?;
        let position = argument
            .parameter
            .as_deref()
            .and_then(|name| rule.parameter_position(name))
            .unwrap_or(index);
        placed.push((position, expression));
    }
    // names are dropped below, so every argument must land on its own slot
    placed.sort_by_key(|(position, _)| *position);
    if placed.iter().enumerate().any(|(slot, (position, _))| slot != *position) {
        return Ok(RewriteOutcome::NoEdit(NoEditReason::NamedArgumentsOutOfPlace));
    }
    let mut expressions: Vec<Node> = placed.into_iter().map(|(_, expression)| expression).collect();
    match rule.policy {
        ArgumentPolicy::CopyInOrder => {}
        ArgumentPolicy::SwapFirstTwoThenRest => {
            if expressions.len() >= 2 {
                expressions.swap(0, 1);
            }
        }
        other => {
            return Err(invariant(
                finding,
                format!("argument policy {other:?} does not apply to assertions"),
            ))
        }
    }

    let scope = session.scope(node.id);
    let oracle = rewriter.catalog().oracle();
    let simplify = rewriter.simplify_type_names();
    let generator = session.generator();
    let receiver = type_name_syntax(
        generator,
        oracle,
        &scope,
        target.metadata_name(),
        NameUse::Type,
        simplify,
    );
    let method_name = match &name.kind {
        NodeKind::GenericName { type_arguments, .. } => {
            generator.generic_name(target_method, type_arguments.clone())
        }
        _ => generator.identifier_name(target_method),
    };
    let callee = generator.member_access(receiver, method_name);
    let arguments = expressions
        .into_iter()
        .map(|expression| generator.argument(expression))
        .collect();
    let replacement = generator.invocation(callee, arguments).with_trivia_from(node);

    session.editor().replace_node(node.id, replacement)?;
    Ok(RewriteOutcome::Applied {
        rule: finding.rule,
        edited: node.id,
    })
}
