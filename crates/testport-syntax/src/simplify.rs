//! Shortest type expression for a metadata name at a point of a tree.

use crate::bind::{resolve_attribute, resolve_type, Scope, ATTRIBUTE_SUFFIX};
use crate::factory::SyntaxGenerator;
use crate::semantic::{SymbolOracle, TypeHandle};
use crate::tree::Node;

/// How a name is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameUse {
    /// In type position (`Assert.True`, `: IDisposable`).
    Type,
    /// As an attribute name, where the `Attribute` suffix may be omitted.
    Attribute,
}

impl NameUse {
    fn resolve(self, oracle: &dyn SymbolOracle, scope: &Scope, name: &str) -> Option<TypeHandle> {
        match self {
            NameUse::Type => resolve_type(oracle, scope, name),
            NameUse::Attribute => resolve_attribute(oracle, scope, name),
        }
    }

    fn written<'n>(self, name: &'n str) -> &'n str {
        match self {
            NameUse::Type => name,
            NameUse::Attribute => name
                .strip_suffix(ATTRIBUTE_SUFFIX)
                .filter(|stripped| !stripped.is_empty() && !stripped.ends_with('.'))
                .unwrap_or(name),
        }
    }
}

/// Pick the text to write for `metadata_name` at `scope`.
///
/// With `simplify` set, a matching using alias wins, then the simple name,
/// each only if resolving it again at `scope` yields the same type. The
/// fallback is the fully qualified name.
pub fn type_name_text(
    oracle: &dyn SymbolOracle,
    scope: &Scope,
    metadata_name: &str,
    usage: NameUse,
    simplify: bool,
) -> String {
    let full = usage.written(metadata_name).to_string();
    let Some(target) = oracle.resolve(metadata_name) else {
        return full;
    };
    if !simplify {
        return full;
    }

    let round_trips = |candidate: &str| usage.resolve(oracle, scope, candidate) == Some(target);

    let aliases = scope
        .aliases
        .iter()
        .filter(|(_, t)| t == metadata_name)
        .map(|(alias, _)| alias.clone());
    let simple = metadata_name
        .rsplit('.')
        .next()
        .map(|simple| usage.written(simple).to_string());

    aliases
        .chain(simple)
        .find(|candidate| round_trips(candidate.as_str()))
        .unwrap_or(full)
}

/// Build the name node for `metadata_name`, see [`type_name_text`].
pub fn type_name_syntax(
    generator: &mut SyntaxGenerator,
    oracle: &dyn SymbolOracle,
    scope: &Scope,
    metadata_name: &str,
    usage: NameUse,
    simplify: bool,
) -> Node {
    let text = type_name_text(oracle, scope, metadata_name, usage, simplify);
    generator.qualified_name(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::{MetadataTable, TypeDefinition};

    fn table() -> MetadataTable {
        MetadataTable::try_from(vec![
            TypeDefinition::class("Xunit.Assert"),
            TypeDefinition::class("Xunit.FactAttribute"),
            TypeDefinition::class("Other.Assert"),
            TypeDefinition::interface("System.IDisposable"),
        ])
        .unwrap()
    }

    fn importing(imports: &[&str]) -> Scope {
        Scope {
            imports: imports.iter().map(|s| s.to_string()).collect(),
            ..Scope::default()
        }
    }

    #[test]
    fn simple_name_when_imported() {
        let text = type_name_text(&table(), &importing(&["Xunit"]), "Xunit.Assert", NameUse::Type, true);
        assert_eq!(text, "Assert");
    }

    #[test]
    fn qualified_when_not_imported() {
        let text = type_name_text(&table(), &importing(&["System"]), "Xunit.Assert", NameUse::Type, true);
        assert_eq!(text, "Xunit.Assert");
    }

    #[test]
    fn qualified_when_simple_name_is_ambiguous() {
        let scope = importing(&["Xunit", "Other"]);
        let text = type_name_text(&table(), &scope, "Xunit.Assert", NameUse::Type, true);
        assert_eq!(text, "Xunit.Assert");
    }

    #[test]
    fn alias_is_preferred() {
        let scope = Scope {
            imports: vec!["Xunit".into()],
            aliases: vec![("XAssert".into(), "Xunit.Assert".into())],
            ..Scope::default()
        };
        let text = type_name_text(&table(), &scope, "Xunit.Assert", NameUse::Type, true);
        assert_eq!(text, "XAssert");
    }

    #[test]
    fn attribute_drops_suffix() {
        let table = table();
        let simple = type_name_text(&table, &importing(&["Xunit"]), "Xunit.FactAttribute", NameUse::Attribute, true);
        assert_eq!(simple, "Fact");
        let full = type_name_text(&table, &Scope::default(), "Xunit.FactAttribute", NameUse::Attribute, true);
        assert_eq!(full, "Xunit.Fact");
    }

    #[test]
    fn disabled_simplification_keeps_full_name() {
        let text = type_name_text(&table(), &importing(&["System"]), "System.IDisposable", NameUse::Type, false);
        assert_eq!(text, "System.IDisposable");
    }

    #[test]
    fn syntax_is_a_qualified_name() {
        let mut g = SyntaxGenerator::default();
        let node = type_name_syntax(&mut g, &table(), &Scope::default(), "Xunit.Assert", NameUse::Type, true);
        assert_eq!(node.as_dotted_name().as_deref(), Some("Xunit.Assert"));
    }
}
