//! Rule ids, descriptors and the rewrite rule table.
//!
//! Rule ids are a stable contract: they appear in JSON output and in the
//! `[rules] disabled` list of `testport.toml`.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use testport_core::output::RuleInfo;

use crate::catalog::CatalogEntry;
use crate::classify::{AssertionFamily, AttributeKind, Construct};

// ============================================================================
// Rule ids and descriptors
// ============================================================================

macro_rules! rule_ids {
    ($( $variant:ident => $id:literal ),* $(,)?) => {
        /// Stable rule identifier.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum RuleId {
            $( #[serde(rename = $id)] $variant, )*
        }

        impl RuleId {
            pub const ALL: &'static [RuleId] = &[ $( RuleId::$variant, )* ];

            pub fn as_str(self) -> &'static str {
                match self {
                    $( RuleId::$variant => $id, )*
                }
            }
        }

        impl FromStr for RuleId {
            type Err = UnknownRuleId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $id => Ok(RuleId::$variant), )*
                    _ => Err(UnknownRuleId(s.to_string())),
                }
            }
        }
    };
}

rule_ids! {
    Msx000 => "MSX000",
    Msx100 => "MSX100",
    Msx200 => "MSX200",
    Msx201 => "MSX201",
    Msx202 => "MSX202",
    Msx203 => "MSX203",
    Msx204 => "MSX204",
    Msx205 => "MSX205",
    Msx206 => "MSX206",
    Msx207 => "MSX207",
    Msx208 => "MSX208",
    Msx209 => "MSX209",
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rule id: {0}")]
pub struct UnknownRuleId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Design,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Design => "Design",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Static description of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDescriptor {
    pub id: RuleId,
    pub title: &'static str,
    pub message: &'static str,
    /// Family shown in listings (`assertion-call`, `test-class attribute`).
    pub family: &'static str,
    pub category: Category,
    pub severity: Severity,
    pub has_fix: bool,
}

const ATTRIBUTE_TITLE: &str = "Replace MSTest attributes with xUnit equivalent";

macro_rules! descriptor {
    ($id:ident, $title:expr, $message:expr, $family:literal, $fix:expr) => {
        RuleDescriptor {
            id: RuleId::$id,
            title: $title,
            message: $message,
            family: $family,
            category: Category::Design,
            severity: Severity::Warning,
            has_fix: $fix,
        }
    };
}

/// Descriptors of every rule, in id order.
pub static DESCRIPTORS: &[RuleDescriptor] = &[
    descriptor!(Msx000, "Replace MSTest exceptions with equivalent", "Use xUnit exceptions", "thrown-assertion-exception", false),
    descriptor!(Msx100, "Replace MSTest assertions with xUnit assertions", "Use xUnit equivalent", "assertion-call", true),
    descriptor!(Msx200, ATTRIBUTE_TITLE, "Use xUnit attributes", "test-class attribute", true),
    descriptor!(Msx201, ATTRIBUTE_TITLE, "Use xUnit attributes", "test-method attribute", true),
    descriptor!(Msx202, ATTRIBUTE_TITLE, "Use xUnit attributes", "data-source attribute", true),
    descriptor!(Msx203, ATTRIBUTE_TITLE, "Use xUnit attributes", "assembly-initialize attribute", false),
    descriptor!(Msx204, ATTRIBUTE_TITLE, "Use xUnit attributes", "assembly-cleanup attribute", false),
    descriptor!(Msx205, ATTRIBUTE_TITLE, "Use xUnit equivalent", "class-initialize attribute", false),
    descriptor!(Msx206, ATTRIBUTE_TITLE, "Use xUnit equivalent", "class-cleanup attribute", false),
    descriptor!(Msx207, ATTRIBUTE_TITLE, "Use a constructor", "test-initialize attribute", true),
    descriptor!(Msx208, ATTRIBUTE_TITLE, "Use IDisposable", "test-cleanup attribute", true),
    descriptor!(Msx209, ATTRIBUTE_TITLE, "Use xUnit equivalent", "parallelize attribute", false),
];

impl RuleId {
    pub fn descriptor(self) -> &'static RuleDescriptor {
        // DESCRIPTORS is declared in id order
        &DESCRIPTORS[self as usize]
    }

    pub fn has_fix(self) -> bool {
        self.descriptor().has_fix
    }

    /// The rule a construct is reported under.
    pub fn for_construct(construct: &Construct) -> RuleId {
        match construct {
            Construct::ThrownAssertionException => RuleId::Msx000,
            Construct::AssertionCall { .. } => RuleId::Msx100,
            Construct::AttributeApplication { attribute } => match attribute {
                AttributeKind::TestClass => RuleId::Msx200,
                AttributeKind::TestMethod => RuleId::Msx201,
                AttributeKind::DataSource => RuleId::Msx202,
                AttributeKind::AssemblyInitialize => RuleId::Msx203,
                AttributeKind::AssemblyCleanup => RuleId::Msx204,
                AttributeKind::ClassInitialize => RuleId::Msx205,
                AttributeKind::ClassCleanup => RuleId::Msx206,
                AttributeKind::TestInitialize => RuleId::Msx207,
                AttributeKind::TestCleanup => RuleId::Msx208,
                AttributeKind::Parallelize => RuleId::Msx209,
            },
        }
    }
}

impl RuleDescriptor {
    pub fn to_info(&self, enabled: bool) -> RuleInfo {
        RuleInfo {
            id: self.id.as_str().to_string(),
            title: self.title.to_string(),
            message: self.message.to_string(),
            category: self.category.as_str().to_string(),
            severity: self.severity.as_str().to_string(),
            has_fix: self.has_fix,
            enabled,
        }
    }
}

// ============================================================================
// Rewrite rule table
// ============================================================================

/// How the arguments of the source construct become the arguments of the
/// target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentPolicy {
    /// Same arguments, same order.
    CopyInOrder,
    /// The first two arguments trade places; the rest follow in order.
    SwapFirstTwoThenRest,
    /// The source argument list is folded into the target attribute's
    /// argument list, which may be shorter (possibly empty) or absent.
    MergeAttributeArguments,
    /// The argument bound to `parameter` becomes the first positional
    /// argument and the value assigned to `property` becomes a named
    /// argument.
    ExtractNamedInitializer {
        parameter: &'static str,
        property: &'static str,
        target_property: &'static str,
    },
    /// The enclosing method becomes a constructor.
    SynthesizeConstructorBody,
    /// The enclosing method becomes `Dispose()`.
    SynthesizeDisposalBody,
}

impl ArgumentPolicy {
    /// Whether the policy may change the number of arguments.
    pub fn may_change_arity(self) -> bool {
        matches!(
            self,
            ArgumentPolicy::MergeAttributeArguments | ArgumentPolicy::ExtractNamedInitializer { .. }
        )
    }
}

/// What a rule matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    /// `family.method(...)` with an argument count in `arity` (any if `None`).
    /// `parameters` names the leading parameters every overload shares, so
    /// named arguments can be put back in place.
    Assertion {
        family: AssertionFamily,
        method: &'static str,
        arity: Option<RangeInclusive<usize>>,
        parameters: &'static [&'static str],
    },
    /// An attribute whose type is exactly `entry`.
    Attribute(CatalogEntry),
}

/// What a rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTarget {
    /// `Xunit.Assert.<name>(...)`.
    AssertMethod(&'static str),
    /// The attribute is replaced by one of type `entry`.
    Attribute(CatalogEntry),
    /// The attribute is removed.
    RemoveAttribute,
    /// The enclosing method becomes a public constructor.
    Constructor,
    /// The enclosing method becomes `public void Dispose()` and the type
    /// implements `entry`.
    Disposal(CatalogEntry),
}

/// One entry of the rewrite rule table. Explicit type arguments are always
/// copied in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    /// The id findings of this rule are reported under.
    pub rule: RuleId,
    pub source: RuleSource,
    pub policy: ArgumentPolicy,
    pub target: RuleTarget,
}

impl RewriteRule {
    /// Position of the source parameter called `name`, when the rule knows it.
    pub fn parameter_position(&self, name: &str) -> Option<usize> {
        match &self.source {
            RuleSource::Assertion { parameters, .. } => parameters.iter().position(|p| *p == name),
            RuleSource::Attribute(_) => None,
        }
    }
}

const fn assertion(
    family: AssertionFamily,
    method: &'static str,
    parameters: &'static [&'static str],
    target: &'static str,
    policy: ArgumentPolicy,
) -> RewriteRule {
    RewriteRule {
        rule: RuleId::Msx100,
        source: RuleSource::Assertion {
            family,
            method,
            arity: None,
            parameters,
        },
        policy,
        target: RuleTarget::AssertMethod(target),
    }
}

const fn attribute(
    rule: RuleId,
    entry: CatalogEntry,
    policy: ArgumentPolicy,
    target: RuleTarget,
) -> RewriteRule {
    RewriteRule {
        rule,
        source: RuleSource::Attribute(entry),
        policy,
        target,
    }
}

use ArgumentPolicy::{CopyInOrder, SwapFirstTwoThenRest};
use AssertionFamily::{Assert, CollectionAssert, StringAssert};

/// The rewrite rule table.
pub static REWRITE_RULES: &[RewriteRule] = &[
    // Assert
    assertion(Assert, "IsTrue", &["condition"], "True", CopyInOrder),
    assertion(Assert, "IsFalse", &["condition"], "False", CopyInOrder),
    assertion(Assert, "IsNotNull", &["value"], "NotNull", CopyInOrder),
    assertion(Assert, "IsNull", &["value"], "Null", CopyInOrder),
    assertion(Assert, "AreEqual", &["expected", "actual"], "Equal", CopyInOrder),
    assertion(Assert, "AreNotEqual", &["notExpected", "actual"], "NotEqual", CopyInOrder),
    assertion(Assert, "AreSame", &["expected", "actual"], "Same", CopyInOrder),
    assertion(Assert, "AreNotSame", &["notExpected", "actual"], "NotSame", CopyInOrder),
    assertion(Assert, "ThrowsException", &["action"], "Throws", CopyInOrder),
    assertion(Assert, "ThrowsExceptionAsync", &["action"], "ThrowsAsync", CopyInOrder),
    RewriteRule {
        rule: RuleId::Msx100,
        source: RuleSource::Assertion {
            family: Assert,
            method: "IsInstanceOfType",
            arity: Some(1..=2),
            parameters: &["value", "expectedType"],
        },
        policy: SwapFirstTwoThenRest,
        target: RuleTarget::AssertMethod("IsType"),
    },
    RewriteRule {
        rule: RuleId::Msx100,
        source: RuleSource::Assertion {
            family: Assert,
            method: "IsNotInstanceOfType",
            arity: Some(1..=2),
            parameters: &["value", "wrongType"],
        },
        policy: SwapFirstTwoThenRest,
        target: RuleTarget::AssertMethod("IsNotType"),
    },
    // StringAssert
    assertion(StringAssert, "StartsWith", &["value", "substring"], "StartsWith", SwapFirstTwoThenRest),
    assertion(StringAssert, "EndsWith", &["value", "substring"], "EndsWith", SwapFirstTwoThenRest),
    assertion(StringAssert, "Contains", &["value", "substring"], "Contains", SwapFirstTwoThenRest),
    // CollectionAssert
    assertion(CollectionAssert, "AreEqual", &["expected", "actual"], "Equal", CopyInOrder),
    assertion(CollectionAssert, "AreNotEqual", &["notExpected", "actual"], "NotEqual", CopyInOrder),
    assertion(CollectionAssert, "Contains", &["collection", "element"], "Contains", SwapFirstTwoThenRest),
    assertion(
        CollectionAssert,
        "DoesNotContain",
        &["collection", "element"],
        "DoesNotContain",
        SwapFirstTwoThenRest,
    ),
    assertion(CollectionAssert, "IsSubsetOf", &["subset", "superset"], "Contains", CopyInOrder),
    assertion(CollectionAssert, "IsNotSubsetOf", &["subset", "superset"], "DoesNotContain", CopyInOrder),
    // attributes
    attribute(
        RuleId::Msx200,
        CatalogEntry::MsTestTestClassAttribute,
        ArgumentPolicy::MergeAttributeArguments,
        RuleTarget::RemoveAttribute,
    ),
    attribute(
        RuleId::Msx201,
        CatalogEntry::MsTestTestMethodAttribute,
        ArgumentPolicy::MergeAttributeArguments,
        RuleTarget::Attribute(CatalogEntry::XunitFactAttribute),
    ),
    attribute(
        RuleId::Msx201,
        CatalogEntry::MsTestDataTestMethodAttribute,
        CopyInOrder,
        RuleTarget::Attribute(CatalogEntry::XunitTheoryAttribute),
    ),
    attribute(
        RuleId::Msx202,
        CatalogEntry::MsTestDataRowAttribute,
        CopyInOrder,
        RuleTarget::Attribute(CatalogEntry::XunitInlineDataAttribute),
    ),
    attribute(
        RuleId::Msx202,
        CatalogEntry::MsTestDynamicDataAttribute,
        ArgumentPolicy::ExtractNamedInitializer {
            parameter: "dynamicDataSourceName",
            property: "DynamicDataDisplayNameDeclaringType",
            target_property: "MemberType",
        },
        RuleTarget::Attribute(CatalogEntry::XunitMemberDataAttribute),
    ),
    attribute(
        RuleId::Msx207,
        CatalogEntry::MsTestTestInitializeAttribute,
        ArgumentPolicy::SynthesizeConstructorBody,
        RuleTarget::Constructor,
    ),
    attribute(
        RuleId::Msx208,
        CatalogEntry::MsTestTestCleanupAttribute,
        ArgumentPolicy::SynthesizeDisposalBody,
        RuleTarget::Disposal(CatalogEntry::SystemIDisposable),
    ),
];

/// The assertion rule for `family.method` called with `argument_count`
/// arguments.
pub fn assertion_rule(
    family: AssertionFamily,
    method: &str,
    argument_count: usize,
) -> Option<&'static RewriteRule> {
    REWRITE_RULES.iter().find(|rule| match &rule.source {
        RuleSource::Assertion {
            family: f,
            method: m,
            arity,
            ..
        } => {
            *f == family
                && *m == method
                && arity.as_ref().is_none_or(|a| a.contains(&argument_count))
        }
        RuleSource::Attribute(_) => false,
    })
}

/// Whether `family.method` has a rule for any argument count.
pub fn has_assertion_rule(family: AssertionFamily, method: &str) -> bool {
    REWRITE_RULES.iter().any(|rule| {
        matches!(&rule.source, RuleSource::Assertion { family: f, method: m, .. } if *f == family && *m == method)
    })
}

/// The attribute rule for an attribute of exactly type `entry`.
pub fn attribute_rule(entry: CatalogEntry) -> Option<&'static RewriteRule> {
    REWRITE_RULES
        .iter()
        .find(|rule| rule.source == RuleSource::Attribute(entry))
}

/// Source attribute entries that can be rewritten for a kind.
pub fn attribute_entries(kind: AttributeKind) -> &'static [CatalogEntry] {
    match kind {
        AttributeKind::TestClass => &[CatalogEntry::MsTestTestClassAttribute],
        AttributeKind::TestMethod => &[
            CatalogEntry::MsTestTestMethodAttribute,
            CatalogEntry::MsTestDataTestMethodAttribute,
        ],
        AttributeKind::DataSource => &[
            CatalogEntry::MsTestDataRowAttribute,
            CatalogEntry::MsTestDynamicDataAttribute,
        ],
        AttributeKind::TestInitialize => &[CatalogEntry::MsTestTestInitializeAttribute],
        AttributeKind::TestCleanup => &[CatalogEntry::MsTestTestCleanupAttribute],
        AttributeKind::AssemblyInitialize
        | AttributeKind::AssemblyCleanup
        | AttributeKind::ClassInitialize
        | AttributeKind::ClassCleanup
        | AttributeKind::Parallelize => &[],
    }
}
