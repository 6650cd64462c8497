//! Map bound operations to canonical source constructs.

use std::fmt;

use serde::{Deserialize, Serialize};
use testport_syntax::semantic::{
    AttributeOperation, BoundArgument, InvocationOperation, Operation, ThrowOperation,
};
use testport_syntax::{NodeId, SyntaxKind};

use crate::catalog::{Catalog, CatalogEntry};

/// The MSTest type an assertion is called on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssertionFamily {
    Assert,
    StringAssert,
    CollectionAssert,
}

impl AssertionFamily {
    pub const ALL: [AssertionFamily; 3] = [
        AssertionFamily::Assert,
        AssertionFamily::StringAssert,
        AssertionFamily::CollectionAssert,
    ];

    pub fn entry(self) -> CatalogEntry {
        match self {
            AssertionFamily::Assert => CatalogEntry::MsTestAssert,
            AssertionFamily::StringAssert => CatalogEntry::MsTestStringAssert,
            AssertionFamily::CollectionAssert => CatalogEntry::MsTestCollectionAssert,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.entry().simple_name()
    }
}

/// Canonical attribute kinds.
///
/// `TestMethod` also covers `DataTestMethod` (which derives from it) and
/// `DataSource` covers every attribute implementing `ITestDataSource`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    TestClass,
    TestMethod,
    DataSource,
    AssemblyInitialize,
    AssemblyCleanup,
    ClassInitialize,
    ClassCleanup,
    TestInitialize,
    TestCleanup,
    Parallelize,
}

impl AttributeKind {
    /// Kinds matched with is-or-inherits-from, in reporting order.
    pub const INHERITED: [AttributeKind; 9] = [
        AttributeKind::Parallelize,
        AttributeKind::TestClass,
        AttributeKind::TestMethod,
        AttributeKind::AssemblyInitialize,
        AttributeKind::AssemblyCleanup,
        AttributeKind::ClassInitialize,
        AttributeKind::ClassCleanup,
        AttributeKind::TestInitialize,
        AttributeKind::TestCleanup,
    ];

    /// The catalog entry the kind is matched against.
    pub fn entry(self) -> CatalogEntry {
        match self {
            AttributeKind::TestClass => CatalogEntry::MsTestTestClassAttribute,
            AttributeKind::TestMethod => CatalogEntry::MsTestTestMethodAttribute,
            AttributeKind::DataSource => CatalogEntry::MsTestITestDataSource,
            AttributeKind::AssemblyInitialize => CatalogEntry::MsTestAssemblyInitializeAttribute,
            AttributeKind::AssemblyCleanup => CatalogEntry::MsTestAssemblyCleanupAttribute,
            AttributeKind::ClassInitialize => CatalogEntry::MsTestClassInitializeAttribute,
            AttributeKind::ClassCleanup => CatalogEntry::MsTestClassCleanupAttribute,
            AttributeKind::TestInitialize => CatalogEntry::MsTestTestInitializeAttribute,
            AttributeKind::TestCleanup => CatalogEntry::MsTestTestCleanupAttribute,
            AttributeKind::Parallelize => CatalogEntry::MsTestParallelizeAttribute,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttributeKind::TestClass => "TestClass",
            AttributeKind::TestMethod => "TestMethod",
            AttributeKind::DataSource => "DataSource",
            AttributeKind::AssemblyInitialize => "AssemblyInitialize",
            AttributeKind::AssemblyCleanup => "AssemblyCleanup",
            AttributeKind::ClassInitialize => "ClassInitialize",
            AttributeKind::ClassCleanup => "ClassCleanup",
            AttributeKind::TestInitialize => "TestInitialize",
            AttributeKind::TestCleanup => "TestCleanup",
            AttributeKind::Parallelize => "Parallelize",
        }
    }
}

/// A recognized source construct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Construct {
    AssertionCall {
        family: AssertionFamily,
        method: String,
    },
    AttributeApplication {
        attribute: AttributeKind,
    },
    ThrownAssertionException,
}

impl Construct {
    /// Syntax kind of the node a construct is recognized on.
    pub fn node_kind(&self) -> SyntaxKind {
        match self {
            Construct::AssertionCall { .. } => SyntaxKind::Invocation,
            Construct::AttributeApplication { .. } => SyntaxKind::Attribute,
            Construct::ThrownAssertionException => SyntaxKind::ThrowStatement,
        }
    }
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Construct::AssertionCall { family, method } => {
                write!(f, "{}.{}", family.as_str(), method)
            }
            Construct::AttributeApplication { attribute } => {
                write!(f, "[{}]", attribute.as_str())
            }
            Construct::ThrownAssertionException => f.write_str("throw UnitTestAssertException"),
        }
    }
}

/// One argument of a classified construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructArgument {
    pub syntax: NodeId,
    /// Name of the bound parameter, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

impl From<&BoundArgument> for ConstructArgument {
    fn from(argument: &BoundArgument) -> Self {
        ConstructArgument {
            syntax: argument.syntax,
            parameter: argument.parameter.clone(),
        }
    }
}

/// A construct together with the node it was recognized on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classified {
    pub construct: Construct,
    pub node: NodeId,
    #[serde(default)]
    pub arguments: Vec<ConstructArgument>,
}

/// Decides which constructs an operation matches.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'c, 'o> {
    catalog: &'c Catalog<'o>,
}

impl<'c, 'o> Classifier<'c, 'o> {
    pub fn new(catalog: &'c Catalog<'o>) -> Self {
        Classifier { catalog }
    }

    /// Every construct `operation` matches. Only attributes can match more
    /// than one.
    pub fn classify(&self, operation: &Operation) -> Vec<Classified> {
        match operation {
            Operation::Invocation(op) => self.classify_invocation(op).into_iter().collect(),
            Operation::Attribute(op) => self.classify_attribute(op),
            Operation::Throw(op) => self.classify_throw(op).into_iter().collect(),
        }
    }

    /// Assertion calls: the containing type must be one of the three MSTest
    /// assertion classes exactly.
    pub fn classify_invocation(&self, op: &InvocationOperation) -> Option<Classified> {
        let containing = op.target.containing_type?;
        let family = AssertionFamily::ALL
            .into_iter()
            .find(|family| self.catalog.is(containing, family.entry()))?;
        Some(Classified {
            construct: Construct::AssertionCall {
                family,
                method: op.target.name.clone(),
            },
            node: op.syntax,
            arguments: op.arguments.iter().map(ConstructArgument::from).collect(),
        })
    }

    pub fn classify_attribute(&self, op: &AttributeOperation) -> Vec<Classified> {
        let Some(ty) = op.attribute_type else {
            return Vec::new();
        };
        let mut kinds = Vec::new();
        if self.catalog.is_or_implements(ty, CatalogEntry::MsTestITestDataSource) {
            kinds.push(AttributeKind::DataSource);
        }
        kinds.extend(
            AttributeKind::INHERITED
                .into_iter()
                .filter(|kind| self.catalog.is_or_inherits_from(ty, kind.entry())),
        );
        kinds
            .into_iter()
            .map(|attribute| Classified {
                construct: Construct::AttributeApplication { attribute },
                node: op.syntax,
                arguments: op.arguments.iter().map(ConstructArgument::from).collect(),
            })
            .collect()
    }

    /// Throws whose static type, before implicit conversions, derives from
    /// `UnitTestAssertException`.
    pub fn classify_throw(&self, op: &ThrowOperation) -> Option<Classified> {
        let thrown = op.exception.as_ref()?.strip_implicit_conversions().ty()?;
        if !self
            .catalog
            .is_or_inherits_from(thrown, CatalogEntry::MsTestUnitTestAssertException)
        {
            return None;
        }
        Some(Classified {
            construct: Construct::ThrownAssertionException,
            node: op.syntax,
            arguments: Vec::new(),
        })
    }
}
