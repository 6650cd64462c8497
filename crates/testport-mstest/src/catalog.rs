//! Canonical identities of the framework types the engine cares about.
//!
//! A [`Catalog`] is built once per compiled unit. Each [`CatalogEntry`] is
//! resolved lazily against the unit's [`SymbolOracle`] on first use and then
//! memoized; a name the unit does not know resolves to `None`, which is a
//! normal state (the unit may not reference xUnit yet, or may be a project
//! without MSTest at all).

use std::fmt;
use std::sync::OnceLock;

use testport_syntax::semantic::{base_chain, SymbolOracle, TypeHandle};

/// Namespace of every MSTest type in the catalog.
pub const MSTEST_NAMESPACE: &str = "Microsoft.VisualStudio.TestTools.UnitTesting";

/// Namespace of every xUnit type in the catalog.
pub const XUNIT_NAMESPACE: &str = "Xunit";

macro_rules! catalog_entries {
    ($( $variant:ident => $name:expr ),* $(,)?) => {
        /// Logical name of a framework type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum CatalogEntry {
            $( $variant, )*
        }

        impl CatalogEntry {
            /// Every entry, in declaration order.
            pub const ALL: &'static [CatalogEntry] = &[ $( CatalogEntry::$variant, )* ];

            /// Fully-qualified metadata name.
            pub fn metadata_name(self) -> &'static str {
                match self {
                    $( CatalogEntry::$variant => $name, )*
                }
            }
        }
    };
}

catalog_entries! {
    // MSTest
    MsTestAssert => "Microsoft.VisualStudio.TestTools.UnitTesting.Assert",
    MsTestStringAssert => "Microsoft.VisualStudio.TestTools.UnitTesting.StringAssert",
    MsTestCollectionAssert => "Microsoft.VisualStudio.TestTools.UnitTesting.CollectionAssert",
    MsTestTestClassAttribute => "Microsoft.VisualStudio.TestTools.UnitTesting.TestClassAttribute",
    MsTestTestMethodAttribute => "Microsoft.VisualStudio.TestTools.UnitTesting.TestMethodAttribute",
    MsTestDataTestMethodAttribute => "Microsoft.VisualStudio.TestTools.UnitTesting.DataTestMethodAttribute",
    MsTestDataRowAttribute => "Microsoft.VisualStudio.TestTools.UnitTesting.DataRowAttribute",
    MsTestDynamicDataAttribute => "Microsoft.VisualStudio.TestTools.UnitTesting.DynamicDataAttribute",
    MsTestAssemblyInitializeAttribute => "Microsoft.VisualStudio.TestTools.UnitTesting.AssemblyInitializeAttribute",
    MsTestAssemblyCleanupAttribute => "Microsoft.VisualStudio.TestTools.UnitTesting.AssemblyCleanupAttribute",
    MsTestClassInitializeAttribute => "Microsoft.VisualStudio.TestTools.UnitTesting.ClassInitializeAttribute",
    MsTestClassCleanupAttribute => "Microsoft.VisualStudio.TestTools.UnitTesting.ClassCleanupAttribute",
    MsTestTestInitializeAttribute => "Microsoft.VisualStudio.TestTools.UnitTesting.TestInitializeAttribute",
    MsTestTestCleanupAttribute => "Microsoft.VisualStudio.TestTools.UnitTesting.TestCleanupAttribute",
    MsTestClassCleanupExecutionAttribute => "Microsoft.VisualStudio.TestTools.UnitTesting.ClassCleanupExecutionAttribute",
    MsTestParallelizeAttribute => "Microsoft.VisualStudio.TestTools.UnitTesting.ParallelizeAttribute",
    MsTestUnitTestAssertException => "Microsoft.VisualStudio.TestTools.UnitTesting.UnitTestAssertException",
    MsTestITestDataSource => "Microsoft.VisualStudio.TestTools.UnitTesting.ITestDataSource",
    // xUnit
    XunitAssert => "Xunit.Assert",
    XunitFactAttribute => "Xunit.FactAttribute",
    XunitTheoryAttribute => "Xunit.TheoryAttribute",
    XunitInlineDataAttribute => "Xunit.InlineDataAttribute",
    XunitMemberDataAttribute => "Xunit.MemberDataAttribute",
    // platform
    SystemIDisposable => "System.IDisposable",
}

impl CatalogEntry {
    /// Last segment of the metadata name, without generic arity.
    pub fn simple_name(self) -> &'static str {
        let name = self.metadata_name();
        let simple = name.rsplit('.').next().unwrap_or(name);
        simple.split('`').next().unwrap_or(simple)
    }

    /// Number of generic parameters (the `` `N `` suffix of the metadata name).
    pub fn arity(self) -> u32 {
        self.metadata_name()
            .rsplit_once('`')
            .and_then(|(_, n)| n.parse().ok())
            .unwrap_or(0)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.metadata_name())
    }
}

/// A resolved framework type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameworkSymbol {
    pub entry: CatalogEntry,
    pub handle: TypeHandle,
}

impl FrameworkSymbol {
    pub fn metadata_name(&self) -> &'static str {
        self.entry.metadata_name()
    }

    pub fn simple_name(&self) -> &'static str {
        self.entry.simple_name()
    }

    pub fn arity(&self) -> u32 {
        self.entry.arity()
    }
}

/// Per-unit lookup table of framework symbols.
pub struct Catalog<'o> {
    oracle: &'o dyn SymbolOracle,
    slots: Vec<OnceLock<Option<FrameworkSymbol>>>,
}

impl<'o> Catalog<'o> {
    pub fn new(oracle: &'o dyn SymbolOracle) -> Self {
        Catalog {
            oracle,
            slots: CatalogEntry::ALL.iter().map(|_| OnceLock::new()).collect(),
        }
    }

    pub fn oracle(&self) -> &'o dyn SymbolOracle {
        self.oracle
    }

    /// The resolved symbol for `entry`, if the unit knows it.
    pub fn get(&self, entry: CatalogEntry) -> Option<&FrameworkSymbol> {
        self.slots[entry.index()]
            .get_or_init(|| {
                self.oracle
                    .resolve(entry.metadata_name())
                    .map(|handle| FrameworkSymbol { entry, handle })
            })
            .as_ref()
    }

    pub fn handle(&self, entry: CatalogEntry) -> Option<TypeHandle> {
        self.get(entry).map(|s| s.handle)
    }

    /// Exact identity.
    pub fn is(&self, ty: TypeHandle, entry: CatalogEntry) -> bool {
        self.handle(entry) == Some(ty)
    }

    /// `ty` is `entry` or derives from it.
    pub fn is_or_inherits_from(&self, ty: TypeHandle, entry: CatalogEntry) -> bool {
        match self.handle(entry) {
            Some(target) => base_chain(self.oracle, ty).contains(&target),
            None => false,
        }
    }

    /// `ty` is `entry` or implements it (directly or through a base type).
    pub fn is_or_implements(&self, ty: TypeHandle, entry: CatalogEntry) -> bool {
        match self.handle(entry) {
            Some(target) => ty == target || self.oracle.all_interfaces(ty).contains(&target),
            None => false,
        }
    }

    /// Number of entries resolved so far.
    pub fn resolved_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.get().is_some()).count()
    }
}

impl fmt::Debug for Catalog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("resolved", &self.resolved_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testport_syntax::semantic::{MetadataTable, TypeDefinition};

    fn table() -> MetadataTable {
        MetadataTable::try_from(vec![
            TypeDefinition::class(CatalogEntry::MsTestAssert.metadata_name()),
            TypeDefinition::class(CatalogEntry::MsTestTestMethodAttribute.metadata_name()),
            TypeDefinition::class(CatalogEntry::MsTestDataTestMethodAttribute.metadata_name())
                .with_base(CatalogEntry::MsTestTestMethodAttribute.metadata_name()),
            TypeDefinition::interface(CatalogEntry::MsTestITestDataSource.metadata_name()),
            TypeDefinition::class(CatalogEntry::MsTestDataRowAttribute.metadata_name())
                .implementing(CatalogEntry::MsTestITestDataSource.metadata_name()),
            TypeDefinition::class("User.MyDataRow")
                .with_base(CatalogEntry::MsTestDataRowAttribute.metadata_name()),
        ])
        .unwrap()
    }

    #[test]
    fn every_entry_has_a_unique_name() {
        let mut names: Vec<_> = CatalogEntry::ALL.iter().map(|e| e.metadata_name()).collect();
        assert_eq!(names.len(), 24);
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 24);
    }

    #[test]
    fn simple_name_and_arity() {
        assert_eq!(CatalogEntry::XunitFactAttribute.simple_name(), "FactAttribute");
        assert_eq!(CatalogEntry::SystemIDisposable.simple_name(), "IDisposable");
        assert_eq!(CatalogEntry::XunitAssert.arity(), 0);
    }

    #[test]
    fn unknown_names_resolve_to_none() {
        let table = table();
        let catalog = Catalog::new(&table);
        assert!(catalog.get(CatalogEntry::XunitAssert).is_none());
        assert!(catalog.get(CatalogEntry::MsTestAssert).is_some());
    }

    #[test]
    fn resolution_is_memoized() {
        let table = table();
        let catalog = Catalog::new(&table);
        assert_eq!(catalog.resolved_count(), 0);
        let first = catalog.handle(CatalogEntry::MsTestAssert);
        let second = catalog.handle(CatalogEntry::MsTestAssert);
        catalog.get(CatalogEntry::XunitAssert);
        assert_eq!(first, second);
        assert_eq!(catalog.resolved_count(), 2);
    }

    #[test]
    fn hierarchy_policies() {
        let table = table();
        let catalog = Catalog::new(&table);
        let data_test_method = table
            .resolve(CatalogEntry::MsTestDataTestMethodAttribute.metadata_name())
            .unwrap();
        let user_row = table.resolve("User.MyDataRow").unwrap();

        assert!(catalog.is_or_inherits_from(data_test_method, CatalogEntry::MsTestTestMethodAttribute));
        assert!(!catalog.is(data_test_method, CatalogEntry::MsTestTestMethodAttribute));
        assert!(catalog.is_or_implements(user_row, CatalogEntry::MsTestITestDataSource));
        assert!(!catalog.is_or_implements(user_row, CatalogEntry::XunitAssert));
    }

    #[test]
    fn catalog_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Catalog<'static>>();
    }
}
