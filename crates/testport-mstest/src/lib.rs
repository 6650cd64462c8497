//! MSTest to xUnit migration rules.
//!
//! The engine runs over a compiled unit ([`Compilation`]) in four stages:
//!
//! - [`catalog`]: resolves the framework types the rules care about, once per
//!   unit
//! - [`classify`]: maps bound operations to canonical constructs
//!   (assertion calls, attribute applications, thrown assertion exceptions)
//! - [`report`]: turns constructs into findings under stable rule ids
//! - [`rewrite`] and [`fix`]: register edits per finding and apply all of a
//!   document's edits in one pass
//!
//! ```
//! use testport_mstest::fixture::UnitBuilder;
//! use testport_mstest::{fix_compilation, report_compilation, MigrationOptions};
//!
//! let mut unit = UnitBuilder::new();
//! unit.document("Tests.cs", |d| {
//!     d.using_mstest();
//!     d.class("Test", &[], |c| {
//!         c.method("Run", &[], |b| {
//!             b.call("Assert", "AreEqual", &["1", "2"]);
//!         });
//!     });
//! });
//! let compilation = unit.build();
//! let options = MigrationOptions::default();
//!
//! let findings = report_compilation(&compilation, &options);
//! assert_eq!(findings[0].rule.as_str(), "MSX100");
//!
//! let fixes = fix_compilation(&compilation, &options).unwrap();
//! assert!(fixes[0].document.text().contains("Xunit.Assert.Equal(1, 2);"));
//! ```
//!
//! [`Compilation`]: testport_syntax::Compilation

pub mod catalog;
pub mod classify;
mod error_bridges;
pub mod fix;
pub mod fixture;
pub mod options;
pub mod report;
pub mod rewrite;
pub mod rules;
pub mod session;

pub use catalog::{Catalog, CatalogEntry, FrameworkSymbol};
pub use classify::{AssertionFamily, AttributeKind, Classified, Classifier, Construct};
pub use fix::{apply_fixes, fix_compilation, fix_document, DocumentFix};
pub use options::MigrationOptions;
pub use report::{report_compilation, Finding, Reporter};
pub use rewrite::{NoEditReason, RewriteError, RewriteOutcome, RewriteResult, Rewriter};
pub use rules::{RuleDescriptor, RuleId, UnknownRuleId, DESCRIPTORS, REWRITE_RULES};
pub use session::EditSession;
