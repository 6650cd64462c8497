//! Shared test support utilities.
//!
//! Helpers that build single-document units and run the engine over them.

#![allow(dead_code)]

use difference::Changeset;
use testport_mstest::fixture::{BlockBuilder, ClassBuilder, UnitBuilder};
use testport_mstest::{apply_fixes, fix_compilation, report_compilation, DocumentFix, MigrationOptions, RuleId};
use testport_syntax::Compilation;

pub const MSTEST: &str = "Microsoft.VisualStudio.TestTools.UnitTesting";

/// A unit with one class `Test` whose method `Run` holds `build`'s
/// statements. The document imports xUnit only, so MSTest receivers must be
/// written fully qualified and rewritten calls print as `Assert.X`.
pub fn method_body(build: impl FnOnce(&mut BlockBuilder)) -> Compilation {
    let mut unit = UnitBuilder::new();
    unit.document("Tests.cs", |d| {
        d.using_xunit();
        d.class("Test", &[], |c| {
            c.method("Run", &[], build);
        });
    });
    unit.build()
}

/// A unit with one class `Test`, importing MSTest and `usings`.
pub fn test_class(
    usings: &[&str],
    attributes: &[&str],
    build: impl FnOnce(&mut ClassBuilder),
) -> Compilation {
    let mut unit = UnitBuilder::new();
    unit.document("Tests.cs", |d| {
        d.using_mstest();
        for using in usings {
            d.using(using);
        }
        d.class("Test", attributes, build);
    });
    unit.build()
}

/// Fully qualified MSTest type name.
pub fn mstest(name: &str) -> String {
    format!("{MSTEST}.{name}")
}

/// Fix every document with default options.
pub fn fix(compilation: &Compilation) -> Vec<DocumentFix> {
    fix_compilation(compilation, &MigrationOptions::default()).expect("fix-all failed")
}

/// Text of the only document after fix-all.
pub fn fixed_text(compilation: &Compilation) -> String {
    fix(compilation)
        .into_iter()
        .next()
        .expect("no documents")
        .document
        .text()
}

/// Run fix-all and fold the results back into the unit.
pub fn fixed_unit(compilation: &Compilation, options: &MigrationOptions) -> Compilation {
    let mut fixed = compilation.clone();
    let fixes = fix_compilation(compilation, options).expect("fix-all failed");
    apply_fixes(&mut fixed, fixes);
    fixed
}

/// Rule ids reported for the unit, in output order.
pub fn reported(compilation: &Compilation) -> Vec<RuleId> {
    report_compilation(compilation, &MigrationOptions::default())
        .iter()
        .map(|f| f.rule)
        .collect()
}

/// Assert two texts are equal, showing a line diff when they are not.
pub fn assert_same_text(expected: &str, actual: &str) {
    if expected != actual {
        let changeset = Changeset::new(expected, actual, "\n");
        panic!("texts differ:\n{}", changeset);
    }
}
