//! Reporting and fixing from many threads at once.

mod support;

use rayon::prelude::*;
use support::{fixed_unit, test_class};
use testport_mstest::fixture::UnitBuilder;
use testport_mstest::{
    fix_compilation, report_compilation, Catalog, DocumentFix, Finding, MigrationOptions, Reporter,
    Rewriter,
};
use testport_syntax::Compilation;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn engine_types_are_send_and_sync() {
    assert_send_sync::<Compilation>();
    assert_send_sync::<Catalog<'static>>();
    assert_send_sync::<Reporter<'static, 'static>>();
    assert_send_sync::<Rewriter<'static, 'static>>();
    assert_send_sync::<Finding>();
    assert_send_sync::<DocumentFix>();
    assert_send_sync::<MigrationOptions>();
}

fn unit(index: usize) -> Compilation {
    test_class(&[], &["TestClass"], |c| {
        let expected = index.to_string();
        c.method(&format!("Case{index}"), &["TestMethod"], |b| {
            b.call("Assert", "AreEqual", &[expected.as_str(), "actual"]);
        });
        c.method("Setup", &["TestInitialize"], |_| {});
    })
}

#[test]
fn independent_units_report_in_parallel() {
    let units: Vec<Compilation> = (0..32).map(unit).collect();
    let options = MigrationOptions::default();

    let sequential: Vec<Vec<Finding>> = units
        .iter()
        .map(|u| report_compilation(u, &options))
        .collect();
    let parallel: Vec<Vec<Finding>> = units
        .par_iter()
        .map(|u| report_compilation(u, &options))
        .collect();

    assert_eq!(sequential, parallel);
    assert!(parallel.iter().all(|findings| findings.len() == 4));
}

#[test]
fn one_catalog_serves_many_threads() {
    let mut unit = UnitBuilder::new();
    for index in 0..16 {
        unit.document(&format!("Tests{index}.cs"), |d| {
            d.using_mstest();
            d.class(&format!("Test{index}"), &[], |c| {
                c.method("Run", &["TestMethod"], |b| {
                    b.call("Assert", "IsTrue", &["ok"]);
                });
            });
        });
    }
    let compilation = unit.build();
    let options = MigrationOptions::default();
    let catalog = Catalog::new(&compilation);
    let reporter = Reporter::new(&catalog, &options);

    let counts: Vec<usize> = compilation
        .documents
        .par_iter()
        .map(|document| reporter.report_document(document).len())
        .collect();
    assert_eq!(counts, vec![2; 16]);
}

#[test]
fn fixes_in_parallel_match_sequential_fixes() {
    let units: Vec<Compilation> = (0..16).map(unit).collect();
    let options = MigrationOptions::default();

    let texts = |fixed: Vec<Compilation>| -> Vec<String> {
        fixed.iter().map(|c| c.documents[0].text()).collect()
    };
    let sequential = texts(units.iter().map(|u| fixed_unit(u, &options)).collect());
    let parallel = texts(units.par_iter().map(|u| fixed_unit(u, &options)).collect());
    assert_eq!(sequential, parallel);

    let fixes: Vec<Vec<DocumentFix>> = units
        .par_iter()
        .map(|u| fix_compilation(u, &options).unwrap())
        .collect();
    assert!(fixes.iter().all(|f| f[0].applied.len() == 4));
}
