//! Setup and teardown methods: constructors and `IDisposable`.

mod support;

use support::{assert_same_text, fix, fixed_text, mstest, test_class, MSTEST};
use testport_mstest::fixture::UnitBuilder;
use testport_mstest::RuleId;

#[test]
fn whole_test_class_migrates() {
    let assert = mstest("Assert");
    let mut unit = UnitBuilder::new();
    unit.document("CalculatorTests.cs", |d| {
        d.using_mstest();
        d.using("System");
        d.using_xunit();
        d.class("CalculatorTests", &["TestClass"], |c| {
            c.indented_method("Setup", &["TestInitialize"], |b| {
                b.raw("calculator = new Calculator();");
            })
            .comment("// fresh calculator per test");
            c.indented_method("Teardown", &["TestCleanup"], |b| {
                b.raw("calculator = null;");
            });
            c.method("Adds", &["TestMethod"], |b| {
                b.call(&assert, "AreEqual", &["2", "calculator.Add(1, 1)"]);
            });
        });
    });
    let compilation = unit.build();

    let fixes = fix(&compilation);
    let applied: Vec<RuleId> = fixes[0].applied.iter().map(|f| f.rule).collect();
    assert_eq!(
        applied,
        vec![RuleId::Msx200, RuleId::Msx207, RuleId::Msx208, RuleId::Msx201, RuleId::Msx100]
    );
    assert!(fixes[0].skipped.is_empty());

    // both frameworks are imported, so the xUnit Assert stays qualified
    assert_same_text(
        &format!(
            "using {MSTEST};\n\
             using System;\n\
             using Xunit;\n\
             public class CalculatorTests : IDisposable\n\
             {{\n    \
                 // fresh calculator per test\n    \
                 public CalculatorTests()\n    \
                 {{\n        \
                     calculator = new Calculator();\n    \
                 }}\n    \
                 public void Dispose()\n    \
                 {{\n        \
                     calculator = null;\n    \
                 }}\n    \
                 [Fact]\n    \
                 public void Adds() {{ Xunit.Assert.Equal(2, calculator.Add(1, 1)); }}\n\
             }}\n"
        ),
        &fixes[0].document.text(),
    );
}

#[test]
fn initializer_scenario() {
    let compilation = test_class(&[], &[], |c| {
        c.method("A", &["TestInitialize"], |b| {
            b.raw("count = 0;");
        })
        .comment("// reset");
    });
    let text = fixed_text(&compilation);
    assert!(
        text.contains("    // reset\n    public Test()\n    {\n        count = 0;\n    }\n"),
        "{text}"
    );
    assert!(!text.contains("TestInitialize"), "{text}");
    assert!(!text.contains("void A()"), "{text}");
}

#[test]
fn cleanup_scenario() {
    let compilation = test_class(&[], &[], |c| {
        c.method("A", &["TestCleanup"], |b| {
            b.raw("count = 0;");
        });
    });
    let text = fixed_text(&compilation);
    assert!(text.contains("public class Test : System.IDisposable\n"), "{text}");
    assert!(
        text.contains("    public void Dispose()\n    {\n        count = 0;\n    }\n"),
        "{text}"
    );
}

#[test]
fn cleanup_keeps_existing_base_types() {
    let mut unit = UnitBuilder::new();
    unit.document("Tests.cs", |d| {
        d.using_mstest();
        d.using("System");
        d.class_with_bases("Test", &[], &["Fixture"], |c| {
            c.method("A", &["TestCleanup"], |_| {});
        });
    });
    let text = fixed_text(&unit.build());
    assert!(text.contains("public class Test : Fixture, IDisposable\n"), "{text}");
}

#[test]
fn refused_rewrites_leave_the_type_alone() {
    let compilation = test_class(&[], &[], |c| {
        c.method("A", &["TestInitialize"], |_| {});
        c.method("B", &["TestInitialize"], |_| {});
        c.constructor(|_| {});
        c.method("C", &["TestCleanup"], |_| {});
        c.method("Dispose", &[], |_| {});
    });
    let fixes = fix(&compilation);
    assert!(fixes[0].applied.is_empty());
    let reasons: Vec<&str> = fixes[0].skipped.iter().map(|(_, r)| r.as_str()).collect();
    assert_eq!(reasons.len(), 3);
    assert!(!fixes[0].changed());
}

#[test]
fn nested_types_are_handled_per_type() {
    let compilation = test_class(&[], &[], |c| {
        c.method("Outer", &["TestInitialize"], |_| {});
        c.class("Inner", &[], |c| {
            c.method("InnerSetup", &["TestInitialize"], |_| {});
        });
    });
    let text = fixed_text(&compilation);
    assert!(text.contains("public Test()"), "{text}");
    assert!(text.contains("public Inner()"), "{text}");
}
