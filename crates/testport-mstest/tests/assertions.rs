//! Assertion calls: every mapping of the rule table, end to end.

mod support;

use support::{fix, fixed_text, method_body, mstest};
use testport_mstest::fixture::UnitBuilder;
use testport_mstest::{report_compilation, MigrationOptions, RuleId};

/// `MSTest.<family>.<method>(<arguments>)` rewritten, as printed in the
/// method body.
fn rewritten(family: &str, method: &str, arguments: &[&str]) -> String {
    let receiver = mstest(family);
    let compilation = method_body(|b| {
        b.call(&receiver, method, arguments);
    });
    body_of(&fixed_text(&compilation))
}

fn rewritten_generic(family: &str, method: &str, type_arguments: &[&str], arguments: &[&str]) -> String {
    let receiver = mstest(family);
    let compilation = method_body(|b| {
        b.generic_call(&receiver, method, type_arguments, arguments);
    });
    body_of(&fixed_text(&compilation))
}

/// The statement between `{ ` and ` }` of the one-line `Run` method.
fn body_of(text: &str) -> String {
    let start = text.find("Run() { ").expect("Run method") + "Run() { ".len();
    let end = text[start..].find(" }").expect("end of body") + start;
    text[start..end].to_string()
}

mod assert_family {
    use super::*;

    #[test]
    fn boolean_and_null_checks() {
        assert_eq!(rewritten("Assert", "IsTrue", &["x"]), "Assert.True(x);");
        assert_eq!(rewritten("Assert", "IsFalse", &["x"]), "Assert.False(x);");
        assert_eq!(rewritten("Assert", "IsNotNull", &["x"]), "Assert.NotNull(x);");
        assert_eq!(rewritten("Assert", "IsNull", &["x"]), "Assert.Null(x);");
    }

    #[test]
    fn equality_keeps_argument_order() {
        assert_eq!(rewritten("Assert", "AreEqual", &["a", "b"]), "Assert.Equal(a, b);");
        assert_eq!(rewritten("Assert", "AreNotEqual", &["a", "b"]), "Assert.NotEqual(a, b);");
        assert_eq!(rewritten("Assert", "AreSame", &["a", "b"]), "Assert.Same(a, b);");
        assert_eq!(rewritten("Assert", "AreNotSame", &["a", "b"]), "Assert.NotSame(a, b);");
    }

    #[test]
    fn extra_arguments_follow_in_order() {
        assert_eq!(
            rewritten("Assert", "AreEqual", &["1.0", "x", "0.01"]),
            "Assert.Equal(1.0, x, 0.01);"
        );
    }

    #[test]
    fn is_true_scenario() {
        assert_eq!(rewritten("Assert", "IsTrue", &["false"]), "Assert.True(false);");
    }

    #[test]
    fn throws_keeps_the_exception_type() {
        assert_eq!(
            rewritten_generic(
                "Assert",
                "ThrowsException",
                &["InvalidOperationException"],
                &["() => Run()"]
            ),
            "Assert.Throws<InvalidOperationException>(() => Run());"
        );
        assert_eq!(
            rewritten_generic(
                "Assert",
                "ThrowsExceptionAsync",
                &["InvalidOperationException"],
                &["() => RunAsync()"]
            ),
            "Assert.ThrowsAsync<InvalidOperationException>(() => RunAsync());"
        );
    }

    #[test]
    fn instance_of_type_swaps_value_and_type() {
        assert_eq!(
            rewritten("Assert", "IsInstanceOfType", &["1", "typeof(int)"]),
            "Assert.IsType(typeof(int), 1);"
        );
        assert_eq!(
            rewritten("Assert", "IsNotInstanceOfType", &["x", "typeof(string)"]),
            "Assert.IsNotType(typeof(string), x);"
        );
    }

    #[test]
    fn generic_instance_of_type_takes_one_argument() {
        assert_eq!(
            rewritten_generic("Assert", "IsInstanceOfType", &["int"], &["1"]),
            "Assert.IsType<int>(1);"
        );
        assert_eq!(
            rewritten_generic("Assert", "IsNotInstanceOfType", &["int"], &["1"]),
            "Assert.IsNotType<int>(1);"
        );
    }

    #[test]
    fn named_expected_and_actual_keep_their_meaning() {
        assert_eq!(
            rewritten("Assert", "AreEqual", &["actual: x", "expected: 1"]),
            "Assert.Equal(1, x);"
        );
    }

    #[test]
    fn instance_of_type_with_a_message_is_not_fixed() {
        let receiver = mstest("Assert");
        let compilation = method_body(|b| {
            b.call(&receiver, "IsInstanceOfType", &["x", "typeof(int)", "\"m\""]);
        });
        let fixes = fix(&compilation);
        assert!(fixes[0].applied.is_empty());
        assert_eq!(fixes[0].skipped.len(), 1);
        assert_eq!(fixes[0].skipped[0].0.rule, RuleId::Msx100);
        assert!(!fixes[0].changed());
    }
}

mod string_assert_family {
    use super::*;

    #[test]
    fn substring_checks_swap_the_first_two_arguments() {
        assert_eq!(
            rewritten("StringAssert", "StartsWith", &["\"value\"", "\"v\""]),
            "Assert.StartsWith(\"v\", \"value\");"
        );
        assert_eq!(
            rewritten("StringAssert", "EndsWith", &["\"value\"", "\"v\""]),
            "Assert.EndsWith(\"v\", \"value\");"
        );
        assert_eq!(
            rewritten("StringAssert", "Contains", &["\"value\"", "\"alu\""]),
            "Assert.Contains(\"alu\", \"value\");"
        );
    }

    #[test]
    fn rest_arguments_stay_after_the_swap() {
        assert_eq!(
            rewritten("StringAssert", "Contains", &["s", "part", "comparison"]),
            "Assert.Contains(part, s, comparison);"
        );
    }

    #[test]
    fn named_substring_and_value_keep_their_meaning() {
        assert_eq!(
            rewritten("StringAssert", "Contains", &["substring: \"v\"", "value: \"value\""]),
            "Assert.Contains(\"v\", \"value\");"
        );
    }

    #[test]
    fn unmapped_methods_are_reported_only() {
        let receiver = mstest("StringAssert");
        let compilation = method_body(|b| {
            b.call(&receiver, "Matches", &["s", "pattern"]);
        });
        let findings = report_compilation(&compilation, &MigrationOptions::default());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, RuleId::Msx100);
        assert!(!fix(&compilation)[0].changed());
    }
}

mod collection_assert_family {
    use super::*;

    #[test]
    fn equality() {
        assert_eq!(
            rewritten("CollectionAssert", "AreEqual", &["expected", "actual"]),
            "Assert.Equal(expected, actual);"
        );
        assert_eq!(
            rewritten("CollectionAssert", "AreNotEqual", &["expected", "actual"]),
            "Assert.NotEqual(expected, actual);"
        );
    }

    #[test]
    fn membership_swaps_collection_and_element() {
        assert_eq!(
            rewritten("CollectionAssert", "Contains", &["new[]{1,2}", "1"]),
            "Assert.Contains(1, new[]{1,2});"
        );
        assert_eq!(
            rewritten("CollectionAssert", "DoesNotContain", &["items", "3"]),
            "Assert.DoesNotContain(3, items);"
        );
    }

    #[test]
    fn subsets_keep_their_order() {
        assert_eq!(
            rewritten("CollectionAssert", "IsSubsetOf", &["subset", "superset"]),
            "Assert.Contains(subset, superset);"
        );
        assert_eq!(
            rewritten("CollectionAssert", "IsNotSubsetOf", &["subset", "superset"]),
            "Assert.DoesNotContain(subset, superset);"
        );
    }
}

mod naming {
    use super::*;

    #[test]
    fn alias_of_the_xunit_assert_is_used() {
        let mut unit = UnitBuilder::new();
        unit.document("Tests.cs", |d| {
            d.using_mstest();
            d.using_alias("XAssert", "Xunit.Assert");
            d.class("Test", &[], |c| {
                c.method("Run", &[], |b| {
                    b.call("Assert", "IsNull", &["x"]);
                });
            });
        });
        let text = fixed_text(&unit.build());
        assert!(text.contains("{ XAssert.Null(x); }"), "{text}");
    }

    #[test]
    fn calls_inside_namespaces_resolve_through_outer_usings() {
        let mut unit = UnitBuilder::new();
        unit.document("Tests.cs", |d| {
            d.using_mstest();
            d.namespace("Tests", |d| {
                d.class("Test", &[], |c| {
                    c.method("Run", &[], |b| {
                        b.call("Assert", "AreEqual", &["1", "2"]);
                    });
                });
            });
        });
        let text = fixed_text(&unit.build());
        assert!(text.contains("{ Xunit.Assert.Equal(1, 2); }"), "{text}");
    }
}
