//! Drive the classifier over a compiled unit and emit findings.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use testport_core::output::FindingInfo;
use testport_core::{Location, Span};
use testport_syntax::{Compilation, Document, NodeId};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::classify::{Classified, Classifier, Construct};
use crate::options::MigrationOptions;
use crate::rules::RuleId;

/// One recognized construct, reported under a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule: RuleId,
    /// Path of the document the finding belongs to.
    pub document: String,
    pub classified: Classified,
    pub location: Location,
}

impl Finding {
    pub fn node(&self) -> NodeId {
        self.classified.node
    }

    pub fn construct(&self) -> &Construct {
        &self.classified.construct
    }

    /// Byte span of the node in the rendered document.
    pub fn span(&self) -> Option<Span> {
        match (self.location.byte_start, self.location.byte_end) {
            (Some(start), Some(end)) => Some(Span::new(start, end)),
            _ => None,
        }
    }

    pub fn to_info(&self) -> FindingInfo {
        FindingInfo {
            rule_id: self.rule.as_str().to_string(),
            message: self.rule.descriptor().message.to_string(),
            construct: self.construct().to_string(),
            location: self.location.clone(),
            has_fix: self.rule.has_fix(),
        }
    }

    /// Deterministic output order: document, span start, rule id.
    pub fn output_order(&self, other: &Finding) -> Ordering {
        self.document
            .cmp(&other.document)
            .then(self.location.byte_start.cmp(&other.location.byte_start))
            .then(self.rule.cmp(&other.rule))
    }
}

/// Reports findings for the documents of one compiled unit.
pub struct Reporter<'c, 'o> {
    classifier: Classifier<'c, 'o>,
    options: &'c MigrationOptions,
}

impl<'c, 'o> Reporter<'c, 'o> {
    pub fn new(catalog: &'c Catalog<'o>, options: &'c MigrationOptions) -> Self {
        Reporter {
            classifier: Classifier::new(catalog),
            options,
        }
    }

    /// Findings of one document, in operation order.
    pub fn report_document(&self, document: &Document) -> Vec<Finding> {
        let rendered = document.render();
        let mut findings = Vec::new();
        for operation in document.operations() {
            for classified in self.classifier.classify(operation) {
                let rule = RuleId::for_construct(&classified.construct);
                if !self.options.is_enabled(rule) {
                    continue;
                }
                let location = match rendered.span(classified.node) {
                    Some(span) => Location::from_span(&document.path, &rendered.text, span),
                    None => {
                        warn!(
                            document = %document.path,
                            node = %classified.node,
                            "operation refers to a node outside the tree"
                        );
                        continue;
                    }
                };
                debug!(rule = %rule, construct = %classified.construct, at = %location, "finding");
                findings.push(Finding {
                    rule,
                    document: document.path.clone(),
                    classified,
                    location,
                });
            }
        }
        findings
    }
}

/// Report every document of `compilation`, sorted for output.
pub fn report_compilation(compilation: &Compilation, options: &MigrationOptions) -> Vec<Finding> {
    let catalog = Catalog::new(compilation);
    let reporter = Reporter::new(&catalog, options);
    let mut findings: Vec<Finding> = compilation
        .documents
        .iter()
        .flat_map(|document| reporter.report_document(document))
        .collect();
    findings.sort_by(Finding::output_order);
    info!(
        documents = compilation.documents.len(),
        findings = findings.len(),
        "analysis complete"
    );
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::UnitBuilder;

    fn unit() -> Compilation {
        let mut unit = UnitBuilder::new();
        unit.document("B.cs", |d| {
            d.using_mstest();
            d.class("Sample", &["TestClass"], |c| {
                c.method("Test", &["TestMethod"], |b| {
                    b.call("Assert", "IsTrue", &["false"]);
                });
            });
        });
        unit.document("A.cs", |d| {
            d.using_mstest();
            d.class("Other", &[], |c| {
                c.method("Run", &[], |b| {
                    b.call("Assert", "AreEqual", &["1", "2"]);
                });
            });
        });
        unit.build()
    }

    #[test]
    fn findings_are_sorted_by_document_then_position() {
        let findings = report_compilation(&unit(), &MigrationOptions::default());
        let summary: Vec<_> = findings
            .iter()
            .map(|f| (f.document.as_str(), f.rule.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("A.cs", "MSX100"),
                ("B.cs", "MSX200"),
                ("B.cs", "MSX201"),
                ("B.cs", "MSX100"),
            ]
        );
    }

    #[test]
    fn locations_point_at_the_node() {
        let compilation = unit();
        let findings = report_compilation(&compilation, &MigrationOptions::default());
        let call = &findings[0];
        let document = compilation.document("A.cs").unwrap();
        let text = document.text();
        let span = call.span().unwrap();
        assert_eq!(span.slice(&text), Some("Assert.AreEqual(1, 2)"));
        // using, class header, open brace, then the method line
        assert_eq!(call.location.line, 4);
        assert_eq!(call.location.col, 25);
    }

    #[test]
    fn disabled_rules_are_not_reported() {
        let mut options = MigrationOptions::default();
        options.disabled.insert(RuleId::Msx100);
        let findings = report_compilation(&unit(), &options);
        assert!(findings.iter().all(|f| f.rule != RuleId::Msx100));
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn finding_info_carries_descriptor_text() {
        let findings = report_compilation(&unit(), &MigrationOptions::default());
        let info = findings[0].to_info();
        assert_eq!(info.rule_id, "MSX100");
        assert_eq!(info.message, "Use xUnit equivalent");
        assert_eq!(info.construct, "Assert.AreEqual");
        assert!(info.has_fix);
    }
}
