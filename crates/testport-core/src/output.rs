//! JSON output types and serialization for CLI responses.
//!
//! ## Design Principles
//!
//! 1. **Status first:** Every response has `status` as first field
//! 2. **Deterministic:** Same input -> same output (field order, array ordering)
//! 3. **Nullable vs absent:** absent field means "not applicable"
//! 4. **Versioned:** Schema version in response enables forward compatibility

use std::io::{self, Write};

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{OutputErrorCode, PortError};
use crate::span::ContentHash;
use crate::types::Location;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Rules
// ============================================================================

/// One entry of the rule table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleInfo {
    /// Stable rule id (`MSX###`).
    pub id: String,
    pub title: String,
    pub message: String,
    pub category: String,
    /// Default severity (`warning`).
    pub severity: String,
    /// Whether a rewrite is registered for the rule.
    pub has_fix: bool,
    /// Disabled through configuration.
    pub enabled: bool,
}

/// Response for `testport rules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesResponse {
    pub status: String,
    pub schema_version: String,
    pub rules: Vec<RuleInfo>,
}

impl RulesResponse {
    pub fn new(rules: Vec<RuleInfo>) -> Self {
        RulesResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            rules,
        }
    }
}

// ============================================================================
// Findings
// ============================================================================

/// A finding as rendered in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FindingInfo {
    pub rule_id: String,
    pub message: String,
    /// Short tag of the recognized construct (e.g. `assert.IsTrue`).
    pub construct: String,
    pub location: Location,
    pub has_fix: bool,
}

/// Per-rule counts in an analysis summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleCount {
    pub rule_id: String,
    pub count: usize,
}

/// Summary block of `testport analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyzeSummary {
    pub documents: usize,
    pub findings: usize,
    pub fixable: usize,
    pub by_rule: Vec<RuleCount>,
}

/// Response for `testport analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub status: String,
    pub schema_version: String,
    #[serde(serialize_with = "serialize_sorted_findings")]
    pub findings: Vec<FindingInfo>,
    pub summary: AnalyzeSummary,
}

impl AnalyzeResponse {
    pub fn new(findings: Vec<FindingInfo>, documents: usize) -> Self {
        let mut by_rule: Vec<RuleCount> = Vec::new();
        for finding in &findings {
            match by_rule.iter_mut().find(|c| c.rule_id == finding.rule_id) {
                Some(count) => count.count += 1,
                None => by_rule.push(RuleCount {
                    rule_id: finding.rule_id.clone(),
                    count: 1,
                }),
            }
        }
        by_rule.sort_by(|a, b| a.rule_id.cmp(&b.rule_id));

        let summary = AnalyzeSummary {
            documents,
            findings: findings.len(),
            fixable: findings.iter().filter(|f| f.has_fix).count(),
            by_rule,
        };
        AnalyzeResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            findings,
            summary,
        }
    }
}

// ============================================================================
// Fixes
// ============================================================================

/// A finding that was left open by a fix run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedFinding {
    pub finding: FindingInfo,
    pub reason: String,
}

/// Fix results for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFixResult {
    pub path: String,
    pub hash_before: ContentHash,
    pub hash_after: ContentHash,
    #[serde(serialize_with = "serialize_sorted_findings")]
    pub applied: Vec<FindingInfo>,
    pub skipped: Vec<SkippedFinding>,
    /// New document text (absent in dry-run mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Unified diff of the change (dry-run mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

/// Response for `testport fix`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixResponse {
    pub status: String,
    pub schema_version: String,
    pub dry_run: bool,
    pub documents: Vec<DocumentFixResult>,
    /// Path the edited unit was written to, when `--write` was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written_to: Option<String>,
}

impl FixResponse {
    pub fn new(documents: Vec<DocumentFixResult>, dry_run: bool) -> Self {
        FixResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            dry_run,
            documents,
            written_to: None,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error information for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    /// Create from a PortError.
    pub fn from_error(err: &PortError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let message = err.to_string();

        let details = match err {
            PortError::InvalidArguments { details, .. } => details.clone(),
            PortError::InvalidInput {
                file: Some(file), ..
            }
            | PortError::Rewrite {
                file: Some(file), ..
            } => Some(serde_json::json!({ "file": file })),
            PortError::Config {
                path: Some(path), ..
            } => Some(serde_json::json!({ "path": path })),
            _ => None,
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from a PortError.
    pub fn from_error(err: &PortError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

fn serialize_sorted_findings<S>(findings: &[FindingInfo], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut sorted: Vec<_> = findings.iter().collect();
    sorted.sort_by(|a, b| {
        a.location
            .file
            .cmp(&b.location.file)
            .then(a.location.byte_start.cmp(&b.location.byte_start))
            .then(a.rule_id.cmp(&b.rule_id))
    });
    sorted.serialize(serializer)
}

// ============================================================================
// Response Emission
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
///
/// This is the single output path for CLI, ensuring consistency.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}
