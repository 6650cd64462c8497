//! Source locations reported with findings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// Where a finding sits in a document.
///
/// `line` and `col` are 1-based; `col` counts chars. The byte span, when
/// present, indexes the printed document text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub col: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_start: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_end: Option<u64>,
}

impl Location {
    /// A location with no byte span, for findings on nodes the printer did
    /// not emit.
    pub fn new(file: impl Into<String>, line: u32, col: u32) -> Self {
        Location {
            file: file.into(),
            line,
            col,
            byte_start: None,
            byte_end: None,
        }
    }

    /// The location of `span` inside the printed `text` of `file`.
    pub fn from_span(file: impl Into<String>, text: &str, span: Span) -> Self {
        let offset = usize::try_from(span.start).unwrap_or(usize::MAX);
        let (line, col) = line_and_column(text, offset);
        Location {
            file: file.into(),
            line,
            col,
            byte_start: Some(span.start),
            byte_end: Some(span.end),
        }
    }
}

/// 1-based line and column of byte `offset`; offsets past the end clamp to
/// the end of `text`.
fn line_and_column(text: &str, offset: usize) -> (u32, u32) {
    let before = text.get(..offset.min(text.len())).unwrap_or(text);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |nl| nl + 1);
    let col = before[line_start..].chars().count() + 1;
    (
        u32::try_from(line).unwrap_or(u32::MAX),
        u32::try_from(col).unwrap_or(u32::MAX),
    )
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}
