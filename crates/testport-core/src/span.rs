//! Byte spans of printed nodes and document content hashes.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a document's rendered text.
///
/// Fix results carry one hash before and one after the edit so a caller can
/// tell whether the text on disk is still the text that was analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
    pub fn compute(data: &[u8]) -> Self {
        ContentHash(hex::encode(Sha256::digest(data)))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `[start, end)` in bytes of rendered document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u64,
    pub end: u64,
}

impl Span {
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end, "inverted span {start}..{end}");
        Span { start, end }
    }

    /// The text under this span, or `None` when it falls outside `text` or
    /// splits a char.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        let start = usize::try_from(self.start).ok()?;
        let end = usize::try_from(self.end).ok()?;
        text.get(start..end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_hex_sha256() {
        let hash = ContentHash::compute(b"public class Test { }");
        assert_eq!(hash, ContentHash::compute(b"public class Test { }"));
        assert_ne!(hash, ContentHash::compute(b"public class Test : IDisposable { }"));
        assert_eq!(hash.0.len(), 64);
        assert!(hash.0.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn slices_printed_text() {
        let text = "Assert.IsTrue(x);";
        assert_eq!(Span::new(0, 6).slice(text), Some("Assert"));
        assert_eq!(Span::new(7, 13).slice(text), Some("IsTrue"));
        assert_eq!(Span::new(0, 100).slice(text), None);
    }

    #[test]
    fn slicing_inside_a_char_is_refused() {
        assert_eq!(Span::new(0, 1).slice("é"), None);
    }

    #[test]
    fn displays_as_a_range() {
        assert_eq!(Span::new(1, 4).to_string(), "1..4");
    }
}
