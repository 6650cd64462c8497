//! Unified diff generation for fix previews.

use difference::{Changeset, Difference};

/// Generate a unified diff between two versions of one document.
///
/// The whole document is emitted as a single hunk. Returns an empty string
/// when the texts are identical.
pub fn unified_diff(path: &str, old: &str, new: &str) -> String {
    if old == new {
        return String::new();
    }

    let changeset = Changeset::new(old, new, "\n");

    let mut diff = String::new();
    diff.push_str(&format!("--- a/{}\n", path));
    diff.push_str(&format!("+++ b/{}\n", path));
    diff.push_str(&format!(
        "@@ -1,{} +1,{} @@\n",
        line_count(old),
        line_count(new)
    ));

    for chunk in &changeset.diffs {
        let (prefix, text) = match chunk {
            Difference::Same(text) => (' ', text),
            Difference::Rem(text) => ('-', text),
            Difference::Add(text) => ('+', text),
        };
        for line in text.split('\n') {
            diff.push(prefix);
            diff.push_str(line);
            diff.push('\n');
        }
    }

    diff
}

fn line_count(text: &str) -> usize {
    text.lines().count()
}
