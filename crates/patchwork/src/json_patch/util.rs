//! Utility functions for JSON Patch documents.

use patchwork_pointer::{parse_json_pointer, JsonPath};

use super::types::{PatchDocument, PatchInstruction};

// ── Path matcher ───────────────────────────────────────────────────────────

/// Creates a closure that returns `true` if an instruction's `path` lies at
/// or under `prefix`.
///
/// Instructions whose path does not parse never match.
///
/// # Example
///
/// ```
/// use patchwork::json_patch::{util::matcher, PatchInstruction};
/// use patchwork_pointer::JsonPath;
/// use serde_json::json;
///
/// let prefix = JsonPath::parse("/foo").unwrap();
/// let is_under_foo = matcher(&prefix);
///
/// assert!(is_under_foo(&PatchInstruction::add("/foo/bar", json!(1))));
/// assert!(!is_under_foo(&PatchInstruction::add("/baz", json!(2))));
/// ```
pub fn matcher(prefix: &JsonPath) -> impl Fn(&PatchInstruction) -> bool + '_ {
    move |instruction: &PatchInstruction| match parse_json_pointer(instruction.path()) {
        Ok(tokens) => path_starts_with(&tokens, prefix),
        Err(_) => false,
    }
}

/// Returns `true` if `prefix` is equal to or an ancestor of `path`.
pub fn path_starts_with<S: AsRef<str>>(path: &[S], prefix: &JsonPath) -> bool {
    path.len() >= prefix.len()
        && path
            .iter()
            .zip(prefix.tokens())
            .all(|(token, expected)| token.as_ref() == expected)
}

impl PatchDocument {
    /// The instructions whose `path` lies at or under `prefix`, in order.
    pub fn filter_under(&self, prefix: &JsonPath) -> PatchDocument {
        let is_under = matcher(prefix);
        self.iter().filter(|i| is_under(*i)).cloned().collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
