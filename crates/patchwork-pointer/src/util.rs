//! Escaping and token-level helpers for JSON Pointer strings.

use crate::validate::validate_json_pointer;
use crate::JsonPointerError;

/// The reserved token addressing the (nonexistent) element after the last
/// element of an array.
pub const LAST_ELEMENT_MARKER: &str = "-";

/// Unescapes a JSON Pointer path component.
///
/// Per RFC 6901, `~1` is replaced with `/` and `~0` is replaced with `~`.
/// Any other use of `~` is rejected.
///
/// # Example
///
/// ```
/// use patchwork_pointer::unescape_component;
///
/// assert_eq!(unescape_component("a~0b").unwrap(), "a~b");
/// assert_eq!(unescape_component("c~1d").unwrap(), "c/d");
/// assert_eq!(unescape_component("~01").unwrap(), "~1");
/// assert!(unescape_component("a~2").is_err());
/// ```
pub fn unescape_component(component: &str) -> Result<String, JsonPointerError> {
    unescape(component).map_err(|offset| {
        JsonPointerError::syntax(
            component,
            format!("'~' at offset {offset} must be followed by '0' or '1'"),
        )
    })
}

/// Single left-to-right pass so that `~01` decodes to `~1` and not `/`.
/// On failure returns the byte offset of the stray `~`.
fn unescape(component: &str) -> Result<String, usize> {
    if !component.contains('~') {
        return Ok(component.to_string());
    }
    let mut out = String::with_capacity(component.len());
    let mut chars = component.char_indices();
    while let Some((offset, c)) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, '0')) => out.push('~'),
            Some((_, '1')) => out.push('/'),
            _ => return Err(offset),
        }
    }
    Ok(out)
}

/// Escapes a JSON Pointer path component.
///
/// Per RFC 6901, `~` is replaced with `~0` and `/` is replaced with `~1`.
///
/// # Example
///
/// ```
/// use patchwork_pointer::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// assert_eq!(escape_component("no-escapes"), "no-escapes");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    // Order matters: ~ must be escaped before /
    component.replace('~', "~0").replace('/', "~1")
}

/// Parse a JSON Pointer string into unescaped tokens.
///
/// - Empty string returns an empty vec (the root)
/// - The leading `/` is required and stripped
/// - Each component is unescaped
///
/// # Example
///
/// ```
/// use patchwork_pointer::parse_json_pointer;
///
/// assert_eq!(parse_json_pointer("").unwrap(), Vec::<String>::new());
/// assert_eq!(parse_json_pointer("/").unwrap(), vec![""]);
/// assert_eq!(parse_json_pointer("/a~0b/c~1d").unwrap(), vec!["a~b", "c/d"]);
/// assert!(parse_json_pointer("foo").is_err());
/// ```
pub fn parse_json_pointer(pointer: &str) -> Result<Vec<String>, JsonPointerError> {
    validate_json_pointer(pointer)?;
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    let mut tokens = Vec::new();
    let mut base = 1;
    for raw in pointer[1..].split('/') {
        let token = unescape(raw).map_err(|offset| {
            JsonPointerError::syntax(
                pointer,
                format!(
                    "'~' at offset {} must be followed by '0' or '1'",
                    base + offset
                ),
            )
        })?;
        tokens.push(token);
        base += raw.len() + 1;
    }
    Ok(tokens)
}

/// Format unescaped tokens into a JSON Pointer string.
///
/// Returns an empty string for the root path (no tokens).
///
/// # Example
///
/// ```
/// use patchwork_pointer::format_json_pointer;
///
/// assert_eq!(format_json_pointer::<&str>(&[]), "");
/// assert_eq!(format_json_pointer(&["foo", "bar"]), "/foo/bar");
/// assert_eq!(format_json_pointer(&["a/b"]), "/a~1b");
/// ```
pub fn format_json_pointer<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push('/');
        out.push_str(&escape_component(token.as_ref()));
    }
    out
}

/// Check if the tokens address the root value.
pub fn is_root<S: AsRef<str>>(tokens: &[S]) -> bool {
    tokens.is_empty()
}

/// Check if `parent` is a strict ancestor of `child`.
///
/// # Example
///
/// ```
/// use patchwork_pointer::is_child;
///
/// assert!(is_child(&["foo"], &["foo", "bar"]));
/// assert!(!is_child(&["foo", "bar"], &["foo"]));
/// assert!(!is_child(&["foo"], &["foo"]));
/// ```
pub fn is_child<S: AsRef<str>, T: AsRef<str>>(parent: &[S], child: &[T]) -> bool {
    if parent.len() >= child.len() {
        return false;
    }
    parent
        .iter()
        .zip(child)
        .all(|(p, c)| p.as_ref() == c.as_ref())
}

/// Check if a token is a valid array index: base-10, non-negative, no
/// leading zeros other than `"0"` itself.
///
/// # Example
///
/// ```
/// use patchwork_pointer::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("123"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("abc"));
/// ```
pub fn is_valid_index(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let bytes = token.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_digit())
}
