//! JSON Pointer (RFC 6901) path resolution for JSON Patch.
//!
//! This crate turns a [JSON Pointer](https://tools.ietf.org/html/rfc6901)
//! string into a [`JsonPath`]: an ordered list of segments where every
//! segment is classified *both* as a possible object property and as a
//! possible array element. Which facet is actually used is decided later,
//! by whoever walks the path against a concrete tree.
//!
//! # Example
//!
//! ```
//! use patchwork_pointer::JsonPath;
//!
//! let path = JsonPath::parse("/users/0/name").unwrap();
//! assert_eq!(path.len(), 3);
//!
//! // "users" can only be a property
//! assert_eq!(path.property(0).name(), Some("users"));
//! assert!(!path.element(0).exists());
//!
//! // "0" is ambiguous: property named "0" or element at index 0
//! assert_eq!(path.property(1).name(), Some("0"));
//! assert_eq!(path.element(1).index(), Some(0));
//!
//! assert!(path.ends_at(2));
//! assert_eq!(path.to_string(), "/users/0/name");
//! ```

use thiserror::Error;

pub mod types;
pub use types::{ElementSegment, JsonPath, PathSegment, PropertySegment};

pub mod util;
pub use util::{
    escape_component, format_json_pointer, is_child, is_root, is_valid_index, parse_json_pointer,
    unescape_component, LAST_ELEMENT_MARKER,
};

pub mod validate;
pub use validate::{validate_json_pointer, validate_path, MAX_PATH_LENGTH, MAX_POINTER_LENGTH};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonPointerError {
    /// The pointer violates RFC 6901 syntax (missing leading `/`, or a `~`
    /// not followed by `0` or `1`).
    #[error("invalid JSON pointer \"{pointer}\": {reason}")]
    InvalidSyntax { pointer: String, reason: String },
    #[error("JSON pointer is longer than {MAX_POINTER_LENGTH} bytes")]
    PointerTooLong,
    #[error("JSON pointer has more than {MAX_PATH_LENGTH} segments")]
    PathTooLong,
    #[error("root path has no parent")]
    NoParent,
}

impl JsonPointerError {
    pub(crate) fn syntax(pointer: &str, reason: impl Into<String>) -> Self {
        JsonPointerError::InvalidSyntax {
            pointer: pointer.to_string(),
            reason: reason.into(),
        }
    }
}
