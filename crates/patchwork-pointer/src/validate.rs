//! Validation functions for JSON Pointer.

use crate::JsonPointerError;

/// Maximum allowed pointer string length, in bytes.
pub const MAX_POINTER_LENGTH: usize = 1024;

/// Maximum allowed path depth.
pub const MAX_PATH_LENGTH: usize = 256;

/// Validate the shape of a JSON Pointer string.
///
/// Escape sequences are checked when the pointer is parsed.
///
/// # Errors
///
/// Returns an error if:
/// - The pointer is non-empty but doesn't start with `/`
/// - The pointer exceeds [`MAX_POINTER_LENGTH`]
///
/// # Example
///
/// ```
/// use patchwork_pointer::validate_json_pointer;
///
/// validate_json_pointer("").unwrap();  // Root is valid
/// validate_json_pointer("/foo/bar").unwrap();
/// validate_json_pointer("foo").unwrap_err();  // Missing leading /
/// ```
pub fn validate_json_pointer(pointer: &str) -> Result<(), JsonPointerError> {
    if pointer.is_empty() {
        return Ok(());
    }
    if !pointer.starts_with('/') {
        return Err(JsonPointerError::syntax(
            pointer,
            "a non-empty pointer must start with '/'",
        ));
    }
    if pointer.len() > MAX_POINTER_LENGTH {
        return Err(JsonPointerError::PointerTooLong);
    }
    Ok(())
}

/// Validate a path depth.
///
/// # Example
///
/// ```
/// use patchwork_pointer::validate_path;
///
/// validate_path(&["foo".to_string(), "bar".to_string()]).unwrap();
/// validate_path(&(0..300).map(|i| i.to_string()).collect::<Vec<_>>()).unwrap_err();
/// ```
pub fn validate_path<S: AsRef<str>>(tokens: &[S]) -> Result<(), JsonPointerError> {
    if tokens.len() > MAX_PATH_LENGTH {
        return Err(JsonPointerError::PathTooLong);
    }
    Ok(())
}
