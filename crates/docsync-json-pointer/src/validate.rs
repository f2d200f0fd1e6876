//! Validation functions for JSON Pointer strings.

use crate::JsonPointerError;

/// Maximum allowed pointer string length.
const MAX_POINTER_LENGTH: usize = 1024;

/// Validate a JSON Pointer string.
///
/// # Errors
///
/// Returns [`JsonPointerError::InvalidPath`] if:
/// - The pointer is non-empty but doesn't start with `/`
/// - A `~` is not followed by `0` or `1`
///
/// Returns [`JsonPointerError::PointerTooLong`] if the pointer exceeds the
/// maximum length (1024 bytes).
///
/// # Example
///
/// ```
/// use docsync_json_pointer::validate_json_pointer;
///
/// validate_json_pointer("").unwrap();  // Root is valid
/// validate_json_pointer("/foo/bar").unwrap();  // Valid absolute pointer
/// validate_json_pointer("foo").unwrap_err();  // Missing leading /
/// validate_json_pointer("/a~2b").unwrap_err();  // Unknown escape
/// ```
pub fn validate_json_pointer(pointer: &str) -> Result<(), JsonPointerError> {
    if pointer.is_empty() {
        return Ok(());
    }
    if !pointer.starts_with('/') {
        return Err(JsonPointerError::InvalidPath(pointer.to_string()));
    }
    if pointer.len() > MAX_POINTER_LENGTH {
        return Err(JsonPointerError::PointerTooLong);
    }
    let mut bytes = pointer.bytes();
    while let Some(b) = bytes.next() {
        if b == b'~' && !matches!(bytes.next(), Some(b'0') | Some(b'1')) {
            return Err(JsonPointerError::InvalidPath(pointer.to_string()));
        }
    }
    Ok(())
}
