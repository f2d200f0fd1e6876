//! JSON Pointer (RFC 6901) addressing over `serde_json::Value`.
//!
//! Pointers are strings such as `/user/name` or `/items/0`. The empty string
//! addresses the root. Inside a key, `~` is written `~0` and `/` is written
//! `~1`.
//!
//! # Example
//!
//! ```
//! use docsync_json_pointer::{get, has, set, walk};
//! use serde_json::json;
//!
//! let mut doc = json!({"user": {"name": "Ann"}});
//! assert!(has(&doc, "/user/name").unwrap());
//! assert_eq!(get(&doc, "/user/name").unwrap(), Some(&json!("Ann")));
//!
//! // Intermediate containers are created on demand
//! set(&mut doc, "/user/tags/0", json!("admin")).unwrap();
//! assert_eq!(doc, json!({"user": {"name": "Ann", "tags": ["admin"]}}));
//!
//! let mut leaves = Vec::new();
//! walk(&doc, |value, pointer| leaves.push((pointer.to_string(), value.clone())));
//! assert_eq!(leaves[1], ("/user/tags/0".to_string(), json!("admin")));
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

pub mod validate;
pub use validate::validate_json_pointer;

mod walk;
pub use walk::walk;

/// A step in a JSON Pointer path: an object key or an array index.
pub type PathStep = String;

/// A parsed JSON Pointer path.
pub type Path = Vec<PathStep>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonPointerError {
    #[error("invalid JSON pointer: {0:?}")]
    InvalidPath(String),
    #[error("POINTER_TOO_LONG")]
    PointerTooLong,
    #[error("INVALID_INDEX")]
    InvalidIndex,
    #[error("NOT_CONTAINER")]
    NotContainer,
}

/// Decode one pointer component: `~1` becomes `/`, then `~0` becomes `~`.
///
/// ```
/// use docsync_json_pointer::unescape_component;
///
/// assert_eq!(unescape_component("home~1ann"), "home/ann");
/// assert_eq!(unescape_component("x~0bind"), "x~bind");
/// assert_eq!(unescape_component("~01"), "~1");
/// ```
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_owned();
    }
    component.replace("~1", "/").replace("~0", "~")
}

/// Encode a data key as a pointer component, the inverse of
/// [`unescape_component`].
///
/// ```
/// use docsync_json_pointer::escape_component;
///
/// assert_eq!(escape_component("home/ann"), "home~1ann");
/// assert_eq!(escape_component("~1"), "~01");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains(['/', '~']) {
        return component.to_owned();
    }
    // `~` first, or the `~` introduced for `/` would be doubled
    component.replace('~', "~0").replace('/', "~1")
}

/// Parse a JSON Pointer string into path components.
///
/// - Empty string returns empty vec (the root)
/// - The leading `/` is stripped
/// - Each component is unescaped
///
/// # Errors
///
/// Fails with [`JsonPointerError::InvalidPath`] when the pointer does not
/// pass [`validate_json_pointer`].
///
/// # Example
///
/// ```
/// use docsync_json_pointer::parse_json_pointer;
///
/// assert_eq!(parse_json_pointer("").unwrap(), Vec::<String>::new());
/// assert_eq!(parse_json_pointer("/").unwrap(), vec![""]);
/// assert_eq!(parse_json_pointer("/foo/bar").unwrap(), vec!["foo", "bar"]);
/// assert_eq!(parse_json_pointer("/a~0b/c~1d").unwrap(), vec!["a~b", "c/d"]);
/// assert!(parse_json_pointer("foo").is_err());
/// ```
pub fn parse_json_pointer(pointer: &str) -> Result<Path, JsonPointerError> {
    validate_json_pointer(pointer)?;
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    Ok(pointer[1..].split('/').map(unescape_component).collect())
}

/// Format path components into a JSON Pointer string.
///
/// Returns an empty string for the root path (empty components).
///
/// # Example
///
/// ```
/// use docsync_json_pointer::format_json_pointer;
///
/// assert_eq!(format_json_pointer(&[]), "");
/// assert_eq!(format_json_pointer(&["foo".to_string()]), "/foo");
/// assert_eq!(format_json_pointer(&["a/b".to_string(), "0".to_string()]), "/a~1b/0");
/// ```
pub fn format_json_pointer(path: &[String]) -> String {
    let mut out = String::new();
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

/// Whether `step` is a canonical array index: ASCII digits with no leading
/// zero. `-` is not an index here; [`set`] treats it separately.
///
/// ```
/// use docsync_json_pointer::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("42"));
/// assert!(!is_valid_index("007"));
/// assert!(!is_valid_index("-"));
/// assert!(!is_valid_index("name"));
/// ```
pub fn is_valid_index(step: &str) -> bool {
    match step.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        digits => digits.iter().all(u8::is_ascii_digit),
    }
}

/// Get a value from a JSON document by parsed path.
///
/// Returns `None` if any step is missing or steps into a scalar.
pub fn get_path<'a>(val: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = val;
    for path_step in path {
        current = match current {
            Value::Array(arr) => {
                if !is_valid_index(path_step) {
                    return None;
                }
                arr.get(path_step.parse::<usize>().ok()?)?
            }
            Value::Object(map) => map.get(path_step)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Get a mutable reference to a value by parsed path.
pub fn get_path_mut<'a>(val: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    let mut current = val;
    for path_step in path {
        current = match current {
            Value::Array(arr) => {
                if !is_valid_index(path_step) {
                    return None;
                }
                arr.get_mut(path_step.parse::<usize>().ok()?)?
            }
            Value::Object(map) => map.get_mut(path_step)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Get a value from a JSON document by pointer.
///
/// Missing locations are `Ok(None)`; only a malformed pointer is an error.
///
/// # Example
///
/// ```
/// use docsync_json_pointer::get;
/// use serde_json::json;
///
/// let doc = json!({"foo": {"bar": 42}});
/// assert_eq!(get(&doc, "/foo/bar").unwrap(), Some(&json!(42)));
/// assert_eq!(get(&doc, "/foo/bar/baz").unwrap(), None);
/// assert!(get(&doc, "foo").is_err());
/// ```
pub fn get<'a>(val: &'a Value, pointer: &str) -> Result<Option<&'a Value>, JsonPointerError> {
    let path = parse_json_pointer(pointer)?;
    Ok(get_path(val, &path))
}

/// Mutable counterpart of [`get`].
pub fn get_mut<'a>(
    val: &'a mut Value,
    pointer: &str,
) -> Result<Option<&'a mut Value>, JsonPointerError> {
    let path = parse_json_pointer(pointer)?;
    Ok(get_path_mut(val, &path))
}

/// Check whether every step of `pointer` resolves inside `val`.
///
/// An explicit `null` counts as present.
///
/// # Example
///
/// ```
/// use docsync_json_pointer::has;
/// use serde_json::json;
///
/// let doc = json!({"a": null, "b": [1]});
/// assert!(has(&doc, "/a").unwrap());
/// assert!(has(&doc, "/b/0").unwrap());
/// assert!(!has(&doc, "/b/1").unwrap());
/// assert!(!has(&doc, "/a/x").unwrap());
/// ```
pub fn has(val: &Value, pointer: &str) -> Result<bool, JsonPointerError> {
    Ok(get(val, pointer)?.is_some())
}

/// Assign `value` at `pointer`, creating intermediate containers.
///
/// Named steps create objects, numeric steps (and `-`) create arrays. A `-`
/// step appends to an array and an index past the end pads with `null`, up
/// to [`MAX_INDEX_GAP`] slots.
/// Setting the root pointer `""` replaces the whole document. A `null`
/// standing where a container is needed is replaced by one.
///
/// # Errors
///
/// - [`JsonPointerError::InvalidPath`] for a malformed pointer
/// - [`JsonPointerError::InvalidIndex`] for a non-numeric step into an array,
///   or an index more than [`MAX_INDEX_GAP`] past the end
/// - [`JsonPointerError::NotContainer`] when a step crosses a scalar
///
/// # Example
///
/// ```
/// use docsync_json_pointer::set;
/// use serde_json::json;
///
/// let mut doc = json!({});
/// set(&mut doc, "/a/b", json!(1)).unwrap();
/// set(&mut doc, "/list/-", json!("x")).unwrap();
/// assert_eq!(doc, json!({"a": {"b": 1}, "list": ["x"]}));
/// ```
pub fn set(val: &mut Value, pointer: &str, value: Value) -> Result<(), JsonPointerError> {
    let path = parse_json_pointer(pointer)?;
    set_path(val, &path, value)
}

/// [`set`] over an already parsed path.
pub fn set_path(val: &mut Value, path: &[String], value: Value) -> Result<(), JsonPointerError> {
    let Some((last, parents)) = path.split_last() else {
        *val = value;
        return Ok(());
    };
    let mut current = val;
    for path_step in parents {
        current = child_or_insert(current, path_step)?;
    }
    let slot = child_or_insert(current, last)?;
    *slot = value;
    Ok(())
}

/// How far past the end of an array [`set`] may pad with `null`.
pub const MAX_INDEX_GAP: usize = 1024;

/// Empty container suited to hold `path_step`.
fn container_for(path_step: &str) -> Value {
    if path_step == "-" || is_valid_index(path_step) {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

fn child_or_insert<'a>(
    container: &'a mut Value,
    path_step: &str,
) -> Result<&'a mut Value, JsonPointerError> {
    if container.is_null() {
        *container = container_for(path_step);
    }
    match container {
        Value::Object(map) => Ok(map.entry(path_step.to_string()).or_insert(Value::Null)),
        Value::Array(arr) => {
            let idx = if path_step == "-" {
                arr.len()
            } else if is_valid_index(path_step) {
                path_step
                    .parse::<usize>()
                    .map_err(|_| JsonPointerError::InvalidIndex)?
            } else {
                return Err(JsonPointerError::InvalidIndex);
            };
            if idx.saturating_sub(arr.len()) > MAX_INDEX_GAP {
                return Err(JsonPointerError::InvalidIndex);
            }
            if idx >= arr.len() {
                arr.resize(idx + 1, Value::Null);
            }
            Ok(&mut arr[idx])
        }
        _ => Err(JsonPointerError::NotContainer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unescape_component() {
        assert_eq!(unescape_component("foo"), "foo");
        assert_eq!(unescape_component("a~0b~1c"), "a~b/c");
        assert_eq!(unescape_component("~01"), "~1");
    }

    #[test]
    fn test_escape_component() {
        assert_eq!(escape_component("foo"), "foo");
        assert_eq!(escape_component("a~b/c"), "a~0b~1c");
        assert_eq!(escape_component("~1"), "~01");
    }

    #[test]
    fn test_parse_json_pointer() {
        assert_eq!(parse_json_pointer("").unwrap(), Vec::<String>::new());
        assert_eq!(parse_json_pointer("/").unwrap(), vec![""]);
        assert_eq!(parse_json_pointer("/foo///").unwrap(), vec!["foo", "", "", ""]);
        assert_eq!(
            parse_json_pointer("/a~0b/c~1d/1").unwrap(),
            vec!["a~b", "c/d", "1"]
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(
            parse_json_pointer("user/name"),
            Err(JsonPointerError::InvalidPath("user/name".to_string()))
        );
        assert!(parse_json_pointer("/bad~escape").is_err());
    }

    #[test]
    fn test_get_scalar_root() {
        assert_eq!(get(&json!(123), "").unwrap(), Some(&json!(123)));
    }

    #[test]
    fn test_get_mixed() {
        let doc = json!({"a": {"b": [1, 2, 3]}});
        assert_eq!(get(&doc, "/a/b/1").unwrap(), Some(&json!(2)));
        assert_eq!(get(&doc, "/a/b/3").unwrap(), None);
        assert_eq!(get(&doc, "/a/b/-").unwrap(), None);
        assert_eq!(get(&doc, "/a/b/01").unwrap(), None);
    }

    #[test]
    fn test_get_escaped_key() {
        let doc = json!({"a/b": {"~": true}});
        assert_eq!(get(&doc, "/a~1b/~0").unwrap(), Some(&json!(true)));
    }

    #[test]
    fn test_has_explicit_null() {
        let doc = json!({"foo": null});
        assert!(has(&doc, "/foo").unwrap());
        assert!(!has(&doc, "/bar").unwrap());
        assert!(!has(&doc, "/foo/bar").unwrap());
    }

    #[test]
    fn test_has_missing_intermediate() {
        let doc = json!({"a": 1});
        assert!(!has(&doc, "/x/y/z").unwrap());
        assert!(!has(&doc, "/a/y").unwrap());
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut doc = json!({"a": [1, 2]});
        if let Some(slot) = get_mut(&mut doc, "/a/0").unwrap() {
            *slot = json!(10);
        }
        assert_eq!(doc, json!({"a": [10, 2]}));
    }

    #[test]
    fn test_set_root() {
        let mut doc = json!({"a": 1});
        set(&mut doc, "", json!([true])).unwrap();
        assert_eq!(doc, json!([true]));
    }

    #[test]
    fn test_set_creates_objects_and_arrays() {
        let mut doc = json!({});
        set(&mut doc, "/user/emails/0/address", json!("a@b.c")).unwrap();
        assert_eq!(doc, json!({"user": {"emails": [{"address": "a@b.c"}]}}));
    }

    #[test]
    fn test_set_pads_array() {
        let mut doc = json!({"list": []});
        set(&mut doc, "/list/2", json!("c")).unwrap();
        assert_eq!(doc, json!({"list": [null, null, "c"]}));
    }

    #[test]
    fn test_set_rejects_far_index() {
        let mut doc = json!({"list": [1]});
        for pointer in ["/list/18446744073709551615", "/list/1000000000", "/list/1026"] {
            assert_eq!(
                set(&mut doc, pointer, json!(2)),
                Err(JsonPointerError::InvalidIndex)
            );
        }
        assert_eq!(
            set(&mut doc, "/list/99999999999999999999", json!(2)),
            Err(JsonPointerError::InvalidIndex)
        );
        assert_eq!(doc, json!({"list": [1]}));

        set(&mut doc, "/list/1025", json!(2)).unwrap();
        assert_eq!(doc["list"].as_array().map(Vec::len), Some(1026));
    }

    #[test]
    fn test_set_appends_with_dash() {
        let mut doc = json!({"list": [1]});
        set(&mut doc, "/list/-", json!(2)).unwrap();
        assert_eq!(doc, json!({"list": [1, 2]}));
    }

    #[test]
    fn test_set_overwrites_existing() {
        let mut doc = json!({"user": {"name": "Ann", "age": 3}});
        set(&mut doc, "/user/name", json!("Bea")).unwrap();
        assert_eq!(doc, json!({"user": {"name": "Bea", "age": 3}}));
    }

    #[test]
    fn test_set_replaces_null_intermediate() {
        let mut doc = json!({"a": null});
        set(&mut doc, "/a/b", json!(1)).unwrap();
        assert_eq!(doc, json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let mut doc = json!({"a": 5});
        assert_eq!(
            set(&mut doc, "/a/b", json!(1)),
            Err(JsonPointerError::NotContainer)
        );
        assert_eq!(doc, json!({"a": 5}));
    }

    #[test]
    fn test_set_named_step_into_array_fails() {
        let mut doc = json!({"a": [1]});
        assert_eq!(
            set(&mut doc, "/a/name", json!(1)),
            Err(JsonPointerError::InvalidIndex)
        );
    }

    #[test]
    fn test_set_malformed_pointer() {
        let mut doc = json!({});
        assert!(matches!(
            set(&mut doc, "a", json!(1)),
            Err(JsonPointerError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_roundtrip() {
        for pointer in ["", "/", "/foo", "/a~0b/c~1d/1", "/foo///"] {
            let path = parse_json_pointer(pointer).unwrap();
            assert_eq!(format_json_pointer(&path), pointer);
        }
    }
}
