//! Leaf traversal of a JSON document.

use serde_json::Value;

use crate::escape_component;

/// Call `visit(value, pointer)` for every leaf reachable from `val`.
///
/// A leaf is any non-container value. Containers are visited depth first in
/// their own order (insertion order for objects). Empty containers yield
/// nothing; a scalar root yields a single leaf at `""`.
///
/// # Example
///
/// ```
/// use docsync_json_pointer::walk;
/// use serde_json::json;
///
/// let doc = json!({"a": [1, {"b~c": null}], "d": {}});
/// let mut pointers = Vec::new();
/// walk(&doc, |_, pointer| pointers.push(pointer.to_string()));
/// assert_eq!(pointers, vec!["/a/0", "/a/1/b~0c"]);
/// ```
pub fn walk<F>(val: &Value, mut visit: F)
where
    F: FnMut(&Value, &str),
{
    let mut pointer = String::new();
    walk_inner(val, &mut pointer, &mut visit);
}

fn walk_inner<F>(val: &Value, pointer: &mut String, visit: &mut F)
where
    F: FnMut(&Value, &str),
{
    let len = pointer.len();
    match val {
        Value::Object(map) => {
            for (key, child) in map {
                pointer.push('/');
                pointer.push_str(&escape_component(key));
                walk_inner(child, pointer, visit);
                pointer.truncate(len);
            }
        }
        Value::Array(arr) => {
            for (idx, child) in arr.iter().enumerate() {
                pointer.push('/');
                pointer.push_str(&idx.to_string());
                walk_inner(child, pointer, visit);
                pointer.truncate(len);
            }
        }
        leaf => visit(leaf, pointer),
    }
}
