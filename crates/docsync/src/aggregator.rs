//! Change aggregation with a single dirty flag.

use docsync_json_pointer as pointer;
use serde_json::Value;

use crate::error::{BindingError, Error};

/// Applies path changes to the data object and remembers whether any of
/// them was a real difference since the last flush.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChangeAggregator {
    dirty: bool,
}

impl ChangeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write `value` at `path` unless the current value is strictly equal.
    ///
    /// Returns whether the data object was modified. A value the data
    /// object cannot hold at `path` fails with [`BindingError::Conflict`]
    /// and leaves the dirty flag alone.
    pub fn add_change(
        &mut self,
        data: &mut Value,
        path: &str,
        value: &Value,
    ) -> Result<bool, Error> {
        let unchanged = pointer::get(data, path)?.is_some_and(|old| strictly_equal(old, value));
        if unchanged {
            return Ok(false);
        }
        pointer::set(data, path, value.clone()).map_err(|source| BindingError::Conflict {
            path: path.to_owned(),
            source,
        })?;
        self.dirty = true;
        tracing::trace!(path, %value, "applied change");
        Ok(true)
    }

    /// Clear the dirty flag, returning whether a `changed` notification is
    /// owed.
    pub fn take_changes(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

/// Identity comparison: scalars by value, numbers numerically, containers
/// never equal since every read produces a fresh one.
pub fn strictly_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        (Value::String(a), Value::String(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equal_value_stays_clean() {
        let mut agg = ChangeAggregator::new();
        let mut data = json!({"a": "x"});
        assert!(!agg.add_change(&mut data, "/a", &json!("x")).unwrap());
        assert!(!agg.is_dirty());
        assert!(!agg.take_changes());
    }

    #[test]
    fn test_difference_marks_dirty_once() {
        let mut agg = ChangeAggregator::new();
        let mut data = json!({"a": "x"});
        assert!(agg.add_change(&mut data, "/a", &json!("y")).unwrap());
        assert!(agg.add_change(&mut data, "/b", &json!(1)).unwrap());
        assert_eq!(data, json!({"a": "y", "b": 1}));
        assert!(agg.take_changes());
        assert!(!agg.take_changes());
    }

    #[test]
    fn test_missing_path_counts_as_difference() {
        let mut agg = ChangeAggregator::new();
        let mut data = json!({});
        assert!(agg.add_change(&mut data, "/attr", &Value::Null).unwrap());
        assert_eq!(data, json!({"attr": null}));
    }

    #[test]
    fn test_path_through_scalar_is_a_conflict() {
        let mut agg = ChangeAggregator::new();
        let mut data = json!({"a": 1});
        assert_eq!(
            agg.add_change(&mut data, "/a/b", &json!(2)),
            Err(Error::Binding(BindingError::Conflict {
                path: "/a/b".to_string(),
                source: pointer::JsonPointerError::NotContainer,
            }))
        );
        assert!(!agg.is_dirty());
        assert_eq!(data, json!({"a": 1}));
    }

    #[test]
    fn test_malformed_path_propagates() {
        let mut agg = ChangeAggregator::new();
        let mut data = json!({});
        assert!(matches!(
            agg.add_change(&mut data, "a", &json!(2)),
            Err(Error::Path(pointer::JsonPointerError::InvalidPath(_)))
        ));
    }

    #[test]
    fn test_strictly_equal() {
        assert!(strictly_equal(&json!(1), &json!(1.0)));
        assert!(!strictly_equal(&json!(1), &json!("1")));
        assert!(!strictly_equal(&json!(null), &json!(false)));
        assert!(!strictly_equal(&json!([1]), &json!([1])));
        assert!(!strictly_equal(&json!({}), &json!({})));
    }
}
