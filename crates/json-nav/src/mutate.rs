//! Copy-on-write mutation engine.
//!
//! Every operation is a pure function of the input root: it either returns a
//! new root (sharing all untouched subtrees with the input) or an error, in
//! which case nothing was changed.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use json_nav_path::{Path, Segment};

use crate::address::{self, update};
use crate::error::MutationError;
use crate::value::{Object, Value};

/// Where [`insert`] places the new value inside its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertKey {
    /// Object member name.
    Key(String),
    /// Array position; elements at and after it shift right.
    Index(i64),
    /// Array end.
    Append,
}

impl InsertKey {
    /// The append sentinel in text form.
    pub const APPEND: &'static str = "-";
}

impl From<&str> for InsertKey {
    fn from(key: &str) -> Self {
        InsertKey::Key(key.to_string())
    }
}

impl From<String> for InsertKey {
    fn from(key: String) -> Self {
        InsertKey::Key(key)
    }
}

impl From<i64> for InsertKey {
    fn from(idx: i64) -> Self {
        InsertKey::Index(idx)
    }
}

/// Reads `-` as append, an optionally signed integer as an index, a JSON
/// string literal as a key, and anything else as a bare key.
impl FromStr for InsertKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::APPEND {
            return Ok(InsertKey::Append);
        }
        if let Ok(idx) = s.parse::<i64>() {
            return Ok(InsertKey::Index(idx));
        }
        if s.starts_with('"') {
            if let Ok(key) = serde_json::from_str::<String>(s) {
                return Ok(InsertKey::Key(key));
            }
        }
        Ok(InsertKey::Key(s.to_string()))
    }
}

impl fmt::Display for InsertKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertKey::Key(key) => f.write_str(key),
            InsertKey::Index(idx) => write!(f, "{idx}"),
            InsertKey::Append => f.write_str(Self::APPEND),
        }
    }
}

/// Read the value at `path`. See [`address::get`].
pub fn get<'a>(value: &'a Value, path: &Path) -> Result<&'a Value, MutationError> {
    address::get(value, path)
}

/// Replace the value at `path` with `new_value`.
///
/// # Errors
///
/// [`MutationError::RootMutationDenied`] for the root path (use
/// [`replace_root`]), otherwise the errors of [`address::get`].
///
/// # Example
///
/// ```
/// use json_nav::{mutate, Value};
/// use json_nav_path::path;
/// use serde_json::json;
///
/// let v = Value::from(json!({"a": 1, "b": [10, 20]}));
/// let out = mutate::set(&v, &path!["b", 0], Value::from(99i64)).unwrap();
/// assert_eq!(out, Value::from(json!({"a": 1, "b": [99, 20]})));
/// ```
pub fn set(value: &Value, path: &Path, new_value: Value) -> Result<Value, MutationError> {
    if path.is_root() {
        return Err(MutationError::RootMutationDenied);
    }
    update(value, path, |_| Ok(new_value))
}

/// Swap the whole document for `replacement`.
///
/// This is the one sanctioned way to write the root; it cannot fail, but
/// returns a `Result` so it composes with the other operations.
pub fn replace_root(_current: &Value, replacement: Value) -> Result<Value, MutationError> {
    Ok(replacement)
}

/// Remove the node at `path` from its parent.
///
/// Array elements after the removed one shift left by one.
///
/// # Errors
///
/// - [`MutationError::RootMutationDenied`] for the root path.
/// - [`MutationError::PathNotFound`] if the key does not exist.
/// - [`MutationError::IndexOutOfBounds`] if the index is `>= len`.
/// - [`MutationError::TypeMismatch`] if the parent does not match the segment.
pub fn delete(value: &Value, path: &Path) -> Result<Value, MutationError> {
    let (parent, last) = path.split_last().ok_or(MutationError::RootMutationDenied)?;
    update(value, &parent, |container| match (container, last) {
        (Value::Object(map), Segment::Key(key)) => {
            if !map.contains_key(key) {
                return Err(MutationError::PathNotFound { path: path.clone() });
            }
            let mut map = (**map).clone();
            map.shift_remove(key);
            Ok(Value::Object(Arc::new(map)))
        }
        (Value::Array(items), Segment::Index(idx)) => {
            if *idx >= items.len() {
                return Err(MutationError::IndexOutOfBounds {
                    path: parent.clone(),
                    index: *idx as i64,
                    len: items.len(),
                });
            }
            let mut items = (**items).clone();
            items.remove(*idx);
            Ok(Value::Array(Arc::new(items)))
        }
        _ => Err(container_mismatch(container, &parent, last.is_key())),
    })
}

/// Insert `new_value` into the container at `parent_path`.
///
/// For objects, `key` must be [`InsertKey::Key`]; an existing key is
/// overwritten where it stands. For arrays, `key` is [`InsertKey::Append`]
/// or an index in `0..=len`.
///
/// # Example
///
/// ```
/// use json_nav::{mutate, InsertKey, Value};
/// use json_nav_path::path;
/// use serde_json::json;
///
/// let v = Value::from(json!({"b": [1, 2]}));
/// let out = mutate::insert(&v, &path!["b"], InsertKey::Index(1), Value::from(9i64)).unwrap();
/// assert_eq!(out, Value::from(json!({"b": [1, 9, 2]})));
/// ```
pub fn insert(
    value: &Value,
    parent_path: &Path,
    key: InsertKey,
    new_value: Value,
) -> Result<Value, MutationError> {
    update(value, parent_path, |container| match (container, key) {
        (Value::Object(map), InsertKey::Key(key)) => {
            let mut map = (**map).clone();
            map.insert(key, new_value);
            Ok(Value::Object(Arc::new(map)))
        }
        (Value::Array(items), InsertKey::Append) => {
            let mut items = (**items).clone();
            items.push(new_value);
            Ok(Value::Array(Arc::new(items)))
        }
        (Value::Array(items), InsertKey::Index(idx)) => {
            if idx < 0 || idx as usize > items.len() {
                return Err(MutationError::IndexOutOfBounds {
                    path: parent_path.clone(),
                    index: idx,
                    len: items.len(),
                });
            }
            let mut items = (**items).clone();
            items.insert(idx as usize, new_value);
            Ok(Value::Array(Arc::new(items)))
        }
        (_, key) => Err(container_mismatch(
            container,
            parent_path,
            matches!(key, InsertKey::Key(_)),
        )),
    })
}

/// Append `new_value` to the array at `array_path`.
pub fn append(value: &Value, array_path: &Path, new_value: Value) -> Result<Value, MutationError> {
    insert(value, array_path, InsertKey::Append, new_value)
}

/// Rename the object member at `path` to `new_key`, keeping its position
/// and value.
///
/// # Errors
///
/// - [`MutationError::RootMutationDenied`] for the root path.
/// - [`MutationError::TypeMismatch`] if the last segment is an index or the
///   parent is not an object.
/// - [`MutationError::PathNotFound`] if the member does not exist.
/// - [`MutationError::KeyCollision`] if another member is already named
///   `new_key`.
pub fn rename_key(value: &Value, path: &Path, new_key: &str) -> Result<Value, MutationError> {
    let (parent, last) = path.split_last().ok_or(MutationError::RootMutationDenied)?;
    update(value, &parent, |container| {
        let (map, old_key) = match (container, last) {
            (Value::Object(map), Segment::Key(key)) => (map, key),
            _ => return Err(container_mismatch(container, &parent, last.is_key())),
        };
        if !map.contains_key(old_key) {
            return Err(MutationError::PathNotFound { path: path.clone() });
        }
        if old_key == new_key {
            return Ok(container.clone());
        }
        if map.contains_key(new_key) {
            return Err(MutationError::KeyCollision {
                path: parent.clone(),
                key: new_key.to_string(),
            });
        }
        let renamed: Object = map
            .iter()
            .map(|(k, v)| {
                let k = if k == old_key { new_key.to_string() } else { k.clone() };
                (k, v.clone())
            })
            .collect();
        Ok(Value::Object(Arc::new(renamed)))
    })
}

/// Copy the node at `path` and place the copy right after the original.
///
/// Array elements are inserted at `index + 1`. Object members get the first
/// free key of `<key>_copy`, `<key>_copy_2`, `<key>_copy_3`, ...
/// Returns the new root and the path of the copy.
pub fn duplicate(value: &Value, path: &Path) -> Result<(Value, Path), MutationError> {
    let (parent, last) = path.split_last().ok_or(MutationError::RootMutationDenied)?;
    let original = address::get(value, path)?.clone();
    match last {
        Segment::Index(idx) => {
            let copy_path = parent.child(*idx + 1);
            let out = insert(value, &parent, InsertKey::Index(*idx as i64 + 1), original)?;
            Ok((out, copy_path))
        }
        Segment::Key(key) => {
            let container = address::get(value, &parent)?;
            let map = container
                .as_object()
                .ok_or_else(|| container_mismatch(container, &parent, true))?;
            let copy_key = free_copy_key(map, key);
            let copy_path = parent.child(copy_key.as_str());
            let out = update(value, &parent, |_| {
                let mut rebuilt = Object::with_capacity(map.len() + 1);
                for (k, v) in map.iter() {
                    rebuilt.insert(k.clone(), v.clone());
                    if k == key {
                        rebuilt.insert(copy_key.clone(), original.clone());
                    }
                }
                Ok(Value::Object(Arc::new(rebuilt)))
            })?;
            Ok((out, copy_path))
        }
    }
}

fn free_copy_key(map: &Object, key: &str) -> String {
    let base = format!("{key}_copy");
    if !map.contains_key(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}_{n}");
        if !map.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Move the element at `from` to position `to` within the same array.
///
/// `to` is the element's index after the move.
pub fn move_item(
    value: &Value,
    array_path: &Path,
    from: usize,
    to: usize,
) -> Result<Value, MutationError> {
    update(value, array_path, |container| {
        let items = container
            .as_array()
            .ok_or_else(|| container_mismatch(container, array_path, false))?;
        for idx in [from, to] {
            if idx >= items.len() {
                return Err(MutationError::IndexOutOfBounds {
                    path: array_path.clone(),
                    index: idx as i64,
                    len: items.len(),
                });
            }
        }
        if from == to {
            return Ok(container.clone());
        }
        let mut items = items.clone();
        let item = items.remove(from);
        items.insert(to, item);
        Ok(Value::Array(Arc::new(items)))
    })
}

fn container_mismatch(container: &Value, path: &Path, wants_object: bool) -> MutationError {
    let expected = match (container, wants_object) {
        (Value::Scalar(_), _) => "object or array",
        (_, true) => "object",
        (_, false) => "array",
    };
    MutationError::TypeMismatch {
        path: path.clone(),
        expected,
        found: container.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_nav_path::path;
    use serde_json::json;

    fn v(j: serde_json::Value) -> Value {
        Value::from(j)
    }

    #[test]
    fn test_set_replaces_leaf_and_shares_siblings() {
        let doc = v(json!({"a": {"x": 1}, "b": [10, 20]}));
        let out = set(&doc, &path!["b", 0], v(json!(99))).unwrap();
        assert_eq!(out, v(json!({"a": {"x": 1}, "b": [99, 20]})));
        assert!(get(&out, &path!["a"]).unwrap().ptr_eq(get(&doc, &path!["a"]).unwrap()));
        assert_eq!(doc, v(json!({"a": {"x": 1}, "b": [10, 20]})));
    }

    #[test]
    fn test_set_root_is_denied() {
        let doc = v(json!({"a": 1}));
        assert_eq!(
            set(&doc, &Path::root(), v(json!(2))),
            Err(MutationError::RootMutationDenied)
        );
        assert_eq!(replace_root(&doc, v(json!(2))).unwrap(), v(json!(2)));
    }

    #[test]
    fn test_set_missing_key_is_not_created() {
        let doc = v(json!({"a": 1}));
        assert_eq!(
            set(&doc, &path!["b"], v(json!(2))),
            Err(MutationError::PathNotFound { path: path!["b"] })
        );
    }

    #[test]
    fn test_set_keeps_key_position() {
        let doc = v(json!({"a": 1, "b": 2, "c": 3}));
        let out = set(&doc, &path!["a"], v(json!(0))).unwrap();
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn test_delete_object_member_and_array_element() {
        let doc = v(json!({"a": 1, "b": [1, 2, 3]}));
        assert_eq!(delete(&doc, &path!["a"]).unwrap(), v(json!({"b": [1, 2, 3]})));
        assert_eq!(delete(&doc, &path!["b", 0]).unwrap(), v(json!({"a": 1, "b": [2, 3]})));
    }

    #[test]
    fn test_delete_errors() {
        let doc = v(json!({"a": 1, "b": [1, 2]}));
        assert_eq!(delete(&doc, &Path::root()), Err(MutationError::RootMutationDenied));
        assert_eq!(
            delete(&doc, &path!["z"]),
            Err(MutationError::PathNotFound { path: path!["z"] })
        );
        assert_eq!(
            delete(&doc, &path!["b", 2]),
            Err(MutationError::IndexOutOfBounds { path: path!["b"], index: 2, len: 2 })
        );
        assert!(matches!(
            delete(&doc, &path!["a", "x"]),
            Err(MutationError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_insert_object_overwrite_keeps_position() {
        let doc = v(json!({"a": 1, "b": 2, "c": 3}));
        let out = insert(&doc, &Path::root(), "a".into(), v(json!(9))).unwrap();
        assert_eq!(out, v(json!({"a": 9, "b": 2, "c": 3})));
        let out = insert(&doc, &Path::root(), "d".into(), v(json!(4))).unwrap();
        assert_eq!(out, v(json!({"a": 1, "b": 2, "c": 3, "d": 4})));
    }

    #[test]
    fn test_insert_array_bounds() {
        let doc = v(json!([1, 2]));
        assert_eq!(
            insert(&doc, &Path::root(), InsertKey::Index(2), v(json!(3))).unwrap(),
            v(json!([1, 2, 3]))
        );
        assert_eq!(
            insert(&doc, &Path::root(), InsertKey::Append, v(json!(3))).unwrap(),
            v(json!([1, 2, 3]))
        );
        assert_eq!(
            insert(&doc, &Path::root(), InsertKey::Index(3), v(json!(3))),
            Err(MutationError::IndexOutOfBounds { path: Path::root(), index: 3, len: 2 })
        );
        assert_eq!(
            insert(&doc, &Path::root(), InsertKey::Index(-1), v(json!(3))),
            Err(MutationError::IndexOutOfBounds { path: Path::root(), index: -1, len: 2 })
        );
    }

    #[test]
    fn test_insert_type_mismatches() {
        let doc = v(json!({"s": "x", "o": {}, "a": []}));
        assert!(matches!(
            insert(&doc, &path!["s"], "k".into(), v(json!(1))),
            Err(MutationError::TypeMismatch { expected: "object or array", .. })
        ));
        assert!(matches!(
            insert(&doc, &path!["o"], InsertKey::Index(0), v(json!(1))),
            Err(MutationError::TypeMismatch { expected: "array", .. })
        ));
        assert!(matches!(
            insert(&doc, &path!["a"], "k".into(), v(json!(1))),
            Err(MutationError::TypeMismatch { expected: "object", .. })
        ));
    }

    #[test]
    fn test_rename_key_preserves_position() {
        let doc = v(json!({"a": 1, "b": {"deep": true}, "c": 3}));
        let out = rename_key(&doc, &path!["b"], "B").unwrap();
        assert_eq!(out, v(json!({"a": 1, "B": {"deep": true}, "c": 3})));
        assert!(get(&out, &path!["B"]).unwrap().ptr_eq(get(&doc, &path!["b"]).unwrap()));
    }

    #[test]
    fn test_rename_key_errors() {
        let doc = v(json!({"a": 1, "b": 2, "arr": [1]}));
        assert_eq!(
            rename_key(&doc, &path!["a"], "b"),
            Err(MutationError::KeyCollision { path: Path::root(), key: "b".to_string() })
        );
        assert_eq!(
            rename_key(&doc, &path!["zz"], "y"),
            Err(MutationError::PathNotFound { path: path!["zz"] })
        );
        assert!(matches!(
            rename_key(&doc, &path!["arr", 0], "y"),
            Err(MutationError::TypeMismatch { .. })
        ));
        assert_eq!(rename_key(&doc, &Path::root(), "y"), Err(MutationError::RootMutationDenied));
        assert_eq!(rename_key(&doc, &path!["a"], "a").unwrap(), doc);
    }

    #[test]
    fn test_duplicate_array_element_and_member() {
        let doc = v(json!({"list": [1, 2], "k": "v", "k_copy": 0}));
        let (out, at) = duplicate(&doc, &path!["list", 0]).unwrap();
        assert_eq!(at, path!["list", 1]);
        assert_eq!(get(&out, &path!["list"]).unwrap(), &v(json!([1, 1, 2])));

        let (out, at) = duplicate(&doc, &path!["k"]).unwrap();
        assert_eq!(at, path!["k_copy_2"]);
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["list", "k", "k_copy_2", "k_copy"]);
    }

    #[test]
    fn test_move_item() {
        let doc = v(json!({"a": ["x", "y", "z"]}));
        assert_eq!(
            move_item(&doc, &path!["a"], 0, 2).unwrap(),
            v(json!({"a": ["y", "z", "x"]}))
        );
        assert_eq!(
            move_item(&doc, &path!["a"], 2, 0).unwrap(),
            v(json!({"a": ["z", "x", "y"]}))
        );
        assert!(matches!(
            move_item(&doc, &path!["a"], 0, 3),
            Err(MutationError::IndexOutOfBounds { index: 3, .. })
        ));
    }

    #[test]
    fn test_append_to_empty_and_non_empty_arrays() {
        let doc = v(json!({"empty": [], "full": [1, 2]}));
        let out = append(&doc, &path!["empty"], Value::from("x")).unwrap();
        assert_eq!(get(&out, &path!["empty"]), Ok(&v(json!(["x"]))));
        let out = append(&out, &path!["full"], Value::from(3i64)).unwrap();
        assert_eq!(out, v(json!({"empty": ["x"], "full": [1, 2, 3]})));
        assert!(matches!(
            append(&doc, &Path::root(), Value::null()),
            Err(MutationError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_get_after_set_on_inserted_key() {
        let doc = v(json!({"a": {}}));
        let out = insert(&doc, &path!["a"], "fresh".into(), Value::null()).unwrap();
        let out = set(&out, &path!["a", "fresh"], v(json!([true]))).unwrap();
        assert_eq!(get(&out, &path!["a", "fresh"]), Ok(&v(json!([true]))));
        assert_eq!(doc, v(json!({"a": {}})));
    }

    #[test]
    fn test_insert_key_from_str() {
        assert_eq!("-".parse::<InsertKey>().unwrap(), InsertKey::Append);
        assert_eq!("3".parse::<InsertKey>().unwrap(), InsertKey::Index(3));
        assert_eq!("-2".parse::<InsertKey>().unwrap(), InsertKey::Index(-2));
        assert_eq!("name".parse::<InsertKey>().unwrap(), InsertKey::Key("name".into()));
        assert_eq!("\"7\"".parse::<InsertKey>().unwrap(), InsertKey::Key("7".into()));
    }
}
