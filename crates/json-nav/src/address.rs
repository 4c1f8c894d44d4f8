//! Path addressing: resolving, reading, and copy-on-write writing of the
//! value at an arbitrary depth.

use std::sync::Arc;

use json_nav_path::{Path, Segment};

use crate::error::MutationError;
use crate::value::Value;

fn prefix(path: &Path, len: usize) -> Path {
    Path::new(path.segments()[..len].to_vec())
}

fn not_found(path: &Path, depth: usize) -> MutationError {
    MutationError::PathNotFound { path: prefix(path, depth + 1) }
}

/// The error for `path[depth]` applied to a container of the wrong shape.
fn mismatch(container: &Value, path: &Path, depth: usize) -> MutationError {
    let expected = match (container, &path.segments()[depth]) {
        (Value::Scalar(_), _) => "object or array",
        (_, Segment::Key(_)) => "object",
        (_, Segment::Index(_)) => "array",
    };
    MutationError::TypeMismatch {
        path: prefix(path, depth),
        expected,
        found: container.kind(),
    }
}

/// Steps from `container` (found at `path[..depth]`) into the child addressed
/// by `path[depth]`.
fn step<'a>(container: &'a Value, path: &Path, depth: usize) -> Result<&'a Value, MutationError> {
    match (container, &path.segments()[depth]) {
        (Value::Object(map), Segment::Key(key)) => {
            map.get(key).ok_or_else(|| not_found(path, depth))
        }
        (Value::Array(items), Segment::Index(idx)) => {
            items.get(*idx).ok_or_else(|| not_found(path, depth))
        }
        _ => Err(mismatch(container, path, depth)),
    }
}

/// Read the value at `path`.
///
/// # Errors
///
/// - [`MutationError::PathNotFound`] if a key is absent or an index is past
///   the end of its array.
/// - [`MutationError::TypeMismatch`] if a segment meets a scalar, or a key
///   meets an array (or an index meets an object).
///
/// # Example
///
/// ```
/// use json_nav::{address, Value};
/// use json_nav_path::path;
/// use serde_json::json;
///
/// let doc = Value::from(json!({"a": {"b": [10, 20]}}));
/// assert_eq!(address::get(&doc, &path!["a", "b", 1]).unwrap(), &Value::from(20i64));
/// assert!(address::get(&doc, &path!["a", "x"]).is_err());
/// ```
pub fn get<'a>(value: &'a Value, path: &Path) -> Result<&'a Value, MutationError> {
    let mut current = value;
    for depth in 0..path.depth() {
        current = step(current, path, depth)?;
    }
    Ok(current)
}

/// `true` if `path` resolves in `value`.
pub fn contains(value: &Value, path: &Path) -> bool {
    get(value, path).is_ok()
}

/// Rebuild the root with the node at `path` replaced by `f(node)`.
///
/// Every container from the root down to the parent of `path` is shallow
/// copied with its one changed child; all siblings are shared with `value`.
/// If `path` or `f` fails, nothing is built and the error is returned.
pub fn update<F>(value: &Value, path: &Path, f: F) -> Result<Value, MutationError>
where
    F: FnOnce(&Value) -> Result<Value, MutationError>,
{
    update_from(value, path, 0, f)
}

fn update_from<F>(node: &Value, path: &Path, depth: usize, f: F) -> Result<Value, MutationError>
where
    F: FnOnce(&Value) -> Result<Value, MutationError>,
{
    if depth == path.depth() {
        return f(node);
    }
    match (node, &path.segments()[depth]) {
        (Value::Object(map), Segment::Key(key)) => {
            let child = map.get(key).ok_or_else(|| not_found(path, depth))?;
            let replaced = update_from(child, path, depth + 1, f)?;
            let mut map = (**map).clone();
            // Replacing an existing key keeps its position.
            map.insert(key.clone(), replaced);
            Ok(Value::Object(Arc::new(map)))
        }
        (Value::Array(items), Segment::Index(idx)) => {
            let child = items.get(*idx).ok_or_else(|| not_found(path, depth))?;
            let replaced = update_from(child, path, depth + 1, f)?;
            let mut items = (**items).clone();
            items[*idx] = replaced;
            Ok(Value::Array(Arc::new(items)))
        }
        _ => Err(mismatch(node, path, depth)),
    }
}

/// Visit every node in pre-order (parents before children, document order).
///
/// ```
/// use json_nav::{address, Value};
/// use serde_json::json;
///
/// let doc = Value::from(json!({"a": [1, 2], "b": null}));
/// let mut seen = Vec::new();
/// address::walk(&doc, |path, _| seen.push(path.to_string()));
/// assert_eq!(seen, ["", "a", "a[0]", "a[1]", "b"]);
/// ```
pub fn walk<'a, F>(value: &'a Value, mut visit: F)
where
    F: FnMut(&Path, &'a Value),
{
    let mut path = Path::root();
    walk_inner(value, &mut path, &mut visit);
}

fn walk_inner<'a, F>(node: &'a Value, path: &mut Path, visit: &mut F)
where
    F: FnMut(&Path, &'a Value),
{
    visit(path, node);
    for (segment, child) in node.children() {
        path.push(segment);
        walk_inner(child, path, visit);
        path.pop();
    }
}

/// All paths of `value` in pre-order.
pub fn paths(value: &Value) -> Vec<Path> {
    let mut out = Vec::with_capacity(value.node_count());
    walk(value, |path, _| out.push(path.clone()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_nav_path::path;
    use serde_json::json;

    fn doc() -> Value {
        Value::from(json!({"a": 1, "b": [10, 20], "c": {"d": "e"}}))
    }

    #[test]
    fn test_get_root_and_nested() {
        let v = doc();
        assert_eq!(get(&v, &Path::root()).unwrap(), &v);
        assert_eq!(get(&v, &path!["b", 1]).unwrap(), &Value::from(20i64));
        assert_eq!(get(&v, &path!["c", "d"]).unwrap(), &Value::from("e"));
    }

    #[test]
    fn test_get_missing_reports_failing_prefix() {
        let v = doc();
        assert_eq!(
            get(&v, &path!["c", "x", "y"]),
            Err(MutationError::PathNotFound { path: path!["c", "x"] })
        );
        assert_eq!(
            get(&v, &path!["b", 2]),
            Err(MutationError::PathNotFound { path: path!["b", 2] })
        );
    }

    #[test]
    fn test_get_through_scalar_is_type_mismatch() {
        let v = doc();
        assert!(matches!(
            get(&v, &path!["a", "x"]),
            Err(MutationError::TypeMismatch { ref path, .. }) if *path == path!["a"]
        ));
        assert!(matches!(
            get(&v, &path!["b", "x"]),
            Err(MutationError::TypeMismatch { expected: "object", .. })
        ));
        assert!(matches!(
            get(&v, &path![0]),
            Err(MutationError::TypeMismatch { expected: "array", .. })
        ));
    }

    #[test]
    fn test_update_shares_untouched_siblings() {
        let v = doc();
        let out = update(&v, &path!["b", 0], |_| Ok(Value::from(99i64))).unwrap();

        assert_eq!(get(&out, &path!["b", 0]).unwrap(), &Value::from(99i64));
        assert!(get(&out, &path!["c"]).unwrap().ptr_eq(get(&v, &path!["c"]).unwrap()));
        assert!(!get(&out, &path!["b"]).unwrap().ptr_eq(get(&v, &path!["b"]).unwrap()));
        // The original is untouched.
        assert_eq!(get(&v, &path!["b", 0]).unwrap(), &Value::from(10i64));
    }

    #[test]
    fn test_update_failure_builds_nothing() {
        let v = doc();
        let err = update(&v, &path!["a"], |_| {
            Err(MutationError::RootMutationDenied)
        });
        assert_eq!(err, Err(MutationError::RootMutationDenied));
    }

    #[test]
    fn test_paths_preorder() {
        let v = doc();
        let all: Vec<String> = paths(&v).iter().map(Path::to_string).collect();
        assert_eq!(all, ["", "a", "b", "b[0]", "b[1]", "c", "c.d"]);
    }
}
