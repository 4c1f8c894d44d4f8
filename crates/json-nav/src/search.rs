//! Case-insensitive substring search over a document.
//!
//! A leaf (scalar) matches when its own key contains the query, or when its
//! canonical text contains the query. Containers are never matches
//! themselves, but every strict ancestor of a match is collected so the view
//! can expand the chain down to each hit. Results are recomputed on demand.

use indexmap::IndexSet;
use json_nav_path::{Path, Segment};

use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    matches: IndexSet<Path>,
    ancestors: IndexSet<Path>,
}

impl SearchResult {
    /// Matching leaf paths, in document order.
    pub fn matches(&self) -> impl Iterator<Item = &Path> + '_ {
        self.matches.iter()
    }

    /// Strict ancestors of the matches, in the order they were first reached.
    pub fn ancestors(&self) -> impl Iterator<Item = &Path> + '_ {
        self.ancestors.iter()
    }

    pub fn is_match(&self, path: &Path) -> bool {
        self.matches.contains(path)
    }

    /// `true` if `path` lies on the way down to at least one match.
    pub fn is_ancestor(&self, path: &Path) -> bool {
        self.ancestors.contains(path)
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Find every leaf of `value` matching `query`, ignoring case.
///
/// An empty query matches nothing.
///
/// ```
/// use json_nav::{search, Value};
/// use json_nav_path::path;
/// use serde_json::json;
///
/// let doc = Value::from(json!({"user": {"Name": "Ada", "tags": ["admin"]}}));
/// let found = search::search(&doc, "ADMIN");
/// assert!(found.is_match(&path!["user", "tags", 0]));
/// assert!(found.is_ancestor(&path!["user", "tags"]));
/// assert!(found.is_ancestor(&path![]));
/// ```
pub fn search(value: &Value, query: &str) -> SearchResult {
    let mut result = SearchResult::default();
    if query.is_empty() {
        return result;
    }
    let needle = query.to_lowercase();
    let mut path = Path::root();
    visit(value, &mut path, &needle, &mut result);
    result
}

fn visit(node: &Value, path: &mut Path, needle: &str, result: &mut SearchResult) {
    match node {
        Value::Scalar(scalar) => {
            let key_hit = path
                .last()
                .and_then(Segment::as_key)
                .is_some_and(|key| key.to_lowercase().contains(needle));
            if key_hit || scalar.canonical_text().to_lowercase().contains(needle) {
                result.ancestors.extend(path.ancestors());
                result.matches.insert(path.clone());
            }
        }
        _ => {
            for (segment, child) in node.children() {
                path.push(segment);
                visit(child, path, needle, result);
                path.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_nav_path::path;
    use serde_json::json;

    fn doc() -> Value {
        Value::from(json!({
            "name": "Widget",
            "price": 125,
            "tags": ["blue", "Small"],
            "dims": {"width": 3, "height": null},
            "active": true
        }))
    }

    #[test]
    fn test_value_match_is_case_insensitive() {
        let found = search(&doc(), "SMALL");
        assert_eq!(found.matches().collect::<Vec<_>>(), vec![&path!["tags", 1]]);
        assert_eq!(
            found.ancestors().collect::<Vec<_>>(),
            vec![&Path::root(), &path!["tags"]]
        );
    }

    #[test]
    fn test_key_match_on_leaf() {
        let found = search(&doc(), "eigh");
        assert!(found.is_match(&path!["dims", "height"]));
        assert!(found.is_ancestor(&path!["dims"]));
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_containers_are_never_matches() {
        let found = search(&doc(), "dims");
        assert!(found.is_empty());
        assert!(!found.is_ancestor(&Path::root()));
    }

    #[test]
    fn test_numbers_booleans_and_null_match_their_text() {
        let v = doc();
        assert!(search(&v, "12").is_match(&path!["price"]));
        assert!(search(&v, "tru").is_match(&path!["active"]));
        assert!(search(&v, "nul").is_match(&path!["dims", "height"]));
    }

    #[test]
    fn test_index_segments_never_match_as_keys() {
        let v = Value::from(json!([["x"], "y"]));
        assert!(search(&v, "0").is_empty());
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        assert!(search(&doc(), "").is_empty());
    }

    #[test]
    fn test_scalar_root() {
        let found = search(&Value::from("Hello"), "ell");
        assert!(found.is_match(&Path::root()));
        assert_eq!(found.ancestors().count(), 0);
    }
}
