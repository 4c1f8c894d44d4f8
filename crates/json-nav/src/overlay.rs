//! UI-only view state kept beside a document: which nodes are expanded and
//! which are bookmarked.
//!
//! Entries are keyed by the canonical path string and never touch the
//! document value or its history, so toggling them is invisible to
//! undo/redo. Entries may name paths that no longer resolve after a delete;
//! such entries are inert. [`ViewState::sweep`] drops them on request.

use std::collections::HashMap;

use indexmap::IndexSet;
use json_nav_path::{parse_path, Path};
use tracing::debug;

use crate::address;
use crate::config::DEFAULT_EXPANSION_DEPTH;
use crate::search::SearchResult;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    default_expansion_depth: usize,
    expansion: HashMap<String, bool>,
    bookmarks: IndexSet<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_EXPANSION_DEPTH)
    }
}

impl ViewState {
    pub fn new(default_expansion_depth: usize) -> Self {
        Self {
            default_expansion_depth,
            expansion: HashMap::new(),
            bookmarks: IndexSet::new(),
        }
    }

    pub fn default_expansion_depth(&self) -> usize {
        self.default_expansion_depth
    }

    // ── Expansion ─────────────────────────────────────────────────────────

    pub fn set_expanded(&mut self, path: &Path, expanded: bool) {
        self.expansion.insert(path.to_string(), expanded);
    }

    /// An explicit entry wins; otherwise a node is expanded iff its depth is
    /// at most the default expansion depth.
    pub fn is_expanded(&self, path: &Path) -> bool {
        self.expansion
            .get(&path.to_string())
            .copied()
            .unwrap_or(path.depth() <= self.default_expansion_depth)
    }

    /// Flips the effective expansion state and returns the new one.
    pub fn toggle_expanded(&mut self, path: &Path) -> bool {
        let expanded = !self.is_expanded(path);
        self.set_expanded(path, expanded);
        expanded
    }

    /// Explicitly expand (or collapse) every container in `value`.
    pub fn set_all_expanded(&mut self, value: &Value, expanded: bool) {
        address::walk(value, |path, node| {
            if node.is_container() {
                self.expansion.insert(path.to_string(), expanded);
            }
        });
    }

    /// Drop every explicit expansion entry, falling back to the default.
    pub fn reset_expansion(&mut self) {
        self.expansion.clear();
    }

    /// Explicitly expand the ancestors of every search hit.
    pub fn reveal(&mut self, result: &SearchResult) {
        for path in result.ancestors() {
            self.set_expanded(path, true);
        }
    }

    /// Number of explicit expansion entries, stale ones included.
    pub fn expansion_len(&self) -> usize {
        self.expansion.len()
    }

    // ── Bookmarks ─────────────────────────────────────────────────────────

    /// Adds or removes a bookmark; returns whether `path` is now bookmarked.
    pub fn toggle_bookmark(&mut self, path: &Path) -> bool {
        let key = path.to_string();
        if self.bookmarks.shift_remove(&key) {
            false
        } else {
            self.bookmarks.insert(key);
            true
        }
    }

    pub fn is_bookmarked(&self, path: &Path) -> bool {
        self.bookmarks.contains(&path.to_string())
    }

    /// Bookmarked canonical paths, oldest first.
    pub fn list_bookmarks(&self) -> impl Iterator<Item = &str> + '_ {
        self.bookmarks.iter().map(String::as_str)
    }

    /// Bookmarks that resolve in `value`, oldest first.
    pub fn live_bookmarks(&self, value: &Value) -> Vec<Path> {
        self.bookmarks
            .iter()
            .filter_map(|key| parse_path(key).ok())
            .filter(|path| address::contains(value, path))
            .collect()
    }

    // ── Maintenance ───────────────────────────────────────────────────────

    /// Drop entries whose path does not resolve in `value`.
    ///
    /// Never required for correctness. Returns the number of entries removed.
    pub fn sweep(&mut self, value: &Value) -> usize {
        let live = |key: &String| {
            parse_path(key)
                .map(|path| address::contains(value, &path))
                .unwrap_or(false)
        };
        let before = self.expansion.len() + self.bookmarks.len();
        self.expansion.retain(|key, _| live(key));
        self.bookmarks.retain(|key| live(key));
        let removed = before - self.expansion.len() - self.bookmarks.len();
        debug!(removed, "view state sweep");
        removed
    }
}
