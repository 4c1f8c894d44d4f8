//! Linear undo/redo history for one document.
//!
//! # Overview
//!
//! A [`History`] stores snapshots of a document's root value and a cursor
//! pointing at the current one:
//!
//! - `entries[0]` is the snapshot the document was created with and is
//!   never removed.
//! - [`History::commit`] drops every entry after the cursor (there is no
//!   branching) and appends the new snapshot.
//! - [`History::undo`] / [`History::redo`] only move the cursor.
//!
//! Snapshots share unchanged subtrees with each other, so the storage cost
//! of an entry is proportional to the edit that produced it.

use std::sync::Arc;

use tracing::trace;

use crate::clock::Clock;
use crate::config::DEFAULT_HISTORY_LABEL_MAX_LEN;
use crate::value::Value;

/// Label of the first entry.
pub const INITIAL_LABEL: &str = "Initial load";

/// One recorded snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub value: Value,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub label: String,
}

/// Which end of the history a move ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    AtBeginning,
    AtEnd,
}

/// Outcome of [`History::undo`] / [`History::redo`].
///
/// Hitting a boundary is not an error: the current value is still returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step<'a> {
    Moved(&'a Value),
    Boundary(Boundary, &'a Value),
}

impl<'a> Step<'a> {
    /// The current value after the step.
    pub fn value(&self) -> &'a Value {
        match self {
            Step::Moved(v) | Step::Boundary(_, v) => v,
        }
    }

    pub fn moved(&self) -> bool {
        matches!(self, Step::Moved(_))
    }

    pub fn boundary(&self) -> Option<Boundary> {
        match self {
            Step::Moved(_) => None,
            Step::Boundary(b, _) => Some(*b),
        }
    }
}

/// Snapshot history with a cursor. Invariant: `cursor < entries.len()`.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    clock: Arc<dyn Clock>,
    label_max_len: usize,
}

impl History {
    // ──────────────────────────────────────────────────────────────────────
    // Constructors
    // ──────────────────────────────────────────────────────────────────────

    /// Starts a history whose only entry is `initial`.
    pub fn new(initial: Value, clock: Arc<dyn Clock>) -> Self {
        let entry = HistoryEntry {
            value: initial,
            timestamp: clock.now_millis(),
            label: INITIAL_LABEL.to_string(),
        };
        Self {
            entries: vec![entry],
            cursor: 0,
            clock,
            label_max_len: DEFAULT_HISTORY_LABEL_MAX_LEN,
        }
    }

    /// Cap commit labels at `max_len` chars.
    pub fn with_label_limit(mut self, max_len: usize) -> Self {
        self.label_max_len = max_len;
        self
    }

    // ──────────────────────────────────────────────────────────────────────
    // Accessors
    // ──────────────────────────────────────────────────────────────────────

    /// The value under the cursor.
    pub fn current(&self) -> &Value {
        &self.entries[self.cursor].value
    }

    pub fn current_entry(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; the initial entry is never removed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    // ──────────────────────────────────────────────────────────────────────
    // Transitions
    // ──────────────────────────────────────────────────────────────────────

    /// Records `value` as the new current snapshot.
    ///
    /// Returns `false` (and records nothing) if `value` deep-equals the
    /// current snapshot. Otherwise the redo branch is discarded.
    pub fn commit(&mut self, value: Value, label: impl Into<String>) -> bool {
        if value == *self.current() {
            return false;
        }
        let discarded = self.entries.len() - self.cursor - 1;
        self.entries.truncate(self.cursor + 1);
        let label = truncate_label(label.into(), self.label_max_len);
        trace!(%label, discarded, "history commit");
        self.entries.push(HistoryEntry {
            value,
            timestamp: self.clock.now_millis(),
            label,
        });
        self.cursor = self.entries.len() - 1;
        true
    }

    pub fn undo(&mut self) -> Step<'_> {
        if self.cursor == 0 {
            return Step::Boundary(Boundary::AtBeginning, self.current());
        }
        self.cursor -= 1;
        trace!(cursor = self.cursor, "history undo");
        Step::Moved(self.current())
    }

    pub fn redo(&mut self) -> Step<'_> {
        if !self.can_redo() {
            return Step::Boundary(Boundary::AtEnd, self.current());
        }
        self.cursor += 1;
        trace!(cursor = self.cursor, "history redo");
        Step::Moved(self.current())
    }

    /// Moves the cursor straight to `index`, keeping every entry.
    ///
    /// Returns `None` and leaves the cursor alone if `index` is out of range.
    pub fn jump_to(&mut self, index: usize) -> Option<&Value> {
        if index >= self.entries.len() {
            return None;
        }
        self.cursor = index;
        trace!(cursor = self.cursor, "history jump");
        Some(self.current())
    }
}

fn truncate_label(label: String, max_len: usize) -> String {
    match label.char_indices().nth(max_len) {
        Some((byte_idx, _)) => label[..byte_idx].to_string(),
        None => label,
    }
}
