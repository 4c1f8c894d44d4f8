//! Multi-document workspace.
//!
//! A [`Workspace`] owns every open [`Document`] in open order and tracks
//! which one is active. Each document carries its own history and view
//! state; nothing done to one document is visible from another.
//!
//! Invariant: while the workspace is non-empty, the active id names an open
//! document. The last open document can never be closed.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::codec::Codec;
use crate::config::EditorConfig;
use crate::error::{ConflictReason, MutationError, ParseError, SaveError, WorkspaceError};
use crate::history::{History, Step};
use crate::overlay::ViewState;
use crate::value::Value;

/// Opaque, unique document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(Uuid);

impl DocumentId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Caller's confirmation that unsaved changes to one document may be lost.
///
/// A token only confirms the close of the document it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardToken {
    id: DocumentId,
}

impl DiscardToken {
    pub fn confirm(id: DocumentId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }
}

/// Destination for saved document text.
///
/// The workspace never touches storage itself; it hands the serialized text
/// to a sink and marks the document saved only if the sink succeeds.
pub trait DocumentSink {
    type Error: std::error::Error + 'static;

    fn write(&mut self, name: &str, text: &str) -> Result<(), Self::Error>;
}

// ── Document ──────────────────────────────────────────────────────────────

/// One open document: its history, its view state, and the value it was
/// last saved as.
#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    name: String,
    last_saved: Value,
    history: History,
    view: ViewState,
}

impl Document {
    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current value (the history entry under the cursor).
    pub fn value(&self) -> &Value {
        self.history.current()
    }

    pub fn last_saved(&self) -> &Value {
        &self.last_saved
    }

    /// `true` if the current value differs from the last saved one.
    pub fn is_dirty(&self) -> bool {
        *self.value() != self.last_saved
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    /// Record `value` as a new history entry. See [`History::commit`].
    pub fn commit(&mut self, value: Value, label: impl Into<String>) -> bool {
        self.history.commit(value, label)
    }

    /// Run a mutation against the current value and commit its result.
    ///
    /// On error nothing is recorded. Returns whether a new entry was added
    /// (a mutation that changes nothing adds none).
    ///
    /// ```
    /// use json_nav::{mutate, Value, Workspace};
    /// use json_nav_path::path;
    /// use serde_json::json;
    ///
    /// let mut ws = Workspace::new();
    /// let id = ws.create_document(Value::from(json!({"a": 1})), "doc");
    /// let doc = ws.document_mut(id).unwrap();
    /// doc.edit("set a", |v| mutate::set(v, &path!["a"], Value::from(2i64))).unwrap();
    /// assert_eq!(doc.value(), &Value::from(json!({"a": 2})));
    /// assert!(doc.is_dirty());
    /// ```
    pub fn edit<F>(&mut self, label: impl Into<String>, f: F) -> Result<bool, MutationError>
    where
        F: FnOnce(&Value) -> Result<Value, MutationError>,
    {
        let next = f(self.value())?;
        Ok(self.history.commit(next, label))
    }

    pub fn undo(&mut self) -> Step<'_> {
        self.history.undo()
    }

    pub fn redo(&mut self) -> Step<'_> {
        self.history.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn jump_to(&mut self, index: usize) -> Option<&Value> {
        self.history.jump_to(index)
    }
}

// ── Workspace ─────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Workspace {
    documents: IndexMap<DocumentId, Document>,
    active: Option<DocumentId>,
    config: EditorConfig,
    clock: Arc<dyn Clock>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    // ──────────────────────────────────────────────────────────────────────
    // Constructors
    // ──────────────────────────────────────────────────────────────────────

    /// An empty workspace with default settings and the system clock.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default(), Arc::new(SystemClock))
    }

    pub fn with_config(config: EditorConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            documents: IndexMap::new(),
            active: None,
            config,
            clock,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ──────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ──────────────────────────────────────────────────────────────────────

    /// Open a new document holding `initial` and make it active.
    ///
    /// The document starts clean, with a single history entry and an empty
    /// view state.
    pub fn create_document(&mut self, initial: Value, name: impl Into<String>) -> DocumentId {
        let id = DocumentId::generate();
        let name = name.into();
        let history = History::new(initial.clone(), Arc::clone(&self.clock))
            .with_label_limit(self.config.history_label_max_len);
        debug!(%id, %name, "document created");
        self.documents.insert(
            id,
            Document {
                id,
                name,
                last_saved: initial,
                history,
                view: ViewState::new(self.config.default_expansion_depth),
            },
        );
        self.active = Some(id);
        id
    }

    /// Open a new document holding an empty object.
    pub fn create_empty(&mut self, name: impl Into<String>) -> DocumentId {
        self.create_document(Value::empty_object(), name)
    }

    /// Decode `text` and open it as a new document.
    pub fn open_document(
        &mut self,
        text: &str,
        name: impl Into<String>,
        codec: &dyn Codec,
    ) -> Result<DocumentId, ParseError> {
        let value = codec.deserialize(text)?;
        Ok(self.create_document(value, name))
    }

    /// Close a document, dropping its history and view state.
    ///
    /// Fails if `id` is unknown or is the last open document. A dirty
    /// document is only closed when `confirm` carries a token for `id`; the
    /// error otherwise hands back the token to use.
    ///
    /// Closing the active document activates the next document in open
    /// order, or the previous one if it was last.
    pub fn close_document(
        &mut self,
        id: DocumentId,
        confirm: Option<&DiscardToken>,
    ) -> Result<(), WorkspaceError> {
        let index = self.index_of(id)?;
        if self.documents.len() == 1 {
            return Err(WorkspaceError::WorkspaceConflict(
                ConflictReason::LastDocument(id),
            ));
        }
        let confirmed = confirm.is_some_and(|token| token.id == id);
        if self.documents[index].is_dirty() && !confirmed {
            return Err(WorkspaceError::DirtyCloseRequiresConfirmation {
                id,
                token: DiscardToken::confirm(id),
            });
        }
        self.documents.shift_remove_index(index);
        if self.active == Some(id) {
            let neighbour = self
                .documents
                .get_index(index)
                .or_else(|| self.documents.get_index(index.saturating_sub(1)));
            self.active = neighbour.map(|(next, _)| *next);
        }
        debug!(%id, active = ?self.active, "document closed");
        Ok(())
    }

    pub fn switch_active(&mut self, id: DocumentId) -> Result<(), WorkspaceError> {
        self.index_of(id)?;
        self.active = Some(id);
        debug!(%id, "active document switched");
        Ok(())
    }

    /// Record the current value as saved. Persisting it is the caller's job.
    pub fn mark_saved(&mut self, id: DocumentId) -> Result<(), WorkspaceError> {
        let doc = self.require_mut(id)?;
        doc.last_saved = doc.value().clone();
        debug!(%id, "document marked saved");
        Ok(())
    }

    /// Serialize a document, hand it to `sink`, and mark it saved if the
    /// sink accepts it.
    pub fn save_document<S: DocumentSink>(
        &mut self,
        id: DocumentId,
        codec: &dyn Codec,
        sink: &mut S,
    ) -> Result<(), SaveError<S::Error>> {
        let doc = self.require(id)?;
        let text = codec.serialize(doc.value())?;
        sink.write(doc.name(), &text).map_err(SaveError::Sink)?;
        self.mark_saved(id)?;
        Ok(())
    }

    pub fn rename_document(
        &mut self,
        id: DocumentId,
        name: impl Into<String>,
    ) -> Result<(), WorkspaceError> {
        let doc = self.require_mut(id)?;
        doc.name = name.into();
        debug!(%id, name = %doc.name, "document renamed");
        Ok(())
    }

    // ──────────────────────────────────────────────────────────────────────
    // Lookup
    // ──────────────────────────────────────────────────────────────────────

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    pub fn document_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.get_mut(&id)
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active
    }

    pub fn active(&self) -> Option<&Document> {
        self.active.and_then(|id| self.documents.get(&id))
    }

    pub fn active_mut(&mut self) -> Option<&mut Document> {
        match self.active {
            Some(id) => self.documents.get_mut(&id),
            None => None,
        }
    }

    /// Open documents in open order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> + '_ {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn index_of(&self, id: DocumentId) -> Result<usize, WorkspaceError> {
        self.documents.get_index_of(&id).ok_or_else(|| unknown(id))
    }

    fn require(&self, id: DocumentId) -> Result<&Document, WorkspaceError> {
        self.documents.get(&id).ok_or_else(|| unknown(id))
    }

    fn require_mut(&mut self, id: DocumentId) -> Result<&mut Document, WorkspaceError> {
        self.documents.get_mut(&id).ok_or_else(|| unknown(id))
    }
}

fn unknown(id: DocumentId) -> WorkspaceError {
    WorkspaceError::WorkspaceConflict(ConflictReason::UnknownDocument(id))
}
