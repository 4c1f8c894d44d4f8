//! Error types.

use json_nav_path::{Path, PathParseError};
use thiserror::Error;

use crate::value::Kind;
use crate::workspace::{DiscardToken, DocumentId};

// ── Mutation ──────────────────────────────────────────────────────────────

/// Failure of a path-addressed read or write.
///
/// A failed operation never produces a partially modified value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("path not found: `{path}`")]
    PathNotFound { path: Path },
    #[error("type mismatch at `{path}`: expected {expected}, found {found}")]
    TypeMismatch {
        path: Path,
        expected: &'static str,
        found: Kind,
    },
    #[error("index {index} out of bounds at `{path}` (length {len})")]
    IndexOutOfBounds { path: Path, index: i64, len: usize },
    #[error("the document root cannot be set or deleted; use replace_root")]
    RootMutationDenied,
    #[error("key {key:?} already exists at `{path}`")]
    KeyCollision { path: Path, key: String },
}

// ── Codec ─────────────────────────────────────────────────────────────────

/// The text could not be read as a document.
#[derive(Debug, Error)]
#[error("invalid document: {0}")]
pub struct ParseError(#[from] serde_json::Error);

impl ParseError {
    /// 1-based line of the failure.
    pub fn line(&self) -> usize {
        self.0.line()
    }

    /// 1-based column of the failure.
    pub fn column(&self) -> usize {
        self.0.column()
    }
}

/// The value could not be written as text.
#[derive(Debug, Error)]
#[error("failed to encode document: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

// ── Workspace ─────────────────────────────────────────────────────────────

/// Why a workspace operation was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConflictReason {
    #[error("document {0} is the last open document")]
    LastDocument(DocumentId),
    #[error("no open document with id {0}")]
    UnknownDocument(DocumentId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    #[error("workspace conflict: {0}")]
    WorkspaceConflict(ConflictReason),
    /// The document has unsaved changes. Pass `token` back to
    /// [`Workspace::close_document`](crate::Workspace::close_document) to
    /// discard them.
    #[error("document {id} has unsaved changes; closing requires confirmation")]
    DirtyCloseRequiresConfirmation { id: DocumentId, token: DiscardToken },
}

/// Failure of [`Workspace::save_document`](crate::Workspace::save_document).
#[derive(Debug, Error)]
pub enum SaveError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("failed to write document: {0}")]
    Sink(#[source] E),
}

// ── Config ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

// ── Umbrella ──────────────────────────────────────────────────────────────

/// Any error produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Mutation(#[from] MutationError),
    #[error("invalid path: {0}")]
    Path(#[from] PathParseError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
