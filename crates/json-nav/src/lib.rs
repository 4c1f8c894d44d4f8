//! json-nav: an editing engine for JSON-shaped documents.
//!
//! - [`value`]: the immutable, structurally shared document tree.
//! - [`address`] / [`mutate`]: path-addressed reads and copy-on-write edits.
//!   Every edit returns a new root and leaves its input untouched.
//! - [`history`]: linear undo/redo over root snapshots.
//! - [`overlay`]: expansion and bookmark state that never enters history.
//! - [`search`]: case-insensitive leaf search with ancestor chains.
//! - [`workspace`]: many open documents, each isolated, one active.
//! - [`codec`]: JSON text in and out, key order preserved.
//!
//! # Example
//!
//! ```
//! use json_nav::{mutate, search, InsertKey, Value, Workspace};
//! use json_nav_path::path;
//! use serde_json::json;
//!
//! let mut ws = Workspace::new();
//! let id = ws.create_document(Value::from(json!({"a": 1, "b": [10, 20]})), "doc.json");
//! let doc = ws.document_mut(id).unwrap();
//!
//! doc.edit("set b[0]", |v| mutate::set(v, &path!["b", 0], Value::from(99i64))).unwrap();
//! doc.edit("insert b[1]", |v| {
//!     mutate::insert(v, &path!["b"], InsertKey::Index(1), Value::from(5i64))
//! })
//! .unwrap();
//! assert_eq!(doc.value(), &Value::from(json!({"a": 1, "b": [99, 5, 20]})));
//!
//! doc.undo();
//! assert_eq!(doc.value(), &Value::from(json!({"a": 1, "b": [99, 20]})));
//! assert!(search::search(doc.value(), "99").is_match(&path!["b", 0]));
//! ```

pub mod address;
pub mod cli;
pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod history;
pub mod mutate;
pub mod overlay;
pub mod search;
pub mod value;
pub mod workspace;

pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{Codec, JsonCodec};
pub use config::EditorConfig;
pub use error::{
    ConfigError, ConflictReason, EncodeError, Error, MutationError, ParseError, SaveError,
    WorkspaceError,
};
pub use history::{Boundary, History, HistoryEntry, Step};
pub use mutate::InsertKey;
pub use overlay::ViewState;
pub use search::SearchResult;
pub use value::{Array, Kind, Object, Scalar, Value};
pub use workspace::{DiscardToken, Document, DocumentId, DocumentSink, Workspace};
