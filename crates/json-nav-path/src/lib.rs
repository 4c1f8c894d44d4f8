//! Document paths and their canonical text encoding.
//!
//! A [`Path`] is an ordered list of [`Segment`]s: object keys and array
//! indices. Paths encode to dot-and-bracket notation (`a.b[2].c`) for
//! display, clipboard, and any external argument, and parse back to the
//! exact same segment list.
//!
//! # Example
//!
//! ```
//! use json_nav_path::{parse_path, path, Path};
//!
//! let p = parse_path("users[0].name").unwrap();
//! assert_eq!(p, path!["users", 0, "name"]);
//! assert_eq!(p.to_string(), "users[0].name");
//! assert_eq!(p.parent(), Some(path!["users", 0]));
//! assert!(Path::root().is_ancestor_of(&p));
//! ```

use thiserror::Error;

pub mod types;
pub mod util;
pub mod validate;

pub use types::{Path, Segment};
pub use util::{format_path, is_identifier, is_valid_index, parse_path, quote_key};
pub use validate::{parse_validated, validate_path, MAX_ENCODED_LENGTH, MAX_PATH_DEPTH};

/// Errors produced when reading a path from its text form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    #[error("unexpected character {found:?} at offset {offset}")]
    Unexpected { offset: usize, found: char },
    #[error("unexpected end of path")]
    UnexpectedEnd,
    #[error("invalid array index {text:?} at offset {offset}")]
    InvalidIndex { offset: usize, text: String },
    #[error("invalid key at offset {offset}")]
    InvalidKey { offset: usize },
    #[error("path too deep: {depth} segments")]
    TooDeep { depth: usize },
    #[error("path too long: {len} bytes")]
    TooLong { len: usize },
}
