//! Canonical dot-and-bracket encoding.
//!
//! Object keys that are plain identifiers are written after a dot (`a.b`),
//! array indices are bracketed integers (`a[2]`), and every other key is a
//! bracketed JSON string literal (`a["x.y"]`, `["0"]`). The root encodes as
//! the empty string. Any path produced by the engine round-trips exactly.

use crate::types::{Path, Segment};
use crate::PathParseError;

/// Returns `true` if `key` can be written bare (after a dot).
///
/// # Example
///
/// ```
/// use json_nav_path::is_identifier;
///
/// assert!(is_identifier("name"));
/// assert!(is_identifier("_private$1"));
/// assert!(!is_identifier("0"));
/// assert!(!is_identifier("a.b"));
/// assert!(!is_identifier(""));
/// ```
pub fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Writes `key` as a JSON string literal.
pub fn quote_key(key: &str) -> String {
    // Serializing a str cannot fail.
    serde_json::to_string(key).unwrap_or_else(|_| format!("\"{key}\""))
}

/// Format segments into their canonical string.
///
/// # Example
///
/// ```
/// use json_nav_path::{format_path, Segment};
///
/// let segments = vec![
///     Segment::Key("a".into()),
///     Segment::Key("b".into()),
///     Segment::Index(2),
///     Segment::Key("c".into()),
/// ];
/// assert_eq!(format_path(&segments), "a.b[2].c");
/// assert_eq!(format_path(&[]), "");
/// assert_eq!(format_path(&[Segment::Key("x y".into())]), "[\"x y\"]");
/// ```
pub fn format_path(segments: &[Segment]) -> String {
    let mut out = String::with_capacity(segments.len() * 8);
    for (i, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Key(key) if is_identifier(key) => {
                if i > 0 {
                    out.push('.');
                }
                out.push_str(key);
            }
            Segment::Key(key) => {
                out.push('[');
                out.push_str(&quote_key(key));
                out.push(']');
            }
            Segment::Index(idx) => {
                out.push('[');
                out.push_str(&idx.to_string());
                out.push(']');
            }
        }
    }
    out
}

/// Parse a canonical path string.
///
/// # Errors
///
/// Returns a [`PathParseError`] naming the byte offset where the text stops
/// being a canonical path.
///
/// # Example
///
/// ```
/// use json_nav_path::{parse_path, path};
///
/// assert_eq!(parse_path("a.b[2].c").unwrap(), path!["a", "b", 2, "c"]);
/// assert_eq!(parse_path("").unwrap(), path![]);
/// assert_eq!(parse_path("[0][\"a.b\"]").unwrap(), path![0, "a.b"]);
/// assert!(parse_path("a..b").is_err());
/// assert!(parse_path("a[-1]").is_err());
/// ```
pub fn parse_path(text: &str) -> Result<Path, PathParseError> {
    let mut parser = Parser { text, pos: 0 };
    let mut segments = Vec::new();

    while parser.pos < text.len() {
        let first = segments.is_empty();
        match parser.peek() {
            Some('[') => segments.push(parser.bracketed()?),
            Some('.') if !first => {
                parser.pos += 1;
                segments.push(parser.identifier()?);
            }
            Some(_) if first => segments.push(parser.identifier()?),
            Some(found) => {
                return Err(PathParseError::Unexpected {
                    offset: parser.pos,
                    found,
                })
            }
            None => break,
        }
    }

    Ok(Path::new(segments))
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn rest(&self) -> &str {
        &self.text[self.pos..]
    }

    fn identifier(&mut self) -> Result<Segment, PathParseError> {
        let start = self.pos;
        let len = self
            .rest()
            .find(|c: char| c == '.' || c == '[')
            .unwrap_or(self.rest().len());
        let key = &self.text[start..start + len];
        if key.is_empty() {
            return match self.peek() {
                Some(found) => Err(PathParseError::Unexpected { offset: start, found }),
                None => Err(PathParseError::UnexpectedEnd),
            };
        }
        if !is_identifier(key) {
            return Err(PathParseError::InvalidKey { offset: start });
        }
        self.pos += len;
        Ok(Segment::Key(key.to_string()))
    }

    fn bracketed(&mut self) -> Result<Segment, PathParseError> {
        // Skip '['.
        self.pos += 1;
        let segment = match self.peek() {
            Some('"') => self.quoted()?,
            Some(_) => self.index()?,
            None => return Err(PathParseError::UnexpectedEnd),
        };
        match self.peek() {
            Some(']') => {
                self.pos += 1;
                Ok(segment)
            }
            Some(found) => Err(PathParseError::Unexpected {
                offset: self.pos,
                found,
            }),
            None => Err(PathParseError::UnexpectedEnd),
        }
    }

    fn index(&mut self) -> Result<Segment, PathParseError> {
        let start = self.pos;
        let len = self.rest().find(']').ok_or(PathParseError::UnexpectedEnd)?;
        let digits = &self.text[start..start + len];
        if !is_valid_index(digits) {
            return Err(PathParseError::InvalidIndex {
                offset: start,
                text: digits.to_string(),
            });
        }
        let idx = digits.parse().map_err(|_| PathParseError::InvalidIndex {
            offset: start,
            text: digits.to_string(),
        })?;
        self.pos += len;
        Ok(Segment::Index(idx))
    }

    fn quoted(&mut self) -> Result<Segment, PathParseError> {
        let start = self.pos;
        let mut escaped = false;
        let mut end = None;
        for (i, c) in self.rest().char_indices().skip(1) {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                end = Some(i + 1);
                break;
            }
        }
        let end = end.ok_or(PathParseError::UnexpectedEnd)?;
        let literal = &self.text[start..start + end];
        let key: String =
            serde_json::from_str(literal).map_err(|_| PathParseError::InvalidKey { offset: start })?;
        self.pos += end;
        Ok(Segment::Key(key))
    }
}

/// Check if a string represents a valid non-negative integer array index.
///
/// Leading zeros are rejected so that each index has exactly one spelling.
///
/// # Example
///
/// ```
/// use json_nav_path::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("123"));
/// assert!(!is_valid_index("007"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index("1.5"));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}
