//! Type definitions for document paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::util::{format_path, parse_path};
use crate::PathParseError;

/// A step in a document path.
///
/// Either a string (object key) or a non-negative integer (array index).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    /// The object key, if this segment addresses an object member.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(key) => Some(key),
            Segment::Index(_) => None,
        }
    }

    /// The array index, if this segment addresses an array element.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Key(_) => None,
            Segment::Index(idx) => Some(*idx),
        }
    }

    pub fn is_key(&self) -> bool {
        matches!(self, Segment::Key(_))
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(idx: usize) -> Self {
        Segment::Index(idx)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(idx) => write!(f, "{idx}"),
        }
    }
}

/// An address of a node inside a document.
///
/// The empty path denotes the document root. Paths are cheap value types:
/// all arithmetic (`parent`, `child`, `ancestors`) works on the segment list
/// and never touches the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The root path.
    pub fn root() -> Self {
        Self { segments: Vec::new() }
    }

    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments; the root has depth 0.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// The key of the addressed node when its last segment is an object key.
    pub fn last_key(&self) -> Option<&str> {
        self.segments.last().and_then(Segment::as_key)
    }

    /// `path[:-1]`, or `None` for the root.
    pub fn parent(&self) -> Option<Path> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Path::new(self.segments[..self.segments.len() - 1].to_vec()))
    }

    /// Splits into the parent path and the last segment.
    pub fn split_last(&self) -> Option<(Path, &Segment)> {
        let (last, init) = self.segments.split_last()?;
        Some((Path::new(init.to_vec()), last))
    }

    /// A new path one level below this one.
    pub fn child(&self, segment: impl Into<Segment>) -> Path {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment.into());
        Path::new(segments)
    }

    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.segments.push(segment.into());
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    /// The same path with its last segment swapped out.
    pub fn with_last(&self, segment: impl Into<Segment>) -> Option<Path> {
        let mut out = self.parent()?;
        out.push(segment);
        Some(out)
    }

    /// Strict ancestors, root first. The root itself has none.
    pub fn ancestors(&self) -> impl Iterator<Item = Path> + '_ {
        (0..self.segments.len()).map(move |len| Path::new(self.segments[..len].to_vec()))
    }

    /// `true` if `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.segments.len() < other.segments.len() && other.starts_with(self)
    }

    /// `true` if `prefix` is equal to, or an ancestor of, `self`.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Path::new(segments)
    }
}

impl<S: Into<Segment>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Path::new(iter.into_iter().map(Into::into).collect())
    }
}

impl AsRef<[Segment]> for Path {
    fn as_ref(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_path(&self.segments))
    }
}

impl FromStr for Path {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s)
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_path(&self.segments))
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_path(&text).map_err(serde::de::Error::custom)
    }
}

/// Builds a [`Path`] from a list of keys and indices.
///
/// ```
/// use json_nav_path::{path, Segment};
///
/// let p = path!["users", 0, "name"];
/// assert_eq!(p.segments()[1], Segment::Index(0));
/// assert_eq!(p.to_string(), "users[0].name");
/// ```
#[macro_export]
macro_rules! path {
    () => { $crate::Path::root() };
    ($($seg:expr),+ $(,)?) => {
        $crate::Path::new(vec![$($crate::Segment::from($seg)),+])
    };
}
