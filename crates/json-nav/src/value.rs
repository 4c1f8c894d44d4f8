//! The document value tree.
//!
//! A [`Value`] is either a [`Scalar`] leaf or a container. Containers hold
//! their children behind an [`Arc`], so cloning a value is O(1) and a
//! mutation that rebuilds one path shares every untouched subtree with the
//! previous root. Once built, a value is never mutated in place.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use json_nav_path::Segment;
use serde_json::Number;

/// Object members, in insertion order.
pub type Object = IndexMap<String, Value>;

/// Array elements.
pub type Array = Vec<Value>;

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    /// The textual form used for display and search.
    ///
    /// Strings are returned without quotes.
    pub fn canonical_text(&self) -> String {
        match self {
            Scalar::Null => "null".to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::String(s) => s.clone(),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Scalar::Null => Kind::Null,
            Scalar::Bool(_) => Kind::Bool,
            Scalar::Number(_) => Kind::Number,
            Scalar::String(_) => Kind::String,
        }
    }
}

/// The shape of a value, for error reporting and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Object,
    Array,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Object => "object",
            Kind::Array => "array",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JSON-shaped document tree.
#[derive(Debug, Clone)]
pub enum Value {
    Scalar(Scalar),
    Object(Arc<Object>),
    Array(Arc<Array>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Scalar(Scalar::Null)
    }
}

impl Value {
    // ── Constructors ──────────────────────────────────────────────────────

    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    pub fn bool(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }

    pub fn number(n: impl Into<Number>) -> Self {
        Value::Scalar(Scalar::Number(n.into()))
    }

    /// A float number, or `None` if `f` is not finite.
    pub fn from_f64(f: f64) -> Option<Self> {
        Number::from_f64(f).map(|n| Value::Scalar(Scalar::Number(n)))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::Scalar(Scalar::String(s.into()))
    }

    pub fn empty_object() -> Self {
        Value::Object(Arc::new(Object::new()))
    }

    pub fn empty_array() -> Self {
        Value::Array(Arc::new(Array::new()))
    }

    pub fn object<K, I>(members: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(Arc::new(
            members.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn array<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Array(Arc::new(items.into_iter().collect()))
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn kind(&self) -> Kind {
        match self {
            Value::Scalar(s) => s.kind(),
            Value::Object(_) => Kind::Object,
            Value::Array(_) => Kind::Array,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    pub fn is_container(&self) -> bool {
        !self.is_scalar()
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// The direct child addressed by `segment`, if any.
    pub fn child(&self, segment: &Segment) -> Option<&Value> {
        match (self, segment) {
            (Value::Object(map), Segment::Key(key)) => map.get(key),
            (Value::Array(items), Segment::Index(idx)) => items.get(*idx),
            _ => None,
        }
    }

    /// Direct children with the segment that addresses each, in order.
    pub fn children(&self) -> Box<dyn Iterator<Item = (Segment, &Value)> + '_> {
        match self {
            Value::Scalar(_) => Box::new(std::iter::empty()),
            Value::Object(map) => Box::new(map.iter().map(|(k, v)| (Segment::Key(k.clone()), v))),
            Value::Array(items) => Box::new(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (Segment::Index(i), v)),
            ),
        }
    }

    /// Number of direct children; 0 for scalars.
    pub fn len(&self) -> usize {
        match self {
            Value::Scalar(_) => 0,
            Value::Object(map) => map.len(),
            Value::Array(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of nodes in the tree, including this one.
    pub fn node_count(&self) -> usize {
        1 + match self {
            Value::Scalar(_) => 0,
            Value::Object(map) => map.values().map(Value::node_count).sum(),
            Value::Array(items) => items.iter().map(Value::node_count).sum(),
        }
    }

    /// `true` if both values are the same container allocation.
    ///
    /// Scalars never share storage, so this is always `false` for them.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Deep equality. Object member order is significant.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|((ka, va), (kb, vb))| ka == kb && va == vb)
            }
            (Value::Array(a), Value::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::number(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::null(),
            serde_json::Value::Bool(b) => Value::bool(b),
            serde_json::Value::Number(n) => Value::Scalar(Scalar::Number(n)),
            serde_json::Value::String(s) => Value::string(s),
            serde_json::Value::Array(items) => Value::array(items.into_iter().map(Value::from)),
            serde_json::Value::Object(map) => {
                Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Scalar(Scalar::Null) => serde_json::Value::Null,
            Value::Scalar(Scalar::Bool(b)) => serde_json::Value::Bool(*b),
            Value::Scalar(Scalar::Number(n)) => serde_json::Value::Number(n.clone()),
            Value::Scalar(Scalar::String(s)) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}
