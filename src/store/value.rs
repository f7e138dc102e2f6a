//! Value types for the key/value store

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::parse::{self, ParseError};

/// Shared empty hash returned by [`Value::object_items`] on a mismatched
/// variant, so read-only callers never have to unwrap.
static EMPTY_HASH: BTreeMap<String, Value> = BTreeMap::new();

/// The kind of a [`Value`], used as the primary sort key when comparing
/// values of different variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Kind {
    Null,
    Number,
    Boolean,
    String,
    List,
    Hash,
}

/// Represents the different types of values that can be stored.
///
/// Scalars written by commands live in `String` (the Redis convention:
/// counters are strings parsed on demand); `Number` only appears when a dump
/// file carries a bare numeric literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,

    /// UTF-8 text
    String(String),

    /// Double-precision number
    Number(f64),

    Boolean(bool),

    /// Ordered sequence, duplicates allowed
    List(Vec<Value>),

    /// Field map; iteration order is the sorted field order
    Hash(BTreeMap<String, Value>),
}

impl Value {
    /// Create a string value
    pub fn string(value: impl Into<String>) -> Self {
        Value::String(value.into())
    }

    /// Create an empty list
    pub fn empty_list() -> Self {
        Value::List(Vec::new())
    }

    /// Create an empty hash
    pub fn empty_hash() -> Self {
        Value::Hash(BTreeMap::new())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Number(_) => Kind::Number,
            Value::Boolean(_) => Kind::Boolean,
            Value::String(_) => Kind::String,
            Value::List(_) => Kind::List,
            Value::Hash(_) => Kind::Hash,
        }
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::List(_) => "list",
            Value::Hash(_) => "hash",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_hash(&self) -> bool {
        matches!(self, Value::Hash(_))
    }

    /// The string content, or `""` for any other variant.
    pub fn string_value(&self) -> &str {
        match self {
            Value::String(s) => s,
            _ => "",
        }
    }

    /// The list elements, or an empty slice for any other variant.
    pub fn array_items(&self) -> &[Value] {
        match self {
            Value::List(items) => items,
            _ => &[],
        }
    }

    /// The hash fields, or a shared empty map for any other variant.
    pub fn object_items(&self) -> &BTreeMap<String, Value> {
        match self {
            Value::Hash(fields) => fields,
            _ => &EMPTY_HASH,
        }
    }

    /// Try to get as mutable string
    pub fn as_string_mut(&mut self) -> Option<&mut String> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as mutable list
    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get as mutable hash
    pub fn as_object_mut(&mut self) -> Option<&mut BTreeMap<String, Value>> {
        match self {
            Value::Hash(fields) => Some(fields),
            _ => None,
        }
    }

    /// Appends the textual form to `out`.
    pub fn dump(&self, out: &mut String) {
        super::dump::dump_value(self, out);
    }

    /// The textual form as a fresh string.
    pub fn dump_string(&self) -> String {
        let mut out = String::new();
        self.dump(&mut out);
        out
    }

    /// Parses one value from the textual form, rejecting trailing garbage.
    pub fn parse(input: &str) -> Result<Value, ParseError> {
        parse::parse(input)
    }

    /// Parses a sequence of top-level values from a single buffer.
    pub fn parse_multi(input: &str) -> Result<Vec<Value>, ParseError> {
        parse::parse_multi(input)
    }

    /// Total ordering across all variants: variant kind first, then content.
    /// Numbers compare with `total_cmp` so the ordering holds even for
    /// payloads no command can produce.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b) {
                    match x.total_cmp(y) {
                        Ordering::Equal => continue,
                        decided => return decided,
                    }
                }
                a.len().cmp(&b.len())
            }
            (Value::Hash(a), Value::Hash(b)) => {
                for ((ka, va), (kb, vb)) in a.iter().zip(b) {
                    match ka.cmp(kb) {
                        Ordering::Equal => {}
                        decided => return decided,
                    }
                    match va.total_cmp(vb) {
                        Ordering::Equal => {}
                        decided => return decided,
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self.kind().cmp(&other.kind()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.total_cmp(other))
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Value::Hash(value)
    }
}
