//! Value payloads stored in a keyspace.
//!
//! A key holds exactly one [`Value`]. The variant *is* the type: type checks
//! in the command layer are a single `match` on it.

use crate::storage::member_set::MemberSet;
use crate::storage::sorted_set::SortedSet;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

/// A scalar payload.
///
/// The numeric kind is remembered so that integer and float counters can
/// refuse to operate on each other's values.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Integer counter or integer literal
    Int(i64),
    /// Float counter or float literal
    Float(f64),
    /// Arbitrary text
    Text(String),
}

impl Scalar {
    /// Reads the value as an integer counter.
    ///
    /// Integers qualify, and so does text that parses as an integer.
    /// Floats never do.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            Scalar::Text(s) => s.parse().ok(),
            Scalar::Float(_) => None,
        }
    }

    /// Reads the value as a float counter.
    ///
    /// Floats qualify, and so does text that parses as a number.
    /// Integers never do.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(n) => Some(*n),
            Scalar::Text(s) => s.parse().ok().filter(|n: &f64| !n.is_nan()),
            Scalar::Int(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Int(n as i64)
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Float(n)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Int(b as i64)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<&String> for Scalar {
    fn from(s: &String) -> Self {
        Scalar::Text(s.clone())
    }
}

/// The type tag recorded for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    List,
    Set,
    Hash,
    ZSet,
}

impl ValueType {
    /// The name reported by `TYPE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::List => "list",
            ValueType::Set => "set",
            ValueType::Hash => "hash",
            ValueType::ZSet => "zset",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A single scalar
    Scalar(Scalar),
    /// Ordered sequence, duplicates allowed
    List(VecDeque<String>),
    /// Unique members in insertion order (positional for `SSCAN`)
    Set(MemberSet),
    /// Field to scalar mapping
    Hash(BTreeMap<String, Scalar>),
    /// Member to score mapping kept in score order
    SortedSet(SortedSet),
    /// Offset to bit mapping used by the bit commands
    Bits(BTreeMap<u64, u8>),
}

impl Value {
    /// The tag recorded alongside this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Scalar(_) | Value::Bits(_) => ValueType::String,
            Value::List(_) => ValueType::List,
            Value::Set(_) => ValueType::Set,
            Value::Hash(_) => ValueType::Hash,
            Value::SortedSet(_) => ValueType::ZSet,
        }
    }

    /// Number of elements this value accounts for on deletion.
    ///
    /// Scalars count as one; containers count their elements.
    pub fn len(&self) -> usize {
        match self {
            Value::Scalar(_) => 1,
            Value::List(items) => items.len(),
            Value::Set(members) => members.len(),
            Value::Hash(fields) => fields.len(),
            Value::SortedSet(zset) => zset.len(),
            Value::Bits(bits) => bits.len(),
        }
    }

    /// True for a container holding no elements. Scalars are never empty.
    pub fn is_empty(&self) -> bool {
        !matches!(self, Value::Scalar(_)) && self.len() == 0
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}
