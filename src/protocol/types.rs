//! Command Reply Types
//!
//! Every command of the engine answers with a [`Reply`]. The variants mirror
//! the shapes a Redis client library hands back to its caller:
//!
//! - `Status`: short status text such as `OK` or a type name
//! - `Null`: the null sentinel (missing key, wrong type, out of range)
//! - `Integer`: counts, lengths, flags, integer counters
//! - `Float`: numeric sorted-set scores returned by `ZINCRBY`
//! - `Bulk`: string payloads
//! - `Array`: ordered sequences (nested for `SCAN`)
//! - `Map`: ordered field/value pairs (`HGETALL`, `WITHSCORES`)
//! - `Queued`: placeholder handed back while buffering is active
//!
//! ## Display
//!
//! `Display` renders a reply the way `redis-cli` prints it:
//!
//! ```text
//! (integer) 3
//! (nil)
//! 1) "a"
//! 2) "b"
//! ```

use std::fmt;

/// The uniform result of an engine command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Status text (`OK`, `string`, `none`, ...)
    Status(String),

    /// Null sentinel
    Null,

    /// 64-bit signed integer
    Integer(i64),

    /// Floating point number
    Float(f64),

    /// String payload
    Bulk(String),

    /// Ordered sequence of replies
    Array(Vec<Reply>),

    /// Ordered mapping from names to replies
    Map(Vec<(String, Reply)>),

    /// The command was accepted into the active transaction or pipeline
    Queued,
}

impl Reply {
    /// Creates a status reply.
    pub fn status(s: impl Into<String>) -> Self {
        Reply::Status(s.into())
    }

    /// Creates an integer reply.
    pub fn integer(n: i64) -> Self {
        Reply::Integer(n)
    }

    /// Creates a float reply.
    pub fn float(n: f64) -> Self {
        Reply::Float(n)
    }

    /// Creates a bulk string reply.
    ///
    /// # Example
    /// ```
    /// use kvmock::protocol::Reply;
    /// let bulk = Reply::bulk("hello");
    /// assert_eq!(bulk.as_str(), Some("hello"));
    /// ```
    pub fn bulk(s: impl Into<String>) -> Self {
        Reply::Bulk(s.into())
    }

    /// Creates a null reply.
    pub fn null() -> Self {
        Reply::Null
    }

    /// Creates an array reply.
    pub fn array(values: Vec<Reply>) -> Self {
        Reply::Array(values)
    }

    /// Creates an array of bulk strings.
    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Reply::Array(items.into_iter().map(|s| Reply::Bulk(s.into())).collect())
    }

    /// Creates a map reply.
    pub fn map(pairs: Vec<(String, Reply)>) -> Self {
        Reply::Map(pairs)
    }

    /// `Bulk` when present, `Null` otherwise.
    pub fn bulk_or_null(value: Option<String>) -> Self {
        value.map(Reply::Bulk).unwrap_or(Reply::Null)
    }

    /// Common response for successful operations
    pub fn ok() -> Self {
        Reply::Status("OK".to_string())
    }

    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Reply::Null)
    }

    /// Returns true if this reply is the buffering placeholder.
    pub fn is_queued(&self) -> bool {
        matches!(self, Reply::Queued)
    }

    /// Attempts to extract the inner string from `Status` or `Bulk`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Reply::Status(s) | Reply::Bulk(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract the inner integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Reply::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to read a number from `Float`, `Integer` or a numeric `Bulk`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Reply::Float(n) => Some(*n),
            Reply::Integer(n) => Some(*n as f64),
            Reply::Bulk(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Attempts to extract the inner array.
    pub fn as_array(&self) -> Option<&[Reply]> {
        match self {
            Reply::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Attempts to extract the inner map.
    pub fn as_map(&self) -> Option<&[(String, Reply)]> {
        match self {
            Reply::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Consumes self and returns the inner array if this is an `Array`.
    pub fn into_array(self) -> Option<Vec<Reply>> {
        match self {
            Reply::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Flattens an array of string replies into owned strings.
    ///
    /// Returns `None` if this is not an array or an element is not textual.
    pub fn into_strings(self) -> Option<Vec<String>> {
        self.into_array()?
            .into_iter()
            .map(|r| match r {
                Reply::Bulk(s) | Reply::Status(s) => Some(s),
                _ => None,
            })
            .collect()
    }
}

impl From<Option<String>> for Reply {
    fn from(value: Option<String>) -> Self {
        Reply::bulk_or_null(value)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Status(s) => write!(f, "{}", s),
            Reply::Null => write!(f, "(nil)"),
            Reply::Integer(n) => write!(f, "(integer) {}", n),
            Reply::Float(n) => write!(f, "(double) {}", n),
            Reply::Bulk(s) => write!(f, "\"{}\"", s),
            Reply::Queued => write!(f, "QUEUED"),
            Reply::Array(values) => {
                if values.is_empty() {
                    return write!(f, "(empty array)");
                }
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {}", i + 1, v)?;
                }
                Ok(())
            }
            Reply::Map(pairs) => {
                if pairs.is_empty() {
                    return write!(f, "(empty hash)");
                }
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}# \"{}\" => {}", i + 1, k, v)?;
                }
                Ok(())
            }
        }
    }
}
