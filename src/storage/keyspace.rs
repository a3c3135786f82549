//! Keyspace of a single storage area.
//!
//! A keyspace keeps three aligned maps indexed by key, plus an insertion
//! order index:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Keyspace                          │
//! │  values: HashMap<String, Value>      payload             │
//! │  types:  HashMap<String, ValueType>  tag                 │
//! │  expiry: HashMap<String, i64>        deadline (epoch s)  │
//! │  order:  BTreeMap<u64, String>       first-write order   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! A key has a tag exactly when it has a value. A key without a deadline
//! never expires. `KEYS` and `SCAN` walk keys in the order they were first
//! written; overwriting a key keeps its place, deleting it gives it up.

use crate::storage::expiry::is_expired;
use crate::storage::value::{Value, ValueType};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// The three maps of one storage area.
#[derive(Debug, Default, Clone)]
pub struct Keyspace {
    values: HashMap<String, Value>,
    types: HashMap<String, ValueType>,
    expiry: HashMap<String, i64>,
    order: BTreeMap<u64, String>,
    positions: HashMap<String, u64>,
    next_position: u64,
}

/// A cloned view of a keyspace, for inspection in tests.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyspaceSnapshot {
    /// Keys in insertion order
    pub order: Vec<String>,
    pub values: HashMap<String, Value>,
    pub types: HashMap<String, ValueType>,
    pub expiry: HashMap<String, i64>,
}

impl Keyspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored value, ignoring expiry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns the stored value mutably, ignoring expiry.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.values.get_mut(key)
    }

    /// Evicts the key if its deadline has passed, then returns its value.
    pub fn live(&mut self, key: &str, now: i64) -> Option<&Value> {
        self.touch_expiry(key, now);
        self.values.get(key)
    }

    /// Mutable counterpart of [`Keyspace::live`].
    pub fn live_mut(&mut self, key: &str, now: i64) -> Option<&mut Value> {
        self.touch_expiry(key, now);
        self.values.get_mut(key)
    }

    /// Stores a value and its tag. Any deadline on the key is kept.
    pub fn put(&mut self, key: &str, value: Value) {
        if !self.positions.contains_key(key) {
            let position = self.next_position;
            self.next_position += 1;
            self.positions.insert(key.to_string(), position);
            self.order.insert(position, key.to_string());
        }
        self.types.insert(key.to_string(), value.value_type());
        self.values.insert(key.to_string(), value);
    }

    /// Removes a key from all three maps.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        if let Some(position) = self.positions.remove(key) {
            self.order.remove(&position);
        }
        self.types.remove(key);
        self.expiry.remove(key);
        self.values.remove(key)
    }

    /// Removes a key and reports how many elements went with it.
    ///
    /// Scalars count as one, containers count their elements, and an absent
    /// key counts as zero.
    pub fn delete(&mut self, key: &str) -> usize {
        self.remove(key).map(|value| value.len()).unwrap_or(0)
    }

    /// Applies lazy expiry to one key.
    ///
    /// Returns `true` if the key had expired and was deleted.
    pub fn touch_expiry(&mut self, key: &str, now: i64) -> bool {
        match self.expiry.get(key) {
            Some(&deadline) if is_expired(deadline, now) => {
                self.remove(key);
                debug!(key, deadline, "Evicted expired key");
                true
            }
            _ => false,
        }
    }

    /// Sets an absolute deadline on a key.
    pub fn set_expiry(&mut self, key: &str, deadline: i64) {
        self.expiry.insert(key.to_string(), deadline);
    }

    /// Drops the deadline of a key, making it persistent.
    pub fn clear_expiry(&mut self, key: &str) {
        self.expiry.remove(key);
    }

    /// The deadline of a key, if any.
    pub fn expiry_of(&self, key: &str) -> Option<i64> {
        self.expiry.get(key).copied()
    }

    /// The tag of a key, if any.
    pub fn type_of(&self, key: &str) -> Option<ValueType> {
        self.types.get(key).copied()
    }

    /// Applies lazy expiry to every key. Returns the number of evictions.
    pub fn purge_expired(&mut self, now: i64) -> usize {
        let expired: Vec<String> = self
            .expiry
            .iter()
            .filter(|&(_, &deadline)| is_expired(deadline, now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
        }

        if !expired.is_empty() {
            debug!(count = expired.len(), "Purged expired keys");
        }
        expired.len()
    }

    /// Deletes a container key once it holds no elements.
    pub fn remove_if_empty(&mut self, key: &str) {
        if self.values.get(key).is_some_and(Value::is_empty) {
            self.remove(key);
        }
    }

    /// Discards all three maps.
    pub fn reset(&mut self) {
        self.values.clear();
        self.types.clear();
        self.expiry.clear();
        self.order.clear();
        self.positions.clear();
        self.next_position = 0;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Keys in positional (insertion) order.
    pub fn keys(&self) -> std::collections::btree_map::Values<'_, u64, String> {
        self.order.values()
    }

    pub fn snapshot(&self) -> KeyspaceSnapshot {
        KeyspaceSnapshot {
            order: self.order.values().cloned().collect(),
            values: self.values.clone(),
            types: self.types.clone(),
            expiry: self.expiry.clone(),
        }
    }
}
