//! Hash commands.

use super::Engine;
use crate::protocol::Reply;
use crate::storage::{Keyspace, Scalar, Value};
use std::collections::BTreeMap;

impl Engine {
    /// HSET key field value
    ///
    /// Answers `1` for a new field, `0` for an overwrite. Any deadline on
    /// the key is dropped.
    pub fn hset(&mut self, key: &str, field: &str, value: impl Into<Scalar>) -> Reply {
        let value = value.into();
        let reply = self.with_keyspace(|ks, now| {
            match write_fields(ks, key, now, [(field, value)], true) {
                Some(created) => Reply::integer(created as i64),
                None => Reply::Null,
            }
        });
        self.reply(reply)
    }

    /// HSETNX key field value
    pub fn hsetnx(&mut self, key: &str, field: &str, value: impl Into<Scalar>) -> Reply {
        let value = value.into();
        let reply = self.with_keyspace(|ks, now| {
            match write_fields(ks, key, now, [(field, value)], false) {
                Some(created) => Reply::integer(created as i64),
                None => Reply::Null,
            }
        });
        self.reply(reply)
    }

    /// HMSET key field value [field value ...]
    pub fn hmset<F, V>(&mut self, key: &str, pairs: &[(F, V)]) -> Reply
    where
        F: AsRef<str>,
        V: Clone + Into<Scalar>,
    {
        let reply = self.with_keyspace(|ks, now| {
            let fields = pairs.iter().map(|(field, value)| {
                let field: &str = field.as_ref();
                let value: Scalar = value.clone().into();
                (field, value)
            });
            match write_fields(ks, key, now, fields, true) {
                Some(_) => Reply::ok(),
                None => Reply::Null,
            }
        });
        self.reply(reply)
    }

    /// HGET key field
    pub fn hget(&mut self, key: &str, field: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            Some(Value::Hash(fields)) => {
                Reply::bulk_or_null(fields.get(field).map(|v| v.to_string()))
            }
            _ => Reply::Null,
        });
        self.reply(reply)
    }

    /// HMGET key field [field ...]
    ///
    /// Answers a field to value map, `Null` for each missing field.
    pub fn hmget<F: AsRef<str>>(&mut self, key: &str, fields: &[F]) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            let hash = match ks.live(key, now) {
                Some(Value::Hash(hash)) => Some(hash),
                _ => None,
            };
            Reply::map(
                fields
                    .iter()
                    .map(|field| {
                        let field: &str = field.as_ref();
                        let value = hash
                            .and_then(|h| h.get(field))
                            .map(|v| v.to_string());
                        (field.to_string(), Reply::bulk_or_null(value))
                    })
                    .collect(),
            )
        });
        self.reply(reply)
    }

    /// HDEL key field [field ...]
    pub fn hdel<F: AsRef<str>>(&mut self, key: &str, fields: &[F]) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            let removed = match ks.live_mut(key, now) {
                None => return Reply::integer(0),
                Some(Value::Hash(hash)) => fields
                    .iter()
                    .filter(|field| {
                        let field: &str = field.as_ref();
                        hash.remove(field).is_some()
                    })
                    .count(),
                Some(_) => return Reply::Null,
            };
            ks.remove_if_empty(key);
            Reply::integer(removed as i64)
        });
        self.reply(reply)
    }

    /// HKEYS key
    pub fn hkeys(&mut self, key: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            Some(Value::Hash(hash)) => Reply::strings(hash.keys().cloned()),
            _ => Reply::array(vec![]),
        });
        self.reply(reply)
    }

    /// HLEN key
    pub fn hlen(&mut self, key: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            Some(Value::Hash(hash)) => Reply::integer(hash.len() as i64),
            _ => Reply::integer(0),
        });
        self.reply(reply)
    }

    /// HGETALL key
    ///
    /// Every value is rendered as text.
    pub fn hgetall(&mut self, key: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            Some(Value::Hash(hash)) => Reply::map(
                hash.iter()
                    .map(|(field, value)| (field.clone(), Reply::bulk(value.to_string())))
                    .collect(),
            ),
            _ => Reply::map(vec![]),
        });
        self.reply(reply)
    }

    /// HEXISTS key field
    pub fn hexists(&mut self, key: &str, field: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            Some(Value::Hash(hash)) if hash.contains_key(field) => Reply::integer(1),
            _ => Reply::integer(0),
        });
        self.reply(reply)
    }

    /// HINCRBY key field increment
    ///
    /// A field holding something other than an integer answers `Null` and
    /// stays as it is.
    pub fn hincrby(&mut self, key: &str, field: &str, increment: i64) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            let current = match ks.live(key, now) {
                None => 0,
                Some(Value::Hash(hash)) => match hash.get(field) {
                    None => 0,
                    Some(value) => match value.as_int() {
                        Some(n) => n,
                        None => return Reply::Null,
                    },
                },
                Some(_) => return Reply::Null,
            };
            let Some(next) = current.checked_add(increment) else {
                return Reply::Null;
            };

            if ks.get(key).is_none() {
                ks.put(key, Value::Hash(BTreeMap::new()));
            }
            if let Some(Value::Hash(hash)) = ks.get_mut(key) {
                hash.insert(field.to_string(), Scalar::Int(next));
            }
            Reply::integer(next)
        });
        self.reply(reply)
    }
}

/// Writes fields into a hash key, creating it if needed.
///
/// With `overwrite` unset, existing fields are left alone. Returns the
/// number of fields created, or `None` if the key holds another type. The
/// key's deadline is dropped whenever something is written.
fn write_fields<'a>(
    ks: &mut Keyspace,
    key: &str,
    now: i64,
    fields: impl IntoIterator<Item = (&'a str, Scalar)>,
    overwrite: bool,
) -> Option<usize> {
    let mut hash = match ks.live(key, now) {
        None => BTreeMap::new(),
        Some(Value::Hash(hash)) => hash.clone(),
        Some(_) => return None,
    };

    let mut created = 0;
    let mut written = false;
    for (field, value) in fields {
        let is_new = !hash.contains_key(field);
        if is_new || overwrite {
            hash.insert(field.to_string(), value);
            written = true;
        }
        if is_new {
            created += 1;
        }
    }

    if written {
        ks.put(key, Value::Hash(hash));
        ks.clear_expiry(key);
    }
    Some(created)
}
