//! Scalar commands.

use super::{Engine, SetOptions};
use crate::protocol::Reply;
use crate::storage::{Keyspace, Scalar, Value};

impl Engine {
    /// GET key
    pub fn get(&mut self, key: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| read_scalar(ks, key, now));
        self.reply(reply)
    }

    /// SET key value
    pub fn set(&mut self, key: &str, value: impl Into<Scalar>) -> Reply {
        self.set_with(key, value, &SetOptions::default())
    }

    /// SET key value [NX|XX] [EX seconds|PX milliseconds]
    ///
    /// A failed `NX`/`XX` condition answers `0` and writes nothing. Without
    /// `EX`/`PX` the key keeps whatever deadline it already had.
    pub fn set_with(&mut self, key: &str, value: impl Into<Scalar>, options: &SetOptions) -> Reply {
        let value = value.into();
        let reply = self.with_keyspace(|ks, now| {
            ks.touch_expiry(key, now);
            let exists = ks.contains(key);
            if (options.nx && exists) || (options.xx && !exists) {
                return Reply::integer(0);
            }
            let deadline = options.ttl_secs().map(|ttl| now.saturating_add(ttl));
            write_scalar(ks, key, value, deadline);
            Reply::ok()
        });
        self.reply(reply)
    }

    /// SETNX key value
    pub fn setnx(&mut self, key: &str, value: impl Into<Scalar>) -> Reply {
        let value = value.into();
        let reply = self.with_keyspace(|ks, now| {
            ks.touch_expiry(key, now);
            if ks.contains(key) {
                Reply::integer(0)
            } else {
                write_scalar(ks, key, value, None);
                Reply::integer(1)
            }
        });
        self.reply(reply)
    }

    /// SETEX key seconds value
    pub fn setex(&mut self, key: &str, seconds: i64, value: impl Into<Scalar>) -> Reply {
        self.set_with(key, value, &SetOptions::default().expire_in(seconds))
    }

    /// MSET key value [key value ...]
    ///
    /// Contributes a single reply even while buffering.
    pub fn mset<K, V>(&mut self, pairs: &[(K, V)]) -> Reply
    where
        K: AsRef<str>,
        V: Clone + Into<Scalar>,
    {
        self.with_keyspace(|ks, _now| {
            for (key, value) in pairs {
                write_scalar(ks, key.as_ref(), value.clone().into(), None);
            }
        });
        self.reply(Reply::ok())
    }

    /// MGET key [key ...]
    pub fn mget<K: AsRef<str>>(&mut self, keys: &[K]) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            Reply::array(
                keys.iter()
                    .map(|key| read_scalar(ks, key.as_ref(), now))
                    .collect(),
            )
        });
        self.reply(reply)
    }

    /// INCR key
    pub fn incr(&mut self, key: &str) -> Reply {
        self.incrby(key, 1)
    }

    /// INCRBY key increment
    ///
    /// A missing key starts from `0`. A value that is not an integer answers
    /// `Null` and stays as it is.
    pub fn incrby(&mut self, key: &str, increment: i64) -> Reply {
        self.step_int(key, |current| current.checked_add(increment))
    }

    /// DECR key
    pub fn decr(&mut self, key: &str) -> Reply {
        self.decrby(key, 1)
    }

    /// DECRBY key decrement
    pub fn decrby(&mut self, key: &str, decrement: i64) -> Reply {
        self.step_int(key, |current| current.checked_sub(decrement))
    }

    /// INCRBYFLOAT key increment
    ///
    /// The new value is answered as text. A value that is not a float
    /// answers `Null` and stays as it is.
    pub fn incrbyfloat(&mut self, key: &str, increment: f64) -> Reply {
        self.step_float(key, |current| current + increment)
    }

    /// DECRBYFLOAT key decrement
    pub fn decrbyfloat(&mut self, key: &str, decrement: f64) -> Reply {
        self.step_float(key, |current| current - decrement)
    }

    fn step_int(&mut self, key: &str, step: impl FnOnce(i64) -> Option<i64>) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            let current = match ks.live(key, now) {
                None => 0,
                Some(Value::Scalar(scalar)) => match scalar.as_int() {
                    Some(n) => n,
                    None => return Reply::Null,
                },
                Some(_) => return Reply::Null,
            };
            match step(current) {
                Some(next) => {
                    ks.put(key, Scalar::Int(next).into());
                    Reply::integer(next)
                }
                None => Reply::Null,
            }
        });
        self.reply(reply)
    }

    fn step_float(&mut self, key: &str, step: impl FnOnce(f64) -> f64) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            let current = match ks.live(key, now) {
                None => 0.0,
                Some(Value::Scalar(scalar)) => match scalar.as_float() {
                    Some(n) => n,
                    None => return Reply::Null,
                },
                Some(_) => return Reply::Null,
            };
            let next = step(current);
            ks.put(key, Scalar::Float(next).into());
            Reply::bulk(Scalar::Float(next).to_string())
        });
        self.reply(reply)
    }
}

fn read_scalar(ks: &mut Keyspace, key: &str, now: i64) -> Reply {
    match ks.live(key, now) {
        Some(Value::Scalar(scalar)) => Reply::bulk(scalar.to_string()),
        _ => Reply::Null,
    }
}

/// Replaces a key with a scalar. The old deadline stays unless a new one is
/// given.
fn write_scalar(ks: &mut Keyspace, key: &str, value: Scalar, deadline: Option<i64>) {
    ks.put(key, value.into());
    if let Some(deadline) = deadline {
        ks.set_expiry(key, deadline);
    }
}
