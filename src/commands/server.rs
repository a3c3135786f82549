//! Server, scripting stubs and bit commands.
//!
//! Bits are held as an offset to bit map instead of a packed byte string,
//! so `BITCOUNT` counts set offsets rather than scanning bytes.

use super::Engine;
use crate::error::{EmulatorError, Result};
use crate::protocol::Reply;
use crate::storage::Value;
use std::collections::BTreeMap;
use tracing::{debug, trace};

impl Engine {
    /// DBSIZE
    ///
    /// Expired keys are purged before counting.
    pub fn dbsize(&mut self) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            ks.purge_expired(now);
            Reply::integer(ks.len() as i64)
        });
        self.reply(reply)
    }

    /// FLUSHDB
    pub fn flushdb(&mut self) -> Reply {
        self.reset();
        self.reply(Reply::ok())
    }

    /// Empties the current storage area. Unlike `FLUSHDB`, nothing is
    /// answered or buffered.
    pub fn reset(&mut self) {
        let dropped = self.with_keyspace(|ks, _now| {
            let dropped = ks.len();
            ks.reset();
            dropped
        });
        debug!(storage = %self.storage, dropped, "Storage area flushed");
    }

    /// Points this handle at another storage area, creating it on first
    /// use. Buffering state is kept.
    pub fn select_storage(&mut self, name: &str) {
        if name == self.storage {
            return;
        }
        self.area = self.registry.area(name);
        self.storage = name.to_string();
        debug!(storage = name, "Storage area selected");
    }

    /// QUIT
    pub fn quit(&mut self) -> Reply {
        Reply::ok()
    }

    /// MONITOR is accepted and does nothing.
    pub fn monitor(&mut self) {}

    /// EVAL script [arg ...]
    ///
    /// Scripts are not run. Always answers `Null`.
    pub fn eval<A: AsRef<str>>(&mut self, script: &str, args: &[A]) -> Reply {
        trace!(script_len = script.len(), args = args.len(), "EVAL ignored");
        Reply::Null
    }

    /// EVALSHA sha1 [arg ...]
    pub fn evalsha<A: AsRef<str>>(&mut self, sha: &str, args: &[A]) -> Reply {
        trace!(sha, args = args.len(), "EVALSHA ignored");
        Reply::Null
    }

    /// SETBIT key offset value
    ///
    /// Answers the bit previously stored at `offset`. `value` must be 0
    /// or 1.
    pub fn setbit(&mut self, key: &str, offset: u64, value: u8) -> Result<Reply> {
        if value > 1 {
            return Err(EmulatorError::invalid(format!(
                "bit is not an integer or out of range: {}",
                value
            )));
        }
        let reply = self.with_keyspace(|ks, now| {
            let previous = match ks.live_mut(key, now) {
                Some(Value::Bits(bits)) => bits.insert(offset, value).unwrap_or(0),
                Some(_) => return Reply::Null,
                None => {
                    ks.put(key, Value::Bits(BTreeMap::from([(offset, value)])));
                    0
                }
            };
            Reply::integer(i64::from(previous))
        });
        Ok(self.reply(reply))
    }

    /// GETBIT key offset
    pub fn getbit(&mut self, key: &str, offset: u64) -> Reply {
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            Some(Value::Bits(bits)) => {
                Reply::integer(i64::from(bits.get(&offset).copied().unwrap_or(0)))
            }
            _ => Reply::integer(0),
        });
        self.reply(reply)
    }

    /// BITCOUNT key
    pub fn bitcount(&mut self, key: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            Some(Value::Bits(bits)) => {
                Reply::integer(bits.values().filter(|&&bit| bit == 1).count() as i64)
            }
            _ => Reply::integer(0),
        });
        self.reply(reply)
    }
}
