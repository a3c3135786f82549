//! Command Engine
//!
//! [`Engine`] is the command surface. Each command locks its storage area
//! once, applies lazy expiry to the keys it touches, runs to completion,
//! and hands its reply to the handle's [`ResultBuffer`].
//!
//! ## Architecture
//!
//! ```text
//! caller ──> Engine::<command>() ──> Keyspace (locked, lazy expiry)
//!                   │
//!                   ▼
//!             ResultBuffer ──> Reply            (direct)
//!                          └─> Reply::Queued    (MULTI / PIPELINE)
//! ```
//!
//! Commands are grouped by category, one `impl Engine` block per file:
//!
//! - `string`: `GET`, `SET`, `SETNX`, `SETEX`, `MGET`, `MSET`, `INCR*`, `DECR*`
//! - `key`: `TTL`, `EXPIRE`, `EXPIREAT`, `TYPE`, `EXISTS`, `DEL`, `KEYS`, `SCAN`
//! - `list`: `LPUSH`, `RPUSH`, `LPOP`, `RPOP`, `LLEN`, `LINDEX`, `LRANGE`,
//!   `LTRIM`, `LREM`, `RPOPLPUSH`
//! - `set`: `SADD`, `SREM`, `SMEMBERS`, `SCARD`, `SISMEMBER`, `SUNION`,
//!   `SINTER`, `SDIFF`, `SSCAN`
//! - `hash`: `HSET`, `HSETNX`, `HMSET`, `HGET`, `HMGET`, `HDEL`, `HKEYS`,
//!   `HLEN`, `HGETALL`, `HEXISTS`, `HINCRBY`
//! - `zset`: `ZADD`, `ZSCORE`, `ZCARD`, `ZCOUNT`, `ZINCRBY`, `ZRANGE`,
//!   `ZREVRANGE`, `ZRANGEBYSCORE`, `ZREVRANGEBYSCORE`, `ZRANK`, `ZREVRANK`,
//!   `ZREM`, `ZREMRANGEBYSCORE`, `ZUNIONSTORE`
//! - `server`: `DBSIZE`, `FLUSHDB`, `QUIT`, `MONITOR`, `EVAL`, `EVALSHA`,
//!   `SETBIT`, `GETBIT`, `BITCOUNT`
//! - `transaction`: `MULTI`, `EXEC`, `DISCARD`, `WATCH`, `UNWATCH`,
//!   `PIPELINE`, `EXECUTE`
//!
//! The textual front end lives in `handler`.

pub mod buffer;
pub mod handler;

mod hash;
mod key;
mod list;
mod server;
mod set;
mod string;
mod transaction;
mod zset;

pub use buffer::{BufferMode, ResultBuffer};
pub use handler::CommandHandler;

use crate::config::EmulatorConfig;
use crate::protocol::Reply;
use crate::storage::{lock_area, Aggregate, Area, Keyspace, KeyspaceSnapshot, Registry};
use std::sync::Arc;

/// A command handle bound to one storage area of a [`Registry`].
///
/// Handles sharing a registry and an area name see the same keys. Buffering
/// state belongs to the handle.
///
/// # Example
///
/// ```
/// use kvmock::commands::Engine;
/// use kvmock::protocol::Reply;
/// use kvmock::storage::Registry;
/// use std::sync::Arc;
///
/// let registry = Arc::new(Registry::new());
/// let mut engine = Engine::new(Arc::clone(&registry));
///
/// engine.set("greeting", "hello");
/// assert_eq!(engine.get("greeting"), Reply::bulk("hello"));
///
/// let mut other = Engine::new(registry);
/// assert_eq!(other.get("greeting"), Reply::bulk("hello"));
/// ```
#[derive(Debug)]
pub struct Engine {
    registry: Arc<Registry>,
    storage: String,
    area: Area,
    config: EmulatorConfig,
    buffer: ResultBuffer,
}

impl Engine {
    /// Creates a handle bound to the default (empty-named) storage area.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_config(registry, EmulatorConfig::default())
    }

    /// Creates a handle bound to `config.default_storage`.
    pub fn with_config(registry: Arc<Registry>, config: EmulatorConfig) -> Self {
        let area = registry.area(&config.default_storage);
        Self {
            storage: config.default_storage.clone(),
            registry,
            area,
            config,
            buffer: ResultBuffer::new(),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Name of the storage area commands currently target.
    pub fn storage(&self) -> &str {
        &self.storage
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    /// Current buffering mode of this handle.
    pub fn mode(&self) -> BufferMode {
        self.buffer.mode()
    }

    /// Cloned view of the current area's values, tags and deadlines.
    pub fn snapshot(&self) -> KeyspaceSnapshot {
        lock_area(&self.area).snapshot()
    }

    /// Runs `f` with the area locked and the current time.
    pub(crate) fn with_keyspace<T>(&self, f: impl FnOnce(&mut Keyspace, i64) -> T) -> T {
        let now = self.registry.now();
        let mut keyspace = lock_area(&self.area);
        f(&mut keyspace, now)
    }

    /// Hands a reply to the buffer.
    pub(crate) fn reply(&mut self, reply: Reply) -> Reply {
        self.buffer.record(reply)
    }
}

/// Options of `SET`.
///
/// `px` is converted to whole seconds by truncating division. When both
/// `ex` and `px` are given, `ex` wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Only write if the key is absent
    pub nx: bool,
    /// Only write if the key is present
    pub xx: bool,
    /// Expire after this many seconds
    pub ex: Option<i64>,
    /// Expire after this many milliseconds
    pub px: Option<i64>,
}

impl SetOptions {
    pub fn only_if_absent(mut self) -> Self {
        self.nx = true;
        self
    }

    pub fn only_if_present(mut self) -> Self {
        self.xx = true;
        self
    }

    pub fn expire_in(mut self, seconds: i64) -> Self {
        self.ex = Some(seconds);
        self
    }

    pub fn expire_in_ms(mut self, millis: i64) -> Self {
        self.px = Some(millis);
        self
    }

    /// Lifetime in seconds, if any.
    pub(crate) fn ttl_secs(&self) -> Option<i64> {
        self.ex.or(self.px.map(|ms| ms / 1000))
    }
}

/// Options of `SCAN` and `SSCAN`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Glob filter, `*` when absent
    pub pattern: Option<String>,
    /// Positions visited per call, the configured default when absent
    pub count: Option<usize>,
}

impl ScanOptions {
    pub fn matching(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

/// Options of `ZRANGEBYSCORE` and `ZREVRANGEBYSCORE`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeOptions {
    /// Reply with a member to score map instead of a member list
    pub with_scores: bool,
    /// `(offset, count)` applied after filtering
    pub limit: Option<(usize, usize)>,
}

impl RangeOptions {
    pub fn with_scores(mut self) -> Self {
        self.with_scores = true;
        self
    }

    pub fn limit(mut self, offset: usize, count: usize) -> Self {
        self.limit = Some((offset, count));
        self
    }
}

/// Options of `ZUNIONSTORE`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnionOptions {
    /// One multiplier per source key, all `1` when absent
    pub weights: Option<Vec<f64>>,
    pub aggregate: Aggregate,
}

impl UnionOptions {
    pub fn weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = aggregate;
        self
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_handles_share_area() {
        let (mut first, _clock) = create_engine();
        let mut second = Engine::new(Arc::clone(first.registry()));

        first.set("k", "v");
        assert_eq!(second.get("k"), Reply::bulk("v"));
        assert_eq!(second.storage(), "");
    }

    #[test]
    fn test_config_selects_area() {
        let (engine, _clock) = create_engine();
        let registry = Arc::clone(engine.registry());
        let mut cache = Engine::with_config(
            Arc::clone(&registry),
            EmulatorConfig::default().with_storage("cache"),
        );
        cache.set("k", "v");
        assert_eq!(cache.storage(), "cache");

        let mut default = Engine::new(registry);
        assert_eq!(default.get("k"), Reply::Null);
    }

    #[test]
    fn test_set_options_ttl() {
        assert_eq!(SetOptions::default().ttl_secs(), None);
        assert_eq!(SetOptions::default().expire_in(5).ttl_secs(), Some(5));
        assert_eq!(SetOptions::default().expire_in_ms(2_999).ttl_secs(), Some(2));
        assert_eq!(
            SetOptions::default().expire_in(1).expire_in_ms(9_000).ttl_secs(),
            Some(1)
        );
    }
}
