//! Key lifecycle and keyspace iteration commands.

use super::{Engine, ScanOptions};
use crate::protocol::Reply;
use crate::storage::{remaining_secs, scan_page, GlobPattern};

impl Engine {
    /// TTL key
    ///
    /// `-2` for a missing key, `-1` for a key without a deadline, otherwise
    /// the seconds left.
    pub fn ttl(&mut self, key: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            ks.touch_expiry(key, now);
            if !ks.contains(key) {
                return Reply::integer(-2);
            }
            match ks.expiry_of(key) {
                Some(deadline) => Reply::integer(remaining_secs(deadline, now)),
                None => Reply::integer(-1),
            }
        });
        self.reply(reply)
    }

    /// EXPIRE key seconds
    ///
    /// A deadline past the representable range is clamped to it.
    pub fn expire(&mut self, key: &str, seconds: i64) -> Reply {
        let deadline = self.registry().now().saturating_add(seconds);
        self.expireat(key, deadline)
    }

    /// EXPIREAT key timestamp
    pub fn expireat(&mut self, key: &str, timestamp: i64) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            ks.touch_expiry(key, now);
            if !ks.contains(key) {
                return Reply::integer(0);
            }
            ks.set_expiry(key, timestamp);
            Reply::integer(1)
        });
        self.reply(reply)
    }

    /// TYPE key
    pub fn key_type(&mut self, key: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            ks.touch_expiry(key, now);
            let name = ks.type_of(key).map(|t| t.as_str()).unwrap_or("none");
            Reply::status(name)
        });
        self.reply(reply)
    }

    /// EXISTS key [key ...]
    pub fn exists<K: AsRef<str>>(&mut self, keys: &[K]) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            let count = keys
                .iter()
                .filter(|key| ks.live(key.as_ref(), now).is_some())
                .count();
            Reply::integer(count as i64)
        });
        self.reply(reply)
    }

    /// DEL key [key ...]
    ///
    /// Answers the number of *elements* removed: one per scalar, the
    /// element count of each container.
    pub fn del<K: AsRef<str>>(&mut self, keys: &[K]) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            let removed: usize = keys
                .iter()
                .map(|key| {
                    ks.touch_expiry(key.as_ref(), now);
                    ks.delete(key.as_ref())
                })
                .sum();
            Reply::integer(removed as i64)
        });
        self.reply(reply)
    }

    /// KEYS pattern
    pub fn keys(&mut self, pattern: &str) -> Reply {
        let pattern = GlobPattern::new(pattern);
        let reply = self.with_keyspace(|ks, now| {
            ks.purge_expired(now);
            Reply::strings(ks.keys().filter(|key| pattern.matches(key)).cloned())
        });
        self.reply(reply)
    }

    /// SCAN cursor [MATCH pattern] [COUNT count]
    ///
    /// Answers `[next_cursor, [keys...]]`. See
    /// [`scan_page`](crate::storage::scan_page) for the cursor contract.
    pub fn scan(&mut self, cursor: u64, options: &ScanOptions) -> Reply {
        let pattern = GlobPattern::new(options.pattern.as_deref().unwrap_or("*"));
        let count = options.count.unwrap_or(self.config().scan_count);
        let reply = self.with_keyspace(|ks, now| {
            ks.purge_expired(now);
            let page = scan_page(ks.keys(), cursor, count, &pattern);
            scan_reply(page.cursor, page.items)
        });
        self.reply(reply)
    }
}

/// `[cursor, [items...]]`, shared with `SSCAN`.
pub(super) fn scan_reply(cursor: u64, items: Vec<String>) -> Reply {
    Reply::array(vec![Reply::bulk(cursor.to_string()), Reply::strings(items)])
}
