//! Set commands.
//!
//! Sets are [`MemberSet`]s: insertion-ordered, with a hash index for
//! membership. That order is what `SMEMBERS` returns and what `SSCAN`
//! cursors index into.

use super::key::scan_reply;
use super::{Engine, ScanOptions};
use crate::protocol::Reply;
use crate::storage::{scan_page, GlobPattern, Keyspace, MemberSet, Value};
use std::collections::HashSet;

impl Engine {
    /// SADD key member [member ...]
    ///
    /// Answers how many members were new. Any deadline on the key is
    /// dropped.
    pub fn sadd<M: AsRef<str>>(&mut self, key: &str, members: &[M]) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            let added = match ks.live_mut(key, now) {
                Some(Value::Set(set)) => members
                    .iter()
                    .map(|m| -> &str { m.as_ref() })
                    .filter(|m| set.insert(m))
                    .count(),
                Some(_) => return Reply::Null,
                None if members.is_empty() => return Reply::integer(0),
                None => {
                    let set: MemberSet = members.iter().map(|m| -> &str { m.as_ref() }).collect();
                    let added = set.len();
                    ks.put(key, Value::Set(set));
                    added
                }
            };
            ks.clear_expiry(key);
            Reply::integer(added as i64)
        });
        self.reply(reply)
    }

    /// SREM key member [member ...]
    pub fn srem<M: AsRef<str>>(&mut self, key: &str, members: &[M]) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            let removed = match ks.live_mut(key, now) {
                Some(Value::Set(set)) => {
                    set.remove_all(members.iter().map(|m| -> &str { m.as_ref() }))
                }
                _ => return Reply::integer(0),
            };
            ks.remove_if_empty(key);
            Reply::integer(removed as i64)
        });
        self.reply(reply)
    }

    /// SMEMBERS key
    pub fn smembers(&mut self, key: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| Reply::strings(members_of(ks, key, now)));
        self.reply(reply)
    }

    /// SCARD key
    pub fn scard(&mut self, key: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            Some(Value::Set(set)) => Reply::integer(set.len() as i64),
            _ => Reply::integer(0),
        });
        self.reply(reply)
    }

    /// SISMEMBER key member
    pub fn sismember(&mut self, key: &str, member: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            Some(Value::Set(set)) if set.contains(member) => Reply::integer(1),
            _ => Reply::integer(0),
        });
        self.reply(reply)
    }

    /// SUNION key [key ...]
    ///
    /// Members in first-seen order across the keys.
    pub fn sunion<K: AsRef<str>>(&mut self, keys: &[K]) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            let mut seen = HashSet::new();
            let mut union = Vec::new();
            for key in keys {
                for member in members_of(ks, key.as_ref(), now) {
                    if seen.insert(member.clone()) {
                        union.push(member);
                    }
                }
            }
            Reply::strings(union)
        });
        self.reply(reply)
    }

    /// SINTER key [key ...]
    ///
    /// Members of the first key present in every other key.
    pub fn sinter<K: AsRef<str>>(&mut self, keys: &[K]) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            let Some((first, rest)) = keys.split_first() else {
                return Reply::array(vec![]);
            };
            let others: Vec<HashSet<String>> = rest
                .iter()
                .map(|key| members_of(ks, key.as_ref(), now).into_iter().collect())
                .collect();
            Reply::strings(
                members_of(ks, first.as_ref(), now)
                    .into_iter()
                    .filter(|member| others.iter().all(|other| other.contains(member))),
            )
        });
        self.reply(reply)
    }

    /// SDIFF key [key ...]
    ///
    /// Members of the first key present in none of the others.
    pub fn sdiff<K: AsRef<str>>(&mut self, keys: &[K]) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            let Some((first, rest)) = keys.split_first() else {
                return Reply::array(vec![]);
            };
            let excluded: HashSet<String> = rest
                .iter()
                .flat_map(|key| members_of(ks, key.as_ref(), now))
                .collect();
            Reply::strings(
                members_of(ks, first.as_ref(), now)
                    .into_iter()
                    .filter(|member| !excluded.contains(member)),
            )
        });
        self.reply(reply)
    }

    /// SSCAN key cursor [MATCH pattern] [COUNT count]
    ///
    /// The cursor is a position in insertion order. Adding or removing
    /// members between calls can make a walk skip or repeat members.
    pub fn sscan(&mut self, key: &str, cursor: u64, options: &ScanOptions) -> Reply {
        let pattern = GlobPattern::new(options.pattern.as_deref().unwrap_or("*"));
        let count = options.count.unwrap_or(self.config().scan_count);
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            Some(Value::Set(set)) => {
                let page = scan_page(set.iter(), cursor, count, &pattern);
                scan_reply(page.cursor, page.items)
            }
            _ => scan_reply(0, vec![]),
        });
        self.reply(reply)
    }
}

/// Members of a set key; empty for a missing key or another type.
fn members_of(ks: &mut Keyspace, key: &str, now: i64) -> Vec<String> {
    match ks.live(key, now) {
        Some(Value::Set(set)) => set.to_vec(),
        _ => Vec::new(),
    }
}
