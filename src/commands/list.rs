//! List commands.
//!
//! Lists are `VecDeque<String>`s, so pushes and pops at either end are
//! O(1). Index arguments follow the usual conventions: `0` is the head,
//! `-1` the tail.

use super::Engine;
use crate::protocol::Reply;
use crate::storage::{resolve_index, slice_bounds, Keyspace, Value};
use std::collections::VecDeque;

#[derive(Clone, Copy)]
enum End {
    Head,
    Tail,
}

impl Engine {
    /// LPUSH key value [value ...]
    ///
    /// Values are pushed one at a time, so the last one ends up first.
    pub fn lpush<V: AsRef<str>>(&mut self, key: &str, values: &[V]) -> Reply {
        self.push(key, values, End::Head)
    }

    /// RPUSH key value [value ...]
    pub fn rpush<V: AsRef<str>>(&mut self, key: &str, values: &[V]) -> Reply {
        self.push(key, values, End::Tail)
    }

    /// LPOP key
    pub fn lpop(&mut self, key: &str) -> Reply {
        self.pop(key, End::Head)
    }

    /// RPOP key
    pub fn rpop(&mut self, key: &str) -> Reply {
        self.pop(key, End::Tail)
    }

    /// LLEN key
    pub fn llen(&mut self, key: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            Some(Value::List(items)) => Reply::integer(items.len() as i64),
            _ => Reply::integer(0),
        });
        self.reply(reply)
    }

    /// LINDEX key index
    pub fn lindex(&mut self, key: &str, index: i64) -> Reply {
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            Some(Value::List(items)) => resolve_index(items.len(), index)
                .and_then(|i| items.get(i))
                .map(|item| Reply::bulk(item.as_str()))
                .unwrap_or(Reply::Null),
            _ => Reply::Null,
        });
        self.reply(reply)
    }

    /// LRANGE key start stop
    pub fn lrange(&mut self, key: &str, start: i64, stop: i64) -> Reply {
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            Some(Value::List(items)) => match slice_bounds(items.len(), start, stop) {
                Some(range) => Reply::strings(items.range(range).cloned()),
                None => Reply::array(vec![]),
            },
            _ => Reply::array(vec![]),
        });
        self.reply(reply)
    }

    /// LTRIM key start stop
    ///
    /// Keeps only `start..=stop`. A list trimmed to nothing is deleted.
    pub fn ltrim(&mut self, key: &str, start: i64, stop: i64) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            match ks.live_mut(key, now) {
                None => return Reply::ok(),
                Some(Value::List(items)) => {
                    let kept: VecDeque<String> = match slice_bounds(items.len(), start, stop) {
                        Some(range) => items.drain(range).collect(),
                        None => VecDeque::new(),
                    };
                    *items = kept;
                }
                Some(_) => return Reply::Null,
            }
            ks.remove_if_empty(key);
            Reply::ok()
        });
        self.reply(reply)
    }

    /// LREM key count value
    ///
    /// - `count > 0`: remove up to `count` matches from the head
    /// - `count < 0`: remove up to `|count|` matches from the tail
    /// - `count = 0`: remove every match
    pub fn lrem(&mut self, key: &str, count: i64, value: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            let removed = match ks.live_mut(key, now) {
                Some(Value::List(items)) => remove_matches(items, count, value),
                _ => return Reply::integer(0),
            };
            ks.remove_if_empty(key);
            Reply::integer(removed as i64)
        });
        self.reply(reply)
    }

    /// RPOPLPUSH source destination
    ///
    /// Pops the tail of `source` and pushes it onto the head of
    /// `destination`. Answers the moved element, or `Null` if `source` is
    /// empty or either key holds another type.
    pub fn rpoplpush(&mut self, source: &str, destination: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            if !matches!(ks.live(destination, now), None | Some(Value::List(_))) {
                return Reply::Null;
            }
            let item = match ks.live_mut(source, now) {
                Some(Value::List(items)) => items.pop_back(),
                _ => None,
            };
            let Some(item) = item else {
                return Reply::Null;
            };

            push_values(ks, destination, &[item.as_str()], End::Head);
            ks.remove_if_empty(source);
            Reply::bulk(item)
        });
        self.reply(reply)
    }

    fn push<V: AsRef<str>>(&mut self, key: &str, values: &[V], end: End) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            ks.touch_expiry(key, now);
            match push_values(ks, key, values, end) {
                Some(len) => Reply::integer(len as i64),
                None => Reply::Null,
            }
        });
        self.reply(reply)
    }

    fn pop(&mut self, key: &str, end: End) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            let item = match ks.live_mut(key, now) {
                Some(Value::List(items)) => match end {
                    End::Head => items.pop_front(),
                    End::Tail => items.pop_back(),
                },
                _ => None,
            };
            ks.remove_if_empty(key);
            Reply::bulk_or_null(item)
        });
        self.reply(reply)
    }
}

/// Pushes onto a list, creating it if needed. `None` if the key holds
/// another type.
fn push_values<V: AsRef<str>>(ks: &mut Keyspace, key: &str, values: &[V], end: End) -> Option<usize> {
    if values.is_empty() {
        return match ks.get(key) {
            None => Some(0),
            Some(Value::List(items)) => Some(items.len()),
            Some(_) => None,
        };
    }

    if ks.get(key).is_none() {
        ks.put(key, Value::List(VecDeque::new()));
    }
    let Some(Value::List(items)) = ks.get_mut(key) else {
        return None;
    };

    for value in values {
        let value: &str = value.as_ref();
        let value = value.to_string();
        match end {
            End::Head => items.push_front(value),
            End::Tail => items.push_back(value),
        }
    }
    Some(items.len())
}

fn remove_matches(items: &mut VecDeque<String>, count: i64, value: &str) -> usize {
    let limit = if count == 0 {
        usize::MAX
    } else {
        usize::try_from(count.unsigned_abs()).unwrap_or(usize::MAX)
    };
    let from_tail = count < 0;

    if from_tail {
        items.make_contiguous().reverse();
    }
    let mut removed = 0;
    items.retain(|item| {
        if removed < limit && item == value {
            removed += 1;
            false
        } else {
            true
        }
    });
    if from_tail {
        items.make_contiguous().reverse();
    }
    removed
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::*;
    use crate::protocol::Reply;

    fn range(engine: &mut crate::commands::Engine, key: &str) -> Vec<String> {
        engine.lrange(key, 0, -1).into_strings().unwrap()
    }

    #[test]
    fn test_lpush_rpush() {
        let (mut engine, _clock) = create_engine();

        assert_eq!(engine.lpush("k", &["x"]), Reply::integer(1));
        assert_eq!(engine.lpush("k", &["y"]), Reply::integer(2));
        assert_eq!(range(&mut engine, "k"), strings(&["y", "x"]));

        assert_eq!(engine.rpush("k", &["a", "b"]), Reply::integer(4));
        assert_eq!(range(&mut engine, "k"), strings(&["y", "x", "a", "b"]));

        assert_eq!(engine.lpush("multi", &["1", "2", "3"]), Reply::integer(3));
        assert_eq!(range(&mut engine, "multi"), strings(&["3", "2", "1"]));
    }

    #[test]
    fn test_push_on_wrong_type() {
        let (mut engine, _clock) = create_engine();
        engine.set("s", "v");
        assert_eq!(engine.lpush("s", &["x"]), Reply::Null);
        assert_eq!(engine.rpush("s", &["x"]), Reply::Null);
        assert_eq!(engine.get("s"), Reply::bulk("v"));
    }

    #[test]
    fn test_lpop_rpop() {
        let (mut engine, _clock) = create_engine();
        engine.rpush("k", &["a", "b", "c"]);

        assert_eq!(engine.lpop("k"), Reply::bulk("a"));
        assert_eq!(engine.rpop("k"), Reply::bulk("c"));
        assert_eq!(engine.rpop("k"), Reply::bulk("b"));
        assert_eq!(engine.rpop("k"), Reply::Null);
        assert_eq!(engine.key_type("k"), Reply::status("none"));

        engine.set("s", "v");
        assert_eq!(engine.lpop("s"), Reply::Null);
    }

    #[test]
    fn test_llen_lindex() {
        let (mut engine, _clock) = create_engine();
        engine.rpush("k", &["a", "b", "c"]);

        assert_eq!(engine.llen("k"), Reply::integer(3));
        assert_eq!(engine.llen("missing"), Reply::integer(0));

        assert_eq!(engine.lindex("k", 0), Reply::bulk("a"));
        assert_eq!(engine.lindex("k", -1), Reply::bulk("c"));
        assert_eq!(engine.lindex("k", -3), Reply::bulk("a"));
        assert_eq!(engine.lindex("k", 3), Reply::Null);
        assert_eq!(engine.lindex("k", -4), Reply::Null);
        assert_eq!(engine.lindex("missing", 0), Reply::Null);
    }

    #[test]
    fn test_lrange() {
        let (mut engine, _clock) = create_engine();
        engine.rpush("k", &["a", "b", "c", "d", "e"]);

        assert_eq!(engine.lrange("k", 1, 3).into_strings().unwrap(), strings(&["b", "c", "d"]));
        assert_eq!(engine.lrange("k", -2, -1).into_strings().unwrap(), strings(&["d", "e"]));
        assert_eq!(engine.lrange("k", -100, 0).into_strings().unwrap(), strings(&["a"]));
        assert_eq!(engine.lrange("k", 0, -3).into_strings().unwrap(), strings(&["a", "b", "c"]));
        assert_eq!(engine.lrange("k", 3, 1), Reply::array(vec![]));
        assert_eq!(engine.lrange("missing", 0, -1), Reply::array(vec![]));
    }

    #[test]
    fn test_ltrim() {
        let (mut engine, _clock) = create_engine();
        engine.rpush("k", &["a", "b", "c", "d"]);

        assert_eq!(engine.ltrim("k", 1, -2), Reply::ok());
        assert_eq!(range(&mut engine, "k"), strings(&["b", "c"]));

        assert_eq!(engine.ltrim("k", 5, 10), Reply::ok());
        assert_eq!(engine.key_type("k"), Reply::status("none"));

        assert_eq!(engine.ltrim("missing", 0, 1), Reply::ok());
        engine.set("s", "v");
        assert_eq!(engine.ltrim("s", 0, 1), Reply::Null);
    }

    #[test]
    fn test_lrem() {
        let (mut engine, _clock) = create_engine();
        engine.rpush("k", &["a", "b", "a", "c", "a"]);

        assert_eq!(engine.lrem("k", 1, "a"), Reply::integer(1));
        assert_eq!(range(&mut engine, "k"), strings(&["b", "a", "c", "a"]));

        assert_eq!(engine.lrem("k", -1, "a"), Reply::integer(1));
        assert_eq!(range(&mut engine, "k"), strings(&["b", "a", "c"]));

        engine.rpush("k", &["a", "a"]);
        assert_eq!(engine.lrem("k", 0, "a"), Reply::integer(3));
        assert_eq!(range(&mut engine, "k"), strings(&["b", "c"]));

        assert_eq!(engine.lrem("k", 0, "zzz"), Reply::integer(0));
        assert_eq!(engine.lrem("missing", 0, "a"), Reply::integer(0));
    }

    #[test]
    fn test_lrem_empties_list() {
        let (mut engine, _clock) = create_engine();
        engine.rpush("k", &["a", "a"]);
        assert_eq!(engine.lrem("k", 0, "a"), Reply::integer(2));
        assert_eq!(engine.exists(&["k"]), Reply::integer(0));
    }

    #[test]
    fn test_rpoplpush() {
        let (mut engine, _clock) = create_engine();
        engine.rpush("src", &["a", "b"]);

        assert_eq!(engine.rpoplpush("src", "dst"), Reply::bulk("b"));
        assert_eq!(engine.rpoplpush("src", "dst"), Reply::bulk("a"));
        assert_eq!(range(&mut engine, "dst"), strings(&["a", "b"]));
        assert_eq!(engine.exists(&["src"]), Reply::integer(0));
        assert_eq!(engine.rpoplpush("src", "dst"), Reply::Null);
    }

    #[test]
    fn test_rpoplpush_rotates_single_list() {
        let (mut engine, _clock) = create_engine();
        engine.rpush("k", &["a", "b", "c"]);
        assert_eq!(engine.rpoplpush("k", "k"), Reply::bulk("c"));
        assert_eq!(range(&mut engine, "k"), strings(&["c", "a", "b"]));
    }

    #[test]
    fn test_rpoplpush_wrong_destination() {
        let (mut engine, _clock) = create_engine();
        engine.rpush("src", &["a"]);
        engine.set("dst", "v");
        assert_eq!(engine.rpoplpush("src", "dst"), Reply::Null);
        assert_eq!(engine.llen("src"), Reply::integer(1));
    }
}
