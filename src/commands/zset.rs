//! Sorted set commands.
//!
//! Members are always held in `(score, member)` order by [`SortedSet`], so
//! ranks, index ranges and score ranges are read straight off the index.
//! Only one member is inserted or removed per call: the batched forms are
//! refused with [`EmulatorError::UnsupportedOperation`].

use super::{Engine, RangeOptions, UnionOptions};
use crate::error::{EmulatorError, Result};
use crate::protocol::Reply;
use crate::storage::{format_score, slice_bounds, Keyspace, ScoreBound, SortedSet, Value};

impl Engine {
    /// ZADD key score member
    ///
    /// Answers `1` if the member is new, `0` if its score was updated. Any
    /// deadline on the key is dropped.
    pub fn zadd(&mut self, key: &str, score: f64, member: &str) -> Result<Reply> {
        if score.is_nan() {
            return Err(EmulatorError::invalid(
                "score should be either an integer or a float",
            ));
        }
        let reply = self.with_keyspace(|ks, now| match insert_member(ks, key, now, member, score) {
            Some(is_new) => Reply::integer(is_new as i64),
            None => Reply::Null,
        });
        Ok(self.reply(reply))
    }

    /// ZADD taking its pairs as a slice. Exactly one pair is accepted.
    pub fn zadd_pairs<M: AsRef<str>>(&mut self, key: &str, pairs: &[(f64, M)]) -> Result<Reply> {
        match pairs {
            [(score, member)] => self.zadd(key, *score, member.as_ref()),
            _ => Err(EmulatorError::unsupported(format!(
                "zadd takes exactly one score/member pair, got {}",
                pairs.len()
            ))),
        }
    }

    /// ZSCORE key member
    pub fn zscore(&mut self, key: &str, member: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            Some(Value::SortedSet(set)) => {
                Reply::bulk_or_null(set.score(member).map(format_score))
            }
            _ => Reply::Null,
        });
        self.reply(reply)
    }

    /// ZCARD key
    pub fn zcard(&mut self, key: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            Some(Value::SortedSet(set)) => Reply::integer(set.len() as i64),
            _ => Reply::integer(0),
        });
        self.reply(reply)
    }

    /// ZCOUNT key min max
    pub fn zcount(&mut self, key: &str, min: &str, max: &str) -> Result<Reply> {
        let min: ScoreBound = min.parse()?;
        let max: ScoreBound = max.parse()?;
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            None => Reply::integer(0),
            Some(Value::SortedSet(set)) => {
                Reply::integer(set.range_by_score(min, max, false).len() as i64)
            }
            Some(_) => Reply::Null,
        });
        Ok(self.reply(reply))
    }

    /// ZINCRBY key increment member
    ///
    /// An absent member starts from `0`. Answers the new score.
    pub fn zincrby(&mut self, key: &str, increment: f64, member: &str) -> Result<Reply> {
        if increment.is_nan() {
            return Err(EmulatorError::invalid("increment is not a number"));
        }
        let reply = self.with_keyspace(|ks, now| {
            let current = match ks.live(key, now) {
                None => 0.0,
                Some(Value::SortedSet(set)) => set.score(member).unwrap_or(0.0),
                Some(_) => return Ok(Reply::Null),
            };
            let next = current + increment;
            if next.is_nan() {
                return Err(EmulatorError::invalid("resulting score is not a number"));
            }
            insert_member(ks, key, now, member, next);
            Ok(Reply::float(next))
        })?;
        Ok(self.reply(reply))
    }

    /// ZRANGE key start stop [WITHSCORES]
    pub fn zrange(&mut self, key: &str, start: i64, stop: i64, with_scores: bool) -> Reply {
        self.index_range(key, start, stop, with_scores, false)
    }

    /// ZREVRANGE key start stop [WITHSCORES]
    pub fn zrevrange(&mut self, key: &str, start: i64, stop: i64, with_scores: bool) -> Reply {
        self.index_range(key, start, stop, with_scores, true)
    }

    /// ZRANGEBYSCORE key min max [WITHSCORES] [LIMIT offset count]
    ///
    /// `LIMIT` is applied after the score filter.
    pub fn zrangebyscore(
        &mut self,
        key: &str,
        min: &str,
        max: &str,
        options: &RangeOptions,
    ) -> Result<Reply> {
        self.score_range(key, min, max, options, false)
    }

    /// ZREVRANGEBYSCORE key max min [WITHSCORES] [LIMIT offset count]
    pub fn zrevrangebyscore(
        &mut self,
        key: &str,
        max: &str,
        min: &str,
        options: &RangeOptions,
    ) -> Result<Reply> {
        self.score_range(key, min, max, options, true)
    }

    /// ZRANK key member
    pub fn zrank(&mut self, key: &str, member: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            Some(Value::SortedSet(set)) => match set.rank(member) {
                Some(rank) => Reply::integer(rank as i64),
                None => Reply::Null,
            },
            _ => Reply::Null,
        });
        self.reply(reply)
    }

    /// ZREVRANK key member
    pub fn zrevrank(&mut self, key: &str, member: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            Some(Value::SortedSet(set)) => match set.rev_rank(member) {
                Some(rank) => Reply::integer(rank as i64),
                None => Reply::Null,
            },
            _ => Reply::Null,
        });
        self.reply(reply)
    }

    /// ZREM key member
    pub fn zrem(&mut self, key: &str, member: &str) -> Reply {
        let reply = self.with_keyspace(|ks, now| {
            let removed = match ks.live_mut(key, now) {
                Some(Value::SortedSet(set)) => set.remove(member),
                _ => false,
            };
            ks.remove_if_empty(key);
            Reply::integer(removed as i64)
        });
        self.reply(reply)
    }

    /// ZREM taking its members as a slice. Exactly one member is accepted.
    pub fn zrem_many<M: AsRef<str>>(&mut self, key: &str, members: &[M]) -> Result<Reply> {
        match members {
            [member] => Ok(self.zrem(key, member.as_ref())),
            _ => Err(EmulatorError::unsupported(format!(
                "zrem removes exactly one member, got {}",
                members.len()
            ))),
        }
    }

    /// ZREMRANGEBYSCORE key min max
    pub fn zremrangebyscore(&mut self, key: &str, min: &str, max: &str) -> Result<Reply> {
        let min: ScoreBound = min.parse()?;
        let max: ScoreBound = max.parse()?;
        let reply = self.with_keyspace(|ks, now| {
            let removed = match ks.live_mut(key, now) {
                Some(Value::SortedSet(set)) => {
                    let doomed: Vec<String> = set
                        .range_by_score(min, max, false)
                        .into_iter()
                        .map(|(member, _)| member.to_string())
                        .collect();
                    doomed.iter().filter(|member| set.remove(member)).count()
                }
                _ => return Reply::integer(0),
            };
            ks.remove_if_empty(key);
            Reply::integer(removed as i64)
        });
        Ok(self.reply(reply))
    }

    /// ZUNIONSTORE destination key [key ...] [WEIGHTS w ...] [AGGREGATE SUM|MIN|MAX]
    ///
    /// The destination is cleared first, then every source is folded in
    /// key order. Sources that are missing or hold another type contribute
    /// nothing. Answers the size of the stored union.
    pub fn zunionstore<K: AsRef<str>>(
        &mut self,
        destination: &str,
        keys: &[K],
        options: &UnionOptions,
    ) -> Result<Reply> {
        let weights = match &options.weights {
            Some(weights) if weights.len() != keys.len() => {
                return Err(EmulatorError::invalid(format!(
                    "there must be one weight per key: {} weights for {} keys",
                    weights.len(),
                    keys.len()
                )));
            }
            Some(weights) => weights.clone(),
            None => vec![1.0; keys.len()],
        };

        let reply = self.with_keyspace(|ks, now| {
            ks.remove(destination);
            let mut union = SortedSet::new();
            for (key, &weight) in keys.iter().zip(&weights) {
                if let Some(Value::SortedSet(source)) = ks.live(key.as_ref(), now) {
                    union.merge_weighted(source, weight, options.aggregate);
                }
            }

            let count = union.len();
            if !union.is_empty() {
                ks.put(destination, Value::SortedSet(union));
            }
            Reply::integer(count as i64)
        });
        Ok(self.reply(reply))
    }

    fn index_range(&mut self, key: &str, start: i64, stop: i64, with_scores: bool, rev: bool) -> Reply {
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            None => range_reply(Vec::new(), with_scores),
            Some(Value::SortedSet(set)) => {
                let ordered: Vec<(&str, f64)> = if rev {
                    set.iter().rev().collect()
                } else {
                    set.iter().collect()
                };
                match slice_bounds(ordered.len(), start, stop) {
                    Some(range) => range_reply(ordered[range].to_vec(), with_scores),
                    None => range_reply(Vec::new(), with_scores),
                }
            }
            Some(_) => Reply::Null,
        });
        self.reply(reply)
    }

    fn score_range(
        &mut self,
        key: &str,
        min: &str,
        max: &str,
        options: &RangeOptions,
        rev: bool,
    ) -> Result<Reply> {
        let min: ScoreBound = min.parse()?;
        let max: ScoreBound = max.parse()?;
        let reply = self.with_keyspace(|ks, now| match ks.live(key, now) {
            None => range_reply(Vec::new(), options.with_scores),
            Some(Value::SortedSet(set)) => {
                let selected = set.range_by_score(min, max, rev);
                let (offset, count) = options.limit.unwrap_or((0, selected.len()));
                let page = selected.into_iter().skip(offset).take(count).collect();
                range_reply(page, options.with_scores)
            }
            Some(_) => Reply::Null,
        });
        Ok(self.reply(reply))
    }
}

/// Inserts into a sorted-set key, creating it if needed, and drops its
/// deadline. `None` if the key holds another type.
fn insert_member(ks: &mut Keyspace, key: &str, now: i64, member: &str, score: f64) -> Option<bool> {
    let is_new = match ks.live_mut(key, now) {
        Some(Value::SortedSet(set)) => set.insert(member, score),
        Some(_) => return None,
        None => {
            let mut set = SortedSet::new();
            set.insert(member, score);
            ks.put(key, Value::SortedSet(set));
            true
        }
    };
    ks.clear_expiry(key);
    Some(is_new)
}

/// A member list, or a member to score map when scores were asked for.
fn range_reply(entries: Vec<(&str, f64)>, with_scores: bool) -> Reply {
    if with_scores {
        Reply::map(
            entries
                .into_iter()
                .map(|(member, score)| (member.to_string(), Reply::bulk(format_score(score))))
                .collect(),
        )
    } else {
        Reply::strings(entries.into_iter().map(|(member, _)| member))
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::*;
    use crate::commands::{RangeOptions, UnionOptions};
    use crate::error::EmulatorError;
    use crate::protocol::Reply;
    use crate::storage::Aggregate;

    fn members(reply: Reply) -> Vec<String> {
        reply.into_strings().unwrap()
    }

    fn scored(pairs: &[(&str, &str)]) -> Reply {
        Reply::map(
            pairs
                .iter()
                .map(|(member, score)| (member.to_string(), Reply::bulk(*score)))
                .collect(),
        )
    }

    fn populate(engine: &mut crate::commands::Engine, key: &str, entries: &[(f64, &str)]) {
        for (score, member) in entries {
            engine.zadd(key, *score, member).unwrap();
        }
    }

    #[test]
    fn test_zadd_and_score() {
        let (mut engine, _clock) = create_engine();
        assert_eq!(engine.zadd("z", 1.0, "a").unwrap(), Reply::integer(1));
        assert_eq!(engine.zadd("z", 2.5, "a").unwrap(), Reply::integer(0));
        assert_eq!(engine.zscore("z", "a"), Reply::bulk("2.5"));
        assert_eq!(engine.zscore("z", "missing"), Reply::Null);
        assert_eq!(engine.zcard("z"), Reply::integer(1));
        assert_eq!(engine.zcard("nope"), Reply::integer(0));
    }

    #[test]
    fn test_zadd_rejects_nan() {
        let (mut engine, _clock) = create_engine();
        let err = engine.zadd("z", f64::NAN, "a").unwrap_err();
        assert!(matches!(err, EmulatorError::InvalidArgument(_)));
        assert_eq!(engine.key_type("z"), Reply::status("none"));
    }

    #[test]
    fn test_zadd_wrong_type() {
        let (mut engine, _clock) = create_engine();
        engine.set("s", "v");
        assert_eq!(engine.zadd("s", 1.0, "a").unwrap(), Reply::Null);
        assert_eq!(engine.get("s"), Reply::bulk("v"));
    }

    #[test]
    fn test_zadd_drops_expiry() {
        let (mut engine, _clock) = create_engine();
        engine.zadd("z", 1.0, "a").unwrap();
        engine.expire("z", 60);
        engine.zadd("z", 2.0, "b").unwrap();
        assert_eq!(engine.ttl("z"), Reply::integer(-1));
    }

    #[test]
    fn test_batched_forms_are_unsupported() {
        let (mut engine, _clock) = create_engine();
        assert_eq!(engine.zadd_pairs("z", &[(1.0, "a")]).unwrap(), Reply::integer(1));

        let err = engine.zadd_pairs("z", &[(1.0, "b"), (2.0, "c")]).unwrap_err();
        assert!(matches!(err, EmulatorError::UnsupportedOperation(_)));
        assert_eq!(engine.zcard("z"), Reply::integer(1));

        let err = engine.zrem_many("z", &["a", "b"]).unwrap_err();
        assert!(matches!(err, EmulatorError::UnsupportedOperation(_)));
        assert_eq!(engine.zrem_many("z", &["a"]).unwrap(), Reply::integer(1));
    }

    #[test]
    fn test_ties_break_by_member() {
        let (mut engine, _clock) = create_engine();
        engine.zadd("k", 1.0, "a").unwrap();
        engine.zadd("k", 1.0, "b").unwrap();
        assert_eq!(members(engine.zrange("k", 0, -1, false)), strings(&["a", "b"]));
        assert_eq!(members(engine.zrevrange("k", 0, -1, false)), strings(&["b", "a"]));
    }

    #[test]
    fn test_zrange_slices() {
        let (mut engine, _clock) = create_engine();
        populate(&mut engine, "z", &[(3.0, "c"), (1.0, "a"), (2.0, "b"), (4.0, "d")]);

        assert_eq!(members(engine.zrange("z", 1, 2, false)), strings(&["b", "c"]));
        assert_eq!(members(engine.zrange("z", -2, -1, false)), strings(&["c", "d"]));
        assert_eq!(members(engine.zrange("z", -10, 0, false)), strings(&["a"]));
        assert_eq!(engine.zrange("z", 5, 10, false), Reply::array(vec![]));
        assert_eq!(members(engine.zrevrange("z", 0, 1, false)), strings(&["d", "c"]));
        assert_eq!(
            engine.zrange("z", 0, 1, true),
            scored(&[("a", "1"), ("b", "2")])
        );
        assert_eq!(engine.zrange("missing", 0, -1, false), Reply::array(vec![]));
    }

    #[test]
    fn test_zrangebyscore_bounds() {
        let (mut engine, _clock) = create_engine();
        populate(&mut engine, "z", &[(1.0, "a"), (2.0, "b"), (3.0, "c"), (4.0, "d")]);
        let plain = RangeOptions::default();

        assert_eq!(
            members(engine.zrangebyscore("z", "2", "3", &plain).unwrap()),
            strings(&["b", "c"])
        );
        assert_eq!(
            members(engine.zrangebyscore("z", "(2", "+inf", &plain).unwrap()),
            strings(&["c", "d"])
        );
        assert_eq!(
            members(engine.zrangebyscore("z", "-inf", "(3", &plain).unwrap()),
            strings(&["a", "b"])
        );
        assert_eq!(
            members(engine.zrangebyscore("z", "-inf", "+inf", &plain).unwrap()),
            strings(&["a", "b", "c", "d"])
        );
        assert_eq!(
            members(engine.zrevrangebyscore("z", "3", "1", &plain).unwrap()),
            strings(&["c", "b", "a"])
        );
    }

    #[test]
    fn test_zrangebyscore_limit_and_scores() {
        let (mut engine, _clock) = create_engine();
        populate(&mut engine, "z", &[(1.0, "a"), (2.0, "b"), (3.0, "c"), (4.5, "d")]);

        let limited = RangeOptions::default().limit(1, 2);
        assert_eq!(
            members(engine.zrangebyscore("z", "-inf", "+inf", &limited).unwrap()),
            strings(&["b", "c"])
        );
        assert_eq!(
            members(engine.zrangebyscore("z", "2", "+inf", &limited).unwrap()),
            strings(&["c", "d"])
        );

        let with_scores = RangeOptions::default().with_scores();
        assert_eq!(
            engine.zrevrangebyscore("z", "+inf", "3", &with_scores).unwrap(),
            scored(&[("d", "4.5"), ("c", "3")])
        );
    }

    #[test]
    fn test_zrangebyscore_errors_and_sentinels() {
        let (mut engine, _clock) = create_engine();
        let plain = RangeOptions::default();
        let err = engine.zrangebyscore("z", "low", "+inf", &plain).unwrap_err();
        assert!(matches!(err, EmulatorError::InvalidArgument(_)));

        assert_eq!(engine.zrangebyscore("z", "-inf", "+inf", &plain).unwrap(), Reply::array(vec![]));

        engine.set("s", "v");
        assert_eq!(engine.zrangebyscore("s", "-inf", "+inf", &plain).unwrap(), Reply::Null);
    }

    #[test]
    fn test_zcount() {
        let (mut engine, _clock) = create_engine();
        populate(&mut engine, "z", &[(1.0, "a"), (2.0, "b"), (3.0, "c")]);
        assert_eq!(engine.zcount("z", "-inf", "+inf").unwrap(), Reply::integer(3));
        assert_eq!(engine.zcount("z", "(1", "3").unwrap(), Reply::integer(2));
        assert_eq!(engine.zcount("missing", "-inf", "+inf").unwrap(), Reply::integer(0));
    }

    #[test]
    fn test_zincrby() {
        let (mut engine, _clock) = create_engine();
        assert_eq!(engine.zincrby("z", 2.0, "a").unwrap(), Reply::float(2.0));
        assert_eq!(engine.zincrby("z", 0.5, "a").unwrap(), Reply::float(2.5));
        assert_eq!(engine.zscore("z", "a"), Reply::bulk("2.5"));

        engine.set("s", "v");
        assert_eq!(engine.zincrby("s", 1.0, "a").unwrap(), Reply::Null);
    }

    #[test]
    fn test_zrank_zrevrank() {
        let (mut engine, _clock) = create_engine();
        populate(&mut engine, "z", &[(10.0, "x"), (20.0, "y"), (30.0, "z")]);
        assert_eq!(engine.zrank("z", "x"), Reply::integer(0));
        assert_eq!(engine.zrank("z", "z"), Reply::integer(2));
        assert_eq!(engine.zrevrank("z", "x"), Reply::integer(2));
        assert_eq!(engine.zrank("z", "w"), Reply::Null);
        assert_eq!(engine.zrevrank("missing", "x"), Reply::Null);
    }

    #[test]
    fn test_zrem_deletes_empty_key() {
        let (mut engine, _clock) = create_engine();
        engine.zadd("z", 1.0, "a").unwrap();
        assert_eq!(engine.zrem("z", "b"), Reply::integer(0));
        assert_eq!(engine.zrem("z", "a"), Reply::integer(1));
        assert_eq!(engine.key_type("z"), Reply::status("none"));
    }

    #[test]
    fn test_zremrangebyscore() {
        let (mut engine, _clock) = create_engine();
        populate(&mut engine, "z", &[(1.0, "a"), (2.0, "b"), (3.0, "c")]);
        assert_eq!(engine.zremrangebyscore("z", "1", "(3").unwrap(), Reply::integer(2));
        assert_eq!(members(engine.zrange("z", 0, -1, false)), strings(&["c"]));
        assert_eq!(engine.zremrangebyscore("z", "-inf", "+inf").unwrap(), Reply::integer(1));
        assert_eq!(engine.key_type("z"), Reply::status("none"));
        assert_eq!(engine.zremrangebyscore("z", "-inf", "+inf").unwrap(), Reply::integer(0));
    }

    #[test]
    fn test_zunionstore_weighted_sum() {
        let (mut engine, _clock) = create_engine();
        populate(&mut engine, "a", &[(1.0, "x"), (2.0, "y")]);
        populate(&mut engine, "b", &[(10.0, "y"), (20.0, "z")]);

        let options = UnionOptions::default()
            .weights(vec![1.0, 2.0])
            .aggregate(Aggregate::Sum);
        let count = engine.zunionstore("dest", &["a", "b"], &options).unwrap();

        assert_eq!(count, Reply::integer(3));
        assert_eq!(count, engine.zcount("dest", "-inf", "+inf").unwrap());
        assert_eq!(engine.zscore("dest", "x"), Reply::bulk("1"));
        assert_eq!(engine.zscore("dest", "y"), Reply::bulk("22"));
        assert_eq!(engine.zscore("dest", "z"), Reply::bulk("40"));
    }

    #[test]
    fn test_zunionstore_min_max() {
        let (mut engine, _clock) = create_engine();
        populate(&mut engine, "a", &[(1.0, "x"), (5.0, "y")]);
        populate(&mut engine, "b", &[(3.0, "x"), (2.0, "y")]);

        let min = UnionOptions::default().aggregate(Aggregate::Min);
        engine.zunionstore("lo", &["a", "b"], &min).unwrap();
        assert_eq!(engine.zrange("lo", 0, -1, true), scored(&[("x", "1"), ("y", "2")]));

        let max = UnionOptions::default().aggregate(Aggregate::Max);
        engine.zunionstore("hi", &["a", "b"], &max).unwrap();
        assert_eq!(engine.zrange("hi", 0, -1, true), scored(&[("x", "3"), ("y", "5")]));
    }

    #[test]
    fn test_zunionstore_validation_and_overwrite() {
        let (mut engine, _clock) = create_engine();
        populate(&mut engine, "a", &[(1.0, "x")]);
        engine.set("dest", "old");

        let bad = UnionOptions::default().weights(vec![1.0]);
        let err = engine.zunionstore("dest", &["a", "b"], &bad).unwrap_err();
        assert!(matches!(err, EmulatorError::InvalidArgument(_)));
        assert_eq!(engine.get("dest"), Reply::bulk("old"));

        let count = engine
            .zunionstore("dest", &["a", "missing"], &UnionOptions::default())
            .unwrap();
        assert_eq!(count, Reply::integer(1));
        assert_eq!(engine.key_type("dest"), Reply::status("zset"));

        let count = engine
            .zunionstore("dest", &["missing"], &UnionOptions::default())
            .unwrap();
        assert_eq!(count, Reply::integer(0));
        assert_eq!(engine.key_type("dest"), Reply::status("none"));
    }

    #[test]
    fn test_zset_expiry() {
        let (mut engine, clock) = create_engine();
        engine.zadd("z", 1.0, "a").unwrap();
        engine.expire("z", 5);
        clock.advance(6);
        assert_eq!(engine.zcard("z"), Reply::integer(0));
        assert_eq!(engine.zrank("z", "a"), Reply::Null);
    }
}
