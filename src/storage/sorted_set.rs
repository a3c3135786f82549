//! Sorted set data structure: dual-indexed by score and member.
//!
//! Members are ordered by `(score, member)`: ascending score, ties broken by
//! ascending byte-wise comparison of the member strings. That order is a
//! standing property of the structure, not something a read has to
//! re-establish, so ranks and ranges are always served from the sorted index.
//!
//! Reverse order is the exact mirror: descending score, ties broken by
//! descending member.
//!
//! Implementation uses a sorted `Vec<(OrderedFloat<f64>, String)>` for
//! binary-searched ranks and ordered iteration, plus a
//! `HashMap<String, OrderedFloat<f64>>` for member→score lookups.

use crate::error::{EmulatorError, Result};
use ordered_float::OrderedFloat;
use std::collections::HashMap;
use std::str::FromStr;

/// A set of unique string members, each with a floating-point score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortedSet {
    /// Kept sorted by `(score, member)` at all times.
    sorted: Vec<(OrderedFloat<f64>, String)>,
    scores: HashMap<String, OrderedFloat<f64>>,
}

impl SortedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Adds a member or moves an existing one to its new score.
    ///
    /// Returns `true` if the member is new.
    pub fn insert(&mut self, member: &str, score: f64) -> bool {
        let score = OrderedFloat(score);
        let is_new = match self.scores.get(member) {
            Some(&old) if old == score => return false,
            Some(&old) => {
                let idx = self.position(old, member);
                if let Ok(idx) = idx {
                    self.sorted.remove(idx);
                }
                false
            }
            None => true,
        };

        self.scores.insert(member.to_string(), score);
        let idx = self.position(score, member).unwrap_or_else(|idx| idx);
        self.sorted.insert(idx, (score, member.to_string()));
        is_new
    }

    /// Removes a member. Returns `true` if it was present.
    pub fn remove(&mut self, member: &str) -> bool {
        let Some(score) = self.scores.remove(member) else {
            return false;
        };
        if let Ok(idx) = self.position(score, member) {
            self.sorted.remove(idx);
        }
        true
    }

    /// The score of a member.
    pub fn score(&self, member: &str) -> Option<f64> {
        self.scores.get(member).map(|s| s.0)
    }

    /// 0-based position of a member in ascending order.
    pub fn rank(&self, member: &str) -> Option<usize> {
        let score = *self.scores.get(member)?;
        self.position(score, member).ok()
    }

    /// 0-based position of a member in descending order.
    pub fn rev_rank(&self, member: &str) -> Option<usize> {
        self.rank(member).map(|rank| self.len() - rank - 1)
    }

    /// Members with their scores in ascending order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, f64)> + ExactSizeIterator {
        self.sorted.iter().map(|(score, member)| (member.as_str(), score.0))
    }

    /// Members in ascending (or descending) order whose score lies within
    /// `[min, max]`.
    ///
    /// The unbounded `-inf..+inf` query skips filtering and hands back the
    /// whole ordered view.
    pub fn range_by_score(&self, min: ScoreBound, max: ScoreBound, rev: bool) -> Vec<(&str, f64)> {
        let ordered: Box<dyn Iterator<Item = (&str, f64)>> = if rev {
            Box::new(self.iter().rev())
        } else {
            Box::new(self.iter())
        };

        if min == ScoreBound::NegInf && max == ScoreBound::PosInf {
            return ordered.collect();
        }

        ordered
            .filter(|&(_, score)| min.admits_above(score) && max.admits_below(score))
            .collect()
    }

    /// Folds `source` into this set, scaling each score by `weight` and
    /// combining with members already present through `aggregate`.
    pub fn merge_weighted(&mut self, source: &SortedSet, weight: f64, aggregate: Aggregate) {
        for (member, score) in source.iter() {
            let weighted = score * weight;
            let combined = match self.score(member) {
                Some(current) => aggregate.combine(current, weighted),
                None => weighted,
            };
            self.insert(member, combined);
        }
    }

    /// Binary search for `(score, member)` in the sorted index.
    fn position(&self, score: OrderedFloat<f64>, member: &str) -> std::result::Result<usize, usize> {
        self.sorted
            .binary_search_by(|(s, m)| s.cmp(&score).then_with(|| m.as_str().cmp(member)))
    }
}

/// One end of a score range.
///
/// Parsed from `-inf`, `+inf`, a bare number (inclusive) or a number
/// prefixed with `(` (exclusive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreBound {
    NegInf,
    PosInf,
    Inclusive(f64),
    Exclusive(f64),
}

impl ScoreBound {
    /// Used as a lower bound: does `score` lie at or above it?
    pub fn admits_above(&self, score: f64) -> bool {
        match *self {
            ScoreBound::NegInf => true,
            ScoreBound::PosInf => false,
            ScoreBound::Inclusive(v) => score >= v,
            ScoreBound::Exclusive(v) => score > v,
        }
    }

    /// Used as an upper bound: does `score` lie at or below it?
    pub fn admits_below(&self, score: f64) -> bool {
        match *self {
            ScoreBound::NegInf => false,
            ScoreBound::PosInf => true,
            ScoreBound::Inclusive(v) => score <= v,
            ScoreBound::Exclusive(v) => score < v,
        }
    }
}

impl FromStr for ScoreBound {
    type Err = EmulatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "-inf" => Ok(ScoreBound::NegInf),
            "+inf" | "inf" => Ok(ScoreBound::PosInf),
            bound => match bound.strip_prefix('(') {
                Some(rest) => parse_score(rest).map(ScoreBound::Exclusive),
                None => parse_score(bound).map(ScoreBound::Inclusive),
            },
        }
        .map_err(|_| EmulatorError::invalid(format!("min or max is not a float: '{}'", s)))
    }
}

/// How `ZUNIONSTORE` combines scores of a member present in several inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregate {
    #[default]
    Sum,
    Min,
    Max,
}

impl Aggregate {
    pub fn combine(self, current: f64, incoming: f64) -> f64 {
        match self {
            Aggregate::Sum => current + incoming,
            Aggregate::Min => current.min(incoming),
            Aggregate::Max => current.max(incoming),
        }
    }
}

impl FromStr for Aggregate {
    type Err = EmulatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SUM" => Ok(Aggregate::Sum),
            "MIN" => Ok(Aggregate::Min),
            "MAX" => Ok(Aggregate::Max),
            _ => Err(EmulatorError::invalid(format!(
                "unknown aggregate function '{}'",
                s
            ))),
        }
    }
}

/// Parses a sorted-set score. Anything that is not a number is rejected.
pub fn parse_score(s: &str) -> Result<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|score| !score.is_nan())
        .ok_or_else(|| {
            EmulatorError::invalid(format!(
                "score should be either an integer or a float, got '{}'",
                s
            ))
        })
}

/// Renders a score the way replies carry it (`2`, `1.5`, `inf`).
pub fn format_score(score: f64) -> String {
    score.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(pairs: &[(&str, f64)]) -> Vec<String> {
        pairs.iter().map(|(m, _)| m.to_string()).collect()
    }

    fn zset(entries: &[(&str, f64)]) -> SortedSet {
        let mut set = SortedSet::new();
        for (member, score) in entries {
            set.insert(member, *score);
        }
        set
    }

    #[test]
    fn test_ties_break_lexicographically() {
        let set = zset(&[("b", 1.0), ("a", 1.0), ("c", 0.5)]);
        let order: Vec<&str> = set.iter().map(|(m, _)| m).collect();
        assert_eq!(order, vec!["c", "a", "b"]);

        let reversed: Vec<&str> = set.iter().rev().map(|(m, _)| m).collect();
        assert_eq!(reversed, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_insert_update_and_remove() {
        let mut set = SortedSet::new();
        assert!(set.insert("a", 1.0));
        assert!(!set.insert("a", 1.0));
        assert!(!set.insert("a", 5.0));
        assert!(set.insert("b", 2.0));

        assert_eq!(set.score("a"), Some(5.0));
        assert_eq!(set.rank("b"), Some(0));
        assert_eq!(set.rank("a"), Some(1));
        assert_eq!(set.rev_rank("a"), Some(0));
        assert_eq!(set.rank("missing"), None);

        assert!(set.remove("a"));
        assert!(!set.remove("a"));
        assert_eq!(set.len(), 1);
        assert_eq!(set.rank("b"), Some(0));
    }

    #[test]
    fn test_range_by_score() {
        let set = zset(&[("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0)]);

        let all = set.range_by_score(ScoreBound::NegInf, ScoreBound::PosInf, false);
        assert_eq!(members(&all), vec!["a", "b", "c", "d"]);

        let mid = set.range_by_score(ScoreBound::Inclusive(2.0), ScoreBound::Exclusive(4.0), false);
        assert_eq!(members(&mid), vec!["b", "c"]);

        let open = set.range_by_score(ScoreBound::Exclusive(1.0), ScoreBound::PosInf, false);
        assert_eq!(members(&open), vec!["b", "c", "d"]);

        let low = set.range_by_score(ScoreBound::NegInf, ScoreBound::Inclusive(2.0), true);
        assert_eq!(members(&low), vec!["b", "a"]);

        let none = set.range_by_score(ScoreBound::Inclusive(5.0), ScoreBound::PosInf, false);
        assert!(none.is_empty());
    }

    #[test]
    fn test_merge_weighted() {
        let mut dest = SortedSet::new();
        dest.merge_weighted(&zset(&[("x", 1.0), ("y", 2.0)]), 1.0, Aggregate::Sum);
        dest.merge_weighted(&zset(&[("y", 3.0), ("z", 1.0)]), 2.0, Aggregate::Sum);
        assert_eq!(dest.score("x"), Some(1.0));
        assert_eq!(dest.score("y"), Some(8.0));
        assert_eq!(dest.score("z"), Some(2.0));

        let mut min = zset(&[("y", 5.0)]);
        min.merge_weighted(&zset(&[("y", 3.0)]), 1.0, Aggregate::Min);
        assert_eq!(min.score("y"), Some(3.0));

        let mut max = zset(&[("y", 5.0)]);
        max.merge_weighted(&zset(&[("y", 3.0)]), 1.0, Aggregate::Max);
        assert_eq!(max.score("y"), Some(5.0));
    }

    #[test]
    fn test_parse_bounds() {
        assert_eq!("-inf".parse::<ScoreBound>(), Ok(ScoreBound::NegInf));
        assert_eq!("+inf".parse::<ScoreBound>(), Ok(ScoreBound::PosInf));
        assert_eq!("2.5".parse::<ScoreBound>(), Ok(ScoreBound::Inclusive(2.5)));
        assert_eq!("(3".parse::<ScoreBound>(), Ok(ScoreBound::Exclusive(3.0)));
        assert!("abc".parse::<ScoreBound>().is_err());
        assert!("(".parse::<ScoreBound>().is_err());
    }

    #[test]
    fn test_parse_aggregate_and_score() {
        assert_eq!("max".parse::<Aggregate>(), Ok(Aggregate::Max));
        assert!("AVG".parse::<Aggregate>().is_err());

        assert_eq!(parse_score("10"), Ok(10.0));
        assert_eq!(parse_score("-1.5"), Ok(-1.5));
        assert!(parse_score("ten").is_err());
        assert!(parse_score("nan").is_err());
        assert_eq!(format_score(2.0), "2");
        assert_eq!(format_score(1.5), "1.5");
    }
}
