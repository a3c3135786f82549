//! Cursor iteration and positional index helpers.
//!
//! ## Cursors
//!
//! A cursor is a plain positional offset into the current order of a
//! collection (lexicographic key order for `SCAN`, insertion order for
//! `SSCAN`). Each call visits `count` positions starting at the cursor and
//! returns the matches found there plus the next cursor, which is `0` once
//! the walk reaches the end.
//!
//! Cursors carry no identity. If the collection changes between calls,
//! elements can be skipped or returned twice; iteration over an unchanged
//! collection visits every element exactly once.
//!
//! ## Index normalization
//!
//! Lists and sorted-set ranges share the same rules: negative indices count
//! from the end, a negative start that underflows clamps to `0`, and a stop
//! of `-1` means "through the last element".

use crate::storage::pattern::GlobPattern;
use std::ops::Range;

/// One page of a cursor walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPage {
    /// Where the next call should start, `0` when iteration is complete
    pub cursor: u64,
    /// Entries in the visited window that matched the pattern
    pub items: Vec<String>,
}

/// Visits `count` positions of `items` starting at `cursor`.
///
/// # Example
///
/// ```
/// use kvmock::storage::{scan_page, GlobPattern};
///
/// let keys: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
/// let page = scan_page(&keys, 0, 2, &GlobPattern::new("*"));
/// assert_eq!(page.cursor, 2);
/// assert_eq!(page.items, vec!["a", "b"]);
///
/// let page = scan_page(&keys, page.cursor, 2, &GlobPattern::new("*"));
/// assert_eq!(page.cursor, 0);
/// assert_eq!(page.items, vec!["c"]);
/// ```
pub fn scan_page<'a, I>(items: I, cursor: u64, count: usize, pattern: &GlobPattern) -> ScanPage
where
    I: IntoIterator<Item = &'a String>,
    I::IntoIter: ExactSizeIterator,
{
    let iter = items.into_iter();
    let len = iter.len() as u64;
    let count = count.max(1);
    let end = cursor.saturating_add(count as u64);

    let items = iter
        .skip(usize::try_from(cursor).unwrap_or(usize::MAX))
        .take(count)
        .filter(|item| pattern.matches(item))
        .cloned()
        .collect();

    ScanPage {
        cursor: if end >= len { 0 } else { end },
        items,
    }
}

/// Converts an inclusive `start..=stop` pair into a slice range over a
/// collection of `len` elements. Returns `None` for an empty selection.
pub fn slice_bounds(len: usize, start: i64, stop: i64) -> Option<Range<usize>> {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let end = if stop >= 0 {
        stop.saturating_add(1).min(len)
    } else {
        len + stop + 1
    };

    if start >= end {
        None
    } else {
        Some(start as usize..end as usize)
    }
}

/// Resolves a possibly negative index into a position, if in range.
pub fn resolve_index(len: usize, index: i64) -> Option<usize> {
    let len = len as i64;
    let position = if index < 0 { len + index } else { index };
    (0..len).contains(&position).then_some(position as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("key{}", i)).collect()
    }

    #[test]
    fn test_scan_walks_everything_once() {
        let all = keys(5);
        let pattern = GlobPattern::default();
        let mut cursor = 0;
        let mut seen = Vec::new();
        let mut calls = 0;

        loop {
            let page = scan_page(&all, cursor, 2, &pattern);
            assert!(page.items.len() <= 2);
            seen.extend(page.items);
            calls += 1;
            cursor = page.cursor;
            if cursor == 0 {
                break;
            }
        }

        assert_eq!(calls, 3);
        assert_eq!(seen, all);
    }

    #[test]
    fn test_scan_filters_by_pattern() {
        let items: Vec<String> = ["apple", "banana", "avocado", "cherry"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let page = scan_page(&items, 0, 10, &GlobPattern::new("a*"));
        assert_eq!(page.cursor, 0);
        assert_eq!(page.items, vec!["apple", "avocado"]);

        // the window is positional, so a page may hold no matches
        let page = scan_page(&items, 1, 1, &GlobPattern::new("a*"));
        assert_eq!(page.cursor, 2);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_scan_past_end() {
        let all = keys(3);
        let page = scan_page(&all, 10, 5, &GlobPattern::default());
        assert_eq!(page, ScanPage { cursor: 0, items: vec![] });

        let empty: Vec<String> = Vec::new();
        assert_eq!(scan_page(&empty, 0, 10, &GlobPattern::default()).cursor, 0);
    }

    #[test]
    fn test_slice_bounds() {
        assert_eq!(slice_bounds(5, 0, -1), Some(0..5));
        assert_eq!(slice_bounds(5, 1, 3), Some(1..4));
        assert_eq!(slice_bounds(5, -3, -1), Some(2..5));
        assert_eq!(slice_bounds(5, -100, 1), Some(0..2));
        assert_eq!(slice_bounds(5, 0, 100), Some(0..5));
        assert_eq!(slice_bounds(5, 0, -2), Some(0..4));
        assert_eq!(slice_bounds(5, 3, 1), None);
        assert_eq!(slice_bounds(5, 7, 9), None);
        assert_eq!(slice_bounds(5, 0, -6), None);
        assert_eq!(slice_bounds(0, 0, -1), None);
    }

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(3, 0), Some(0));
        assert_eq!(resolve_index(3, -1), Some(2));
        assert_eq!(resolve_index(3, -3), Some(0));
        assert_eq!(resolve_index(3, 3), None);
        assert_eq!(resolve_index(3, -4), None);
        assert_eq!(resolve_index(0, 0), None);
    }
}
