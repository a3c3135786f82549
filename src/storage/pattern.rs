//! Glob pattern matching for `KEYS`, `SCAN` and `SSCAN`.
//!
//! Supported syntax, always anchored to the whole string:
//!
//! - `*` matches any run of characters, including none
//! - `?` matches exactly one character
//! - `[abc]`, `[a-z]`, `[^a]` match a run of *one or more* characters drawn
//!   from the group
//! - `\x` matches `x` literally
//!
//! Everything else matches itself.

/// A compiled glob pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern {
    pattern: Vec<char>,
    match_all: bool,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.chars().collect(),
            match_all: pattern == "*",
        }
    }

    /// True for the bare `*` pattern, which skips matching entirely.
    pub fn is_match_all(&self) -> bool {
        self.match_all
    }

    pub fn matches(&self, text: &str) -> bool {
        if self.match_all {
            return true;
        }
        let text: Vec<char> = text.chars().collect();
        matches_recursive(&self.pattern, &text)
    }
}

impl Default for GlobPattern {
    fn default() -> Self {
        Self::new("*")
    }
}

fn matches_recursive(pattern: &[char], text: &[char]) -> bool {
    let Some(&first) = pattern.first() else {
        return text.is_empty();
    };

    match first {
        '*' => {
            // collapse runs of stars
            let rest = &pattern[1..];
            if rest.is_empty() {
                return true;
            }
            (0..=text.len()).any(|i| matches_recursive(rest, &text[i..]))
        }
        '?' => !text.is_empty() && matches_recursive(&pattern[1..], &text[1..]),
        '[' => match CharClass::parse(&pattern[1..]) {
            Some((class, rest)) => {
                let mut i = 0;
                while i < text.len() && class.contains(text[i]) {
                    i += 1;
                    if matches_recursive(rest, &text[i..]) {
                        return true;
                    }
                }
                false
            }
            // no closing bracket: a literal '['
            None => text.first() == Some(&'[') && matches_recursive(&pattern[1..], &text[1..]),
        },
        '\\' if pattern.len() > 1 => {
            text.first() == Some(&pattern[1]) && matches_recursive(&pattern[2..], &text[1..])
        }
        c => text.first() == Some(&c) && matches_recursive(&pattern[1..], &text[1..]),
    }
}

/// A bracket group such as `[a-z_]` or `[^0-9]`.
struct CharClass<'a> {
    items: &'a [char],
    negate: bool,
}

impl<'a> CharClass<'a> {
    /// Parses the group body that follows `[`. Returns the class and the
    /// pattern remaining after the closing `]`.
    fn parse(body: &'a [char]) -> Option<(Self, &'a [char])> {
        let negate = matches!(body.first(), Some('^') | Some('!'));
        let start = usize::from(negate);
        let close = body[start..].iter().position(|&c| c == ']')? + start;
        Some((
            CharClass {
                items: &body[start..close],
                negate,
            },
            &body[close + 1..],
        ))
    }

    fn contains(&self, c: char) -> bool {
        let mut matched = false;
        let mut i = 0;
        while i < self.items.len() {
            if i + 2 < self.items.len() && self.items[i + 1] == '-' {
                if self.items[i] <= c && c <= self.items[i + 2] {
                    matched = true;
                }
                i += 3;
            } else {
                if self.items[i] == c {
                    matched = true;
                }
                i += 1;
            }
        }
        matched != self.negate
    }
}
