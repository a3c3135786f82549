//! Insertion-ordered set of unique string members.
//!
//! Members are held twice: in a `Vec` that fixes the order `SMEMBERS`
//! returns and `SSCAN` cursors index into, and in a `HashSet` for
//! constant-time membership checks.

use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberSet {
    members: Vec<String>,
    index: HashSet<String>,
}

impl MemberSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a member. Returns `false` if it was already present.
    pub fn insert(&mut self, member: &str) -> bool {
        if self.index.contains(member) {
            return false;
        }
        self.index.insert(member.to_string());
        self.members.push(member.to_string());
        true
    }

    /// Removes every listed member in one pass. Returns how many were
    /// present.
    pub fn remove_all<'a, I>(&mut self, members: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let removed: HashSet<&str> = members
            .into_iter()
            .filter(|member| self.index.contains(*member))
            .collect();
        if removed.is_empty() {
            return 0;
        }
        self.members.retain(|m| !removed.contains(m.as_str()));
        for member in &removed {
            self.index.remove(*member);
        }
        removed.len()
    }

    pub fn contains(&self, member: &str) -> bool {
        self.index.contains(member)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.members.iter()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.members.clone()
    }
}

impl<'a> FromIterator<&'a str> for MemberSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = MemberSet::new();
        for member in iter {
            set.insert(member);
        }
        set
    }
}
