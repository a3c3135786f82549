//! Expiry Clock
//!
//! Expiry is purely lazy: there is no background sweeper. Every command that
//! touches a key first asks whether the key's deadline has passed, and if so
//! deletes it before doing anything else.
//!
//! Deadlines are absolute epoch seconds. A key is expired once the clock has
//! moved *strictly past* its deadline, so a key set to expire at `t` is still
//! readable during second `t`.
//!
//! The clock is injectable. [`SystemClock`] reads the wall clock;
//! [`ManualClock`] only moves when told to, which makes expiry deterministic
//! in tests.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time in epoch seconds.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current time in seconds since the Unix epoch.
    fn now(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

/// A clock that only changes when told to.
///
/// # Example
///
/// ```
/// use kvmock::storage::{Clock, ManualClock};
///
/// let clock = ManualClock::new(1_000);
/// clock.advance(5);
/// assert_eq!(clock.now(), 1_005);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: i64) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    /// Jumps to an absolute time.
    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Moves the clock forward by `secs`.
    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Returns true if a deadline has passed.
#[inline]
pub fn is_expired(expires_at: i64, now: i64) -> bool {
    now > expires_at
}

/// Seconds left before a deadline, never negative.
#[inline]
pub fn remaining_secs(expires_at: i64, now: i64) -> i64 {
    expires_at.saturating_sub(now).max(0)
}
