//! Registry of named storage areas.
//!
//! Every [`Engine`](crate::commands::Engine) built on the same registry and
//! bound to the same area name reads and writes the same [`Keyspace`]. Areas
//! are created on first reference.
//!
//! Each area sits behind its own mutex, held by a command for its whole
//! read-modify-write sequence.

use crate::storage::expiry::{Clock, SystemClock};
use crate::storage::keyspace::Keyspace;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tracing::debug;

/// Shared handle to one storage area.
pub type Area = Arc<Mutex<Keyspace>>;

/// The set of storage areas plus the clock that drives expiry.
#[derive(Debug)]
pub struct Registry {
    areas: RwLock<HashMap<String, Area>>,
    clock: Arc<dyn Clock>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates a registry driven by the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a registry driven by the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            areas: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Returns the named area, creating it if needed.
    pub fn area(&self, name: &str) -> Area {
        {
            let areas = self.areas.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(area) = areas.get(name) {
                return Arc::clone(area);
            }
        }

        let mut areas = self.areas.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(areas.entry(name.to_string()).or_insert_with(|| {
            debug!(storage = name, "Created storage area");
            Arc::new(Mutex::new(Keyspace::new()))
        }))
    }

    /// Names of all areas created so far.
    pub fn area_names(&self) -> Vec<String> {
        let areas = self.areas.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = areas.keys().cloned().collect();
        names.sort();
        names
    }

    /// Current time in epoch seconds.
    pub fn now(&self) -> i64 {
        self.clock.now()
    }
}

/// Locks an area, recovering the keyspace if a previous holder panicked.
pub fn lock_area(area: &Mutex<Keyspace>) -> MutexGuard<'_, Keyspace> {
    area.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::expiry::ManualClock;
    use crate::storage::value::Scalar;

    #[test]
    fn test_area_is_shared() {
        let registry = Registry::new();
        let first = registry.area("cache");
        let second = registry.area("cache");
        assert!(Arc::ptr_eq(&first, &second));

        lock_area(&first).put("k", Scalar::from("v").into());
        assert!(lock_area(&second).contains("k"));
    }

    #[test]
    fn test_areas_are_independent() {
        let registry = Registry::new();
        lock_area(&registry.area("")).put("k", Scalar::from(1).into());
        assert!(!lock_area(&registry.area("other")).contains("k"));
        assert_eq!(registry.area_names(), vec!["", "other"]);
    }

    #[test]
    fn test_clock_is_injected() {
        let clock = Arc::new(ManualClock::new(42));
        let registry = Registry::with_clock(clock.clone());
        assert_eq!(registry.now(), 42);
        clock.advance(3);
        assert_eq!(registry.now(), 45);
    }

    #[test]
    fn test_poisoned_area_recovers() {
        let registry = Arc::new(Registry::new());
        let area = registry.area("");

        let poisoner = Arc::clone(&area);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(area.is_poisoned());
        lock_area(&area).put("k", Scalar::from(1).into());
        assert!(lock_area(&area).contains("k"));
    }
}
