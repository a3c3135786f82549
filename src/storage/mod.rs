//! Storage Module
//!
//! Everything the command engine reads and writes lives here: the value
//! model, the per-area keyspace with lazy expiry, the registry of storage
//! areas, and the leaf algorithms (glob matching, cursor paging, the ordered
//! member set, the sorted set) that the commands are built from.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Registry                             │
//! │  ┌───────────┐ ┌───────────┐ ┌───────────┐                  │
//! │  │ area ""   │ │ area "a"  │ │ area "b"  │   ...            │
//! │  │ Mutex     │ │ Mutex     │ │ Mutex     │                  │
//! │  │ Keyspace  │ │ Keyspace  │ │ Keyspace  │                  │
//! │  └───────────┘ └───────────┘ └───────────┘                  │
//! │                        Clock                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use kvmock::storage::{lock_area, ManualClock, Registry, Scalar};
//! use std::sync::Arc;
//!
//! let clock = Arc::new(ManualClock::new(1_000));
//! let registry = Registry::with_clock(clock.clone());
//!
//! let area = registry.area("");
//! let mut keyspace = lock_area(&area);
//! keyspace.put("session", Scalar::from("token").into());
//! keyspace.set_expiry("session", 1_010);
//!
//! clock.advance(11);
//! assert!(keyspace.live("session", registry.now()).is_none());
//! ```

pub mod cursor;
pub mod expiry;
pub mod keyspace;
pub mod member_set;
pub mod pattern;
pub mod registry;
pub mod sorted_set;
pub mod value;

// Re-export commonly used types
pub use cursor::{resolve_index, scan_page, slice_bounds, ScanPage};
pub use expiry::{is_expired, remaining_secs, Clock, ManualClock, SystemClock};
pub use keyspace::{Keyspace, KeyspaceSnapshot};
pub use member_set::MemberSet;
pub use pattern::GlobPattern;
pub use registry::{lock_area, Area, Registry};
pub use sorted_set::{format_score, parse_score, Aggregate, ScoreBound, SortedSet};
pub use value::{Scalar, Value, ValueType};
