//! # kvmock - An In-Process Redis-Style Command Emulator
//!
//! kvmock emulates a subset of a Redis-style command surface entirely in
//! memory, so client code can be exercised against realistic read, write,
//! expiry and ordering semantics without a live server.
//!
//! ## Features
//!
//! - **Typed keyspace**: scalars, lists, sets, hashes, sorted sets and bit
//!   arrays, with type-mismatch sentinels instead of silent coercion
//! - **Lazy expiry**: deadlines are enforced when a key is touched, driven
//!   by an injectable clock
//! - **Sorted sets**: score-then-member ordering, score ranges, weighted
//!   unions
//! - **Cursor iteration**: `SCAN`/`SSCAN` paging with glob filters
//! - **Transactions and pipelines**: replies deferred per handle until
//!   `EXEC`/`EXECUTE`
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                               kvmock                                │
//! │                                                                     │
//! │  ┌──────────────┐    ┌──────────────┐    ┌──────────────────────┐   │
//! │  │  tokenize()  │───>│   Command    │───>│        Engine        │   │
//! │  │  (protocol)  │    │   Handler    │    │  (per-handle buffer) │   │
//! │  └──────────────┘    └──────────────┘    └──────────┬───────────┘   │
//! │                                                     │               │
//! │                                                     ▼               │
//! │                     ┌──────────────────────────────────────────┐    │
//! │                     │                 Registry                 │    │
//! │                     │  ┌────────┐ ┌────────┐ ┌────────┐        │    │
//! │                     │  │ ""     │ │ cache  │ │ ...    │ areas  │    │
//! │                     │  │ Mutex  │ │ Mutex  │ │ Mutex  │        │    │
//! │                     │  └────────┘ └────────┘ └────────┘        │    │
//! │                     └──────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use kvmock::{Engine, Registry, Reply};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(Registry::new());
//! let mut redis = Engine::new(registry);
//!
//! redis.rpush("queue", &["a", "b"]);
//! assert_eq!(redis.lpop("queue"), Reply::bulk("a"));
//!
//! redis.multi();
//! redis.set("counter", 1);
//! redis.incr("counter");
//! assert_eq!(
//!     redis.exec(),
//!     Reply::array(vec![Reply::ok(), Reply::integer(2)])
//! );
//! ```
//!
//! ## Module Overview
//!
//! - [`protocol`]: the [`Reply`] type and the command-line tokenizer
//! - [`storage`]: values, keyspaces, the area registry, expiry, glob patterns,
//!   cursors and the sorted-set structure
//! - [`commands`]: the [`Engine`] command surface, the result buffer and the
//!   textual [`CommandHandler`]
//! - [`config`]: engine settings
//! - [`error`]: raised failures
//!
//! ## Design Highlights
//!
//! ### Sentinels vs errors
//!
//! Addressing a key that holds another type is not an error: the command
//! answers `Null` or `0` and changes nothing. Only malformed input and the
//! deliberately unsupported multi-member sorted-set forms raise an
//! [`EmulatorError`].
//!
//! ### One lock per command
//!
//! Each storage area sits behind its own mutex. A command takes it once and
//! holds it for its whole read-modify-write sequence, so composite commands
//! such as `MSET` or `ZUNIONSTORE` apply atomically and contribute a single
//! reply to an open transaction.

pub mod commands;
pub mod config;
pub mod error;
pub mod protocol;
pub mod storage;

// Re-export commonly used types for convenience
pub use commands::{
    BufferMode, CommandHandler, Engine, RangeOptions, ScanOptions, SetOptions, UnionOptions,
};
pub use config::EmulatorConfig;
pub use error::{EmulatorError, Result};
pub use protocol::{tokenize, ParseError, Reply};
pub use storage::{Aggregate, Clock, ManualClock, Registry, SystemClock};

/// Version of kvmock
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
