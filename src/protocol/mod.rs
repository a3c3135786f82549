//! Command Boundary
//!
//! The engine is driven in-process, so there is no wire format. This module
//! holds the two pieces shared by every caller of the command surface:
//!
//! - `types`: the [`Reply`] enum every command returns
//! - `parser`: a tokenizer turning a textual command line into arguments
//!
//! ## Example
//!
//! ```
//! use kvmock::protocol::{tokenize, Reply};
//!
//! let args = tokenize("SADD tags rust mock").unwrap();
//! assert_eq!(args.len(), 4);
//!
//! let reply = Reply::integer(2);
//! assert_eq!(reply.to_string(), "(integer) 2");
//! ```

pub mod parser;
pub mod types;

pub use parser::{tokenize, ParseError};
pub use types::Reply;
