//! Storage layer for eky.
//!
//! Attributes live in a single JSON object at `~/.eky.json`. The file is
//! read once per invocation and rewritten in full, atomically (write to a
//! temp file, then rename), after every mutation.
//!
//! # Example
//!
//! ```no_run
//! use eky_store::{render, Store};
//!
//! let mut store = Store::open_default().unwrap();
//! store.set("n", "42").unwrap();
//!
//! if let Some(value) = store.get("n") {
//!     println!("{}", render(value));
//! }
//! ```

pub mod atomic;
pub mod config;
pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::{parse_value, render, Document, Store};
