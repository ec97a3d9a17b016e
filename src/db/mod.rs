//! Embedded JSON document store
//!
//! Metadata is loaded once at construction. Every read or write happens
//! between `begin()` and `end(persist)` against an in-memory document tree
//! parsed from the data file.
//!
//! # Guarantees
//!
//! - Schema validation before every access
//! - `end(false)` discards all changes of the transaction
//! - Generated keys come from a per-entity sequence and are never reused
//!
//! # Not provided
//!
//! - Multi-process or concurrent access
//! - Indexes (lookups are linear scans)
//! - Atomic file replacement on save

mod errors;
mod paths;
mod store;

pub use errors::{DbError, DbErrorCode, DbResult, Severity};
pub use paths::DbPaths;
pub use store::JsonDb;
