//! Repository layer for the book catalog.
//!
//! # Responsibility
//! - Define the persistence contract the service depends on.
//! - Provide the SQLite store and an in-process substitute.
//!
//! # Invariants
//! - Repositories report semantic misses (`NotFound`) separately from
//!   transport failures (`Db`).
//! - Both implementations keep `comment_count == comments.len()`.

pub mod book_repo;
pub mod memory_book_repo;
