//! Catalog domain model.
//!
//! # Responsibility
//! - Define the canonical book record and its read projections.
//! - Own the identifier codec that turns caller text into store keys.
//!
//! # Invariants
//! - Every book is identified by a stable `BookId`.
//! - A book's comment counter always equals its comment list length.

pub mod book;
pub mod book_id;
