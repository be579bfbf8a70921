//! Catalog use-case services.
//!
//! # Responsibility
//! - Turn caller input into repository calls and typed outcomes.
//! - Keep adapters (CLI, HTTP) decoupled from storage details.

pub mod book_service;
