//! Core data-access layer for the bookcat catalog.
//! This crate is the single source of truth for catalog invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{CatalogConfig, ConfigError, StoreTarget};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{Book, BookDetail, BookSummary, BookValidationError, CreatedBook};
pub use model::book_id::{parse_book_id, BookId, BookIdError};
pub use repo::book_repo::{BookRepository, RepoError, RepoResult, SqliteBookRepository};
pub use repo::memory_book_repo::InMemoryBookRepository;
pub use service::book_service::{
    BookService, BookServiceError, ClearOutcome, DELETE_SUCCESS_MESSAGE, LIST_LIMIT,
};
