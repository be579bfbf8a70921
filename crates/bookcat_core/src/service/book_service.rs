//! Book catalog use-case service.
//!
//! # Responsibility
//! - Expose the catalog operations: list, create, get, comment, delete one,
//!   delete all.
//! - Run caller id text through the codec before touching the store.
//! - Translate repository outcomes into the catalog's typed results.
//!
//! # Invariants
//! - On read paths a malformed id, a missing record and a failed lookup are
//!   the same `NotFound` outcome.
//! - Integrity violations are never reported as success or as `NotFound`.
//! - Title and comment text never reach the logs.

use crate::model::book::{Book, BookDetail, BookSummary, BookValidationError, CreatedBook};
use crate::model::book_id::{parse_book_id, BookId};
use crate::repo::book_repo::{BookRepository, RepoError};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum number of summaries returned by [`BookService::list_all`].
pub const LIST_LIMIT: u32 = 10_000;

/// User-facing message for a successful single-record delete.
pub const DELETE_SUCCESS_MESSAGE: &str = "delete successful";

const NOT_FOUND_MESSAGE: &str = "no book exists";

/// Errors from catalog operations.
#[derive(Debug)]
pub enum BookServiceError {
    /// Caller input was rejected before reaching the store.
    Validation(BookValidationError),
    /// No such book, or an id that cannot name one.
    NotFound,
    /// Persistence layer failed; the caller may retry.
    StoreUnavailable(RepoError),
    /// More records were affected than uniqueness allows, or a record's
    /// counter disagrees with its comments.
    IntegrityViolation(String),
}

impl Display for BookServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound => write!(f, "{NOT_FOUND_MESSAGE}"),
            Self::StoreUnavailable(err) => write!(f, "book store unavailable: {err}"),
            Self::IntegrityViolation(details) => write!(f, "integrity violation: {details}"),
        }
    }
}

impl Error for BookServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::StoreUnavailable(err) => Some(err),
            Self::NotFound | Self::IntegrityViolation(_) => None,
        }
    }
}

impl From<BookValidationError> for BookServiceError {
    fn from(value: BookValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for BookServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_) => Self::NotFound,
            RepoError::Integrity(details) => Self::IntegrityViolation(details),
            other => Self::StoreUnavailable(other),
        }
    }
}

/// Result of clearing the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// At least one record was removed.
    Cleared { removed: usize },
    /// The catalog held no records.
    EmptyAlready,
}

impl Display for ClearOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cleared { .. } => write!(f, "complete delete successful"),
            Self::EmptyAlready => write!(f, "no books deleted"),
        }
    }
}

/// Catalog facade over a [`BookRepository`].
///
/// Holds no state of its own; every call is one independent store request.
pub struct BookService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists up to [`LIST_LIMIT`] books sorted by title (byte order).
    ///
    /// Entries carry the comment counter, never the comments.
    pub fn list_all(&self) -> Result<Vec<BookSummary>, BookServiceError> {
        self.repo
            .list_books(LIST_LIMIT)
            .map_err(|err| fail("book_list", None, err))
    }

    /// Creates a book with no comments.
    ///
    /// # Errors
    /// - `Validation(MissingTitle)` for absent or empty titles; nothing is
    ///   persisted in that case.
    pub fn create(&self, title: Option<&str>) -> Result<CreatedBook, BookServiceError> {
        let title = title
            .filter(|value| !value.is_empty())
            .ok_or(BookValidationError::MissingTitle)?;
        let book = Book::new(title)?;

        let id = self
            .repo
            .insert_book(&book)
            .map_err(|err| fail("book_create", Some(book.id()), err))?;
        info!("event=book_create module=service status=ok book_id={id}");

        Ok(CreatedBook {
            id,
            title: book.title().to_string(),
        })
    }

    /// Loads the detail view of one book.
    ///
    /// Malformed ids, missing records and lookup failures all return
    /// `NotFound`. Only an integrity violation escapes as something else.
    pub fn get_by_id(&self, raw_id: &str) -> Result<BookDetail, BookServiceError> {
        let id = parse_or_not_found("book_get", raw_id)?;
        match self.repo.get_book(id) {
            Ok(Some(book)) => Ok(book.detail()),
            Ok(None) => Err(BookServiceError::NotFound),
            Err(err @ RepoError::Integrity(_)) => Err(fail("book_get", Some(id), err)),
            Err(err) => {
                warn!("event=book_get module=service status=error book_id={id} error={err}");
                Err(BookServiceError::NotFound)
            }
        }
    }

    /// Appends one comment and returns the updated detail view.
    ///
    /// # Errors
    /// - `NotFound` for malformed ids or missing records.
    /// - `Validation(MissingComment)` for absent or empty comment text.
    /// - `StoreUnavailable` when the append itself fails.
    pub fn add_comment(
        &self,
        raw_id: &str,
        comment: Option<&str>,
    ) -> Result<BookDetail, BookServiceError> {
        let id = parse_or_not_found("book_comment", raw_id)?;
        let comment = comment
            .filter(|value| !value.is_empty())
            .ok_or(BookValidationError::MissingComment)?;

        self.repo
            .append_comment(id, comment)
            .map_err(|err| fail("book_comment", Some(id), err))?;

        let book = self
            .repo
            .get_book(id)
            .map_err(|err| fail("book_comment", Some(id), err))?
            .ok_or(BookServiceError::NotFound)?;
        info!(
            "event=book_comment module=service status=ok book_id={id} comment_count={}",
            book.comment_count()
        );

        Ok(book.detail())
    }

    /// Deletes one book.
    ///
    /// `Ok(())` means exactly one record was removed.
    pub fn delete_by_id(&self, raw_id: &str) -> Result<(), BookServiceError> {
        let id = parse_or_not_found("book_delete", raw_id)?;
        let removed = self
            .repo
            .delete_book(id)
            .map_err(|err| fail("book_delete", Some(id), err))?;

        match removed {
            0 => Err(BookServiceError::NotFound),
            1 => {
                info!("event=book_delete module=service status=ok book_id={id}");
                Ok(())
            }
            other => Err(fail(
                "book_delete",
                Some(id),
                RepoError::Integrity(format!("delete by id removed {other} records")),
            )),
        }
    }

    /// Removes every book.
    pub fn delete_all(&self) -> Result<ClearOutcome, BookServiceError> {
        let removed = self
            .repo
            .delete_all_books()
            .map_err(|err| fail("book_clear", None, err))?;
        info!("event=book_clear module=service status=ok removed={removed}");

        if removed == 0 {
            Ok(ClearOutcome::EmptyAlready)
        } else {
            Ok(ClearOutcome::Cleared { removed })
        }
    }
}

fn parse_or_not_found(event: &'static str, raw_id: &str) -> Result<BookId, BookServiceError> {
    parse_book_id(raw_id).map_err(|err| {
        debug!("event={event} module=service status=rejected reason=invalid_id error={err}");
        BookServiceError::NotFound
    })
}

fn fail(event: &'static str, id: Option<BookId>, err: RepoError) -> BookServiceError {
    let book_id = id.map_or_else(|| "-".to_string(), |id| id.to_string());
    let mapped = BookServiceError::from(err);
    match &mapped {
        BookServiceError::IntegrityViolation(details) => error!(
            "event={event} module=service status=integrity_violation book_id={book_id} details={details}"
        ),
        BookServiceError::StoreUnavailable(source) => warn!(
            "event={event} module=service status=error book_id={book_id} error={source}"
        ),
        BookServiceError::NotFound | BookServiceError::Validation(_) => debug!(
            "event={event} module=service status=rejected book_id={book_id} reason={mapped}"
        ),
    }
    mapped
}
