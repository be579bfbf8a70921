//! Book domain model and read projections.
//!
//! # Responsibility
//! - Define the canonical book record with its embedded comment list.
//! - Define list/detail/create projections handed to callers by value.
//!
//! # Invariants
//! - `title` is non-empty and never changes after creation.
//! - `comments` is append-only; insertion order is display order.
//! - `comment_count == comments.len()` at all times. The counter can only
//!   move through [`Book::append_comment`].

use crate::model::book_id::BookId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Validation failures for caller input and persisted book state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    /// Title was absent or empty at creation.
    MissingTitle,
    /// Comment text was absent or empty.
    MissingComment,
    /// Stored counter disagrees with the stored comment list.
    CommentCountMismatch { count: u32, comments: usize },
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "missing required field title"),
            Self::MissingComment => write!(f, "missing required field comment"),
            Self::CommentCountMismatch { count, comments } => write!(
                f,
                "comment count {count} does not match {comments} stored comments"
            ),
        }
    }
}

impl Error for BookValidationError {}

/// Canonical book record.
///
/// Fields are private so the comment counter cannot drift from the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    id: BookId,
    title: String,
    comments: Vec<String>,
    comment_count: u32,
}

impl Book {
    /// Creates a new book with a generated id and no comments.
    ///
    /// # Errors
    /// - [`BookValidationError::MissingTitle`] when `title` is empty.
    pub fn new(title: impl Into<String>) -> Result<Self, BookValidationError> {
        Self::with_id(Uuid::new_v4(), title)
    }

    /// Creates a new book with a caller-provided id and no comments.
    pub fn with_id(id: BookId, title: impl Into<String>) -> Result<Self, BookValidationError> {
        let title = title.into();
        if title.is_empty() {
            return Err(BookValidationError::MissingTitle);
        }

        Ok(Self {
            id,
            title,
            comments: Vec::new(),
            comment_count: 0,
        })
    }

    /// Rebuilds a book from persisted parts.
    ///
    /// # Errors
    /// - [`BookValidationError::MissingTitle`] when the stored title is empty.
    /// - [`BookValidationError::CommentCountMismatch`] when the stored counter
    ///   disagrees with the stored list.
    pub fn from_parts(
        id: BookId,
        title: String,
        comments: Vec<String>,
        comment_count: u32,
    ) -> Result<Self, BookValidationError> {
        if title.is_empty() {
            return Err(BookValidationError::MissingTitle);
        }
        if comments.len() != comment_count as usize {
            return Err(BookValidationError::CommentCountMismatch {
                count: comment_count,
                comments: comments.len(),
            });
        }

        Ok(Self {
            id,
            title,
            comments,
            comment_count,
        })
    }

    /// Appends one comment and bumps the counter in the same step.
    pub fn append_comment(&mut self, comment: impl Into<String>) {
        self.comments.push(comment.into());
        self.comment_count += 1;
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn comment_count(&self) -> u32 {
        self.comment_count
    }

    /// List-view projection. Never carries comments.
    pub fn summary(&self) -> BookSummary {
        BookSummary {
            id: self.id,
            title: self.title.clone(),
            comment_count: self.comment_count,
        }
    }

    /// Detail-view projection. The counter is implied by `comments.len()`.
    pub fn detail(&self) -> BookDetail {
        BookDetail {
            id: self.id,
            title: self.title.clone(),
            comments: self.comments.clone(),
        }
    }
}

/// List-view projection of one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    /// Serialized as `_id` to match the public client contract.
    #[serde(rename = "_id")]
    pub id: BookId,
    pub title: String,
    #[serde(rename = "commentcount")]
    pub comment_count: u32,
}

/// Detail-view projection of one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetail {
    #[serde(rename = "_id")]
    pub id: BookId,
    pub title: String,
    /// Insertion-ordered comment list.
    pub comments: Vec<String>,
}

/// Acknowledgement returned after a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBook {
    #[serde(rename = "_id")]
    pub id: BookId,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::{Book, BookValidationError};
    use uuid::Uuid;

    #[test]
    fn new_book_starts_without_comments() {
        let book = Book::new("Dune").unwrap();
        assert_eq!(book.title(), "Dune");
        assert!(book.comments().is_empty());
        assert_eq!(book.comment_count(), 0);
    }

    #[test]
    fn empty_title_is_rejected() {
        assert_eq!(Book::new(""), Err(BookValidationError::MissingTitle));
    }

    #[test]
    fn append_keeps_count_in_step_with_list() {
        let mut book = Book::new("Dune").unwrap();
        for idx in 0..5 {
            book.append_comment(format!("comment {idx}"));
            assert_eq!(book.comment_count() as usize, book.comments().len());
        }
        assert_eq!(book.comments().last().map(String::as_str), Some("comment 4"));
    }

    #[test]
    fn from_parts_rejects_count_mismatch() {
        let err = Book::from_parts(
            Uuid::new_v4(),
            "Dune".to_string(),
            vec!["one".to_string()],
            2,
        )
        .unwrap_err();
        assert_eq!(
            err,
            BookValidationError::CommentCountMismatch {
                count: 2,
                comments: 1
            }
        );
    }

    #[test]
    fn projections_use_client_field_names() {
        let mut book = Book::new("Dune").unwrap();
        book.append_comment("spice");

        let summary = serde_json::to_value(book.summary()).unwrap();
        assert_eq!(summary["commentcount"], 1);
        assert!(summary.get("comments").is_none());
        assert_eq!(summary["_id"], book.id().to_string());

        let detail = serde_json::to_value(book.detail()).unwrap();
        assert_eq!(detail["comments"][0], "spice");
        assert!(detail.get("commentcount").is_none());
    }
}
