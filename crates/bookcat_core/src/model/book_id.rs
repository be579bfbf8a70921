//! Book identifier codec.
//!
//! # Responsibility
//! - Convert opaque caller-supplied id text into the store key type.
//! - Reject malformed input as a value, never by panicking.
//!
//! # Invariants
//! - Only canonical UUID text is accepted: 36-char hyphenated or 32-char
//!   simple hex. Braced/URN forms and surrounding whitespace are rejected.
//! - Parsing is pure and has no side effects.

use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable store key for one book record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type BookId = Uuid;

const HYPHENATED_LEN: usize = 36;
const SIMPLE_LEN: usize = 32;

/// Raised when caller-supplied id text is not a valid book key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookIdError {
    /// Input was empty.
    Empty,
    /// Input length does not match any accepted key form.
    InvalidLength(usize),
    /// Input has the right length but is not a UUID.
    Malformed(String),
}

impl Display for BookIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "book id must not be empty"),
            Self::InvalidLength(len) => write!(
                f,
                "book id must be {HYPHENATED_LEN} or {SIMPLE_LEN} characters, got {len}"
            ),
            Self::Malformed(message) => write!(f, "malformed book id: {message}"),
        }
    }
}

impl Error for BookIdError {}

/// Parses caller-supplied text into a [`BookId`].
///
/// # Errors
/// - [`BookIdError::Empty`] for empty input.
/// - [`BookIdError::InvalidLength`] when the length is not 32 or 36 bytes.
/// - [`BookIdError::Malformed`] when the text is not valid hex/hyphen layout.
pub fn parse_book_id(raw: &str) -> Result<BookId, BookIdError> {
    if raw.is_empty() {
        return Err(BookIdError::Empty);
    }

    if raw.len() != HYPHENATED_LEN && raw.len() != SIMPLE_LEN {
        return Err(BookIdError::InvalidLength(raw.len()));
    }

    Uuid::try_parse(raw).map_err(|err| BookIdError::Malformed(err.to_string()))
}

/// Renders a key in the form persisted by the store.
pub fn book_id_to_db(id: BookId) -> String {
    id.as_hyphenated().to_string()
}
