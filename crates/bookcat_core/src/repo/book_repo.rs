//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the catalog's persistence primitives over the `books` table.
//! - Keep SQL and JSON column details inside the persistence boundary.
//!
//! # Invariants
//! - Comment append is one `UPDATE` statement that bumps `comment_count` and
//!   extends `comments` together; a half-applied append is never visible.
//! - Read paths reject rows whose counter disagrees with the stored list.
//! - List reads never load the `comments` column.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::book::{Book, BookSummary, BookValidationError};
use crate::model::book_id::{book_id_to_db, BookId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const BOOK_COLUMNS: [&str; 6] = [
    "id",
    "title",
    "comments",
    "comment_count",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for book persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// No book row matched the key.
    NotFound(BookId),
    /// Persisted data cannot be decoded into a valid record.
    InvalidData(String),
    /// A write or read observed state the uniqueness/count invariants forbid.
    Integrity(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted book data: {message}"),
            Self::Integrity(message) => write!(f, "book integrity violation: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "book repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "book repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "book repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence primitives used by the book service.
pub trait BookRepository {
    /// Persists a freshly created book and returns its key.
    fn insert_book(&self, book: &Book) -> RepoResult<BookId>;
    /// Lists summaries ordered by title (byte order), then id.
    fn list_books(&self, limit: u32) -> RepoResult<Vec<BookSummary>>;
    /// Loads one full record.
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Atomically appends one comment and bumps the counter.
    ///
    /// Returns `RepoError::NotFound` when no row matched.
    fn append_comment(&self, id: BookId, comment: &str) -> RepoResult<()>;
    /// Deletes one record and returns how many rows were removed.
    fn delete_book(&self, id: BookId) -> RepoResult<usize>;
    /// Deletes every record and returns how many rows were removed.
    fn delete_all_books(&self) -> RepoResult<usize>;
}

/// SQLite-backed book repository borrowing a caller-owned connection.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Creates repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the `books`
    ///   table does not have the expected shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_book_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn insert_book(&self, book: &Book) -> RepoResult<BookId> {
        let comments = serde_json::to_string(book.comments())
            .map_err(|err| RepoError::InvalidData(format!("cannot encode comments: {err}")))?;

        self.conn.execute(
            "INSERT INTO books (id, title, comments, comment_count)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                book_id_to_db(book.id()),
                book.title(),
                comments,
                i64::from(book.comment_count()),
            ],
        )?;

        Ok(book.id())
    }

    fn list_books(&self, limit: u32) -> RepoResult<Vec<BookSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, comment_count
             FROM books
             ORDER BY title ASC, id ASC
             LIMIT ?1;",
        )?;

        let mut rows = stmt.query([i64::from(limit)])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_summary_row(row)?);
        }

        Ok(books)
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let raw = self
            .conn
            .query_row(
                "SELECT id, title, comments, comment_count
                 FROM books
                 WHERE id = ?1;",
                [book_id_to_db(id)],
                |row| {
                    Ok((
                        row.get::<_, String>("id")?,
                        row.get::<_, String>("title")?,
                        row.get::<_, String>("comments")?,
                        row.get::<_, i64>("comment_count")?,
                    ))
                },
            )
            .optional()?;

        match raw {
            Some((id_text, title, comments, count)) => {
                Ok(Some(decode_book(&id_text, title, &comments, count)?))
            }
            None => Ok(None),
        }
    }

    fn append_comment(&self, id: BookId, comment: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE books
             SET
                comments = json_insert(comments, '$[#]', ?2),
                comment_count = comment_count + 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![book_id_to_db(id), comment],
        )?;

        match changed {
            0 => Err(RepoError::NotFound(id)),
            1 => Ok(()),
            other => Err(RepoError::Integrity(format!(
                "comment append on {id} touched {other} rows"
            ))),
        }
    }

    fn delete_book(&self, id: BookId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM books WHERE id = ?1;", [book_id_to_db(id)])?;
        Ok(removed)
    }

    fn delete_all_books(&self) -> RepoResult<usize> {
        let removed = self.conn.execute("DELETE FROM books;", [])?;
        Ok(removed)
    }
}

fn parse_summary_row(row: &Row<'_>) -> RepoResult<BookSummary> {
    let id_text: String = row.get("id")?;
    let count: i64 = row.get("comment_count")?;
    Ok(BookSummary {
        id: parse_stored_id(&id_text)?,
        title: row.get("title")?,
        comment_count: parse_stored_count(count)?,
    })
}

fn decode_book(id_text: &str, title: String, comments: &str, count: i64) -> RepoResult<Book> {
    let id = parse_stored_id(id_text)?;
    let comments: Vec<String> = serde_json::from_str(comments).map_err(|err| {
        RepoError::InvalidData(format!("invalid comments json for book {id}: {err}"))
    })?;
    let count = parse_stored_count(count)?;

    Book::from_parts(id, title, comments, count).map_err(|err| match err {
        BookValidationError::CommentCountMismatch { .. } => {
            RepoError::Integrity(format!("book {id}: {err}"))
        }
        other => RepoError::InvalidData(format!("book {id}: {other}")),
    })
}

fn parse_stored_id(value: &str) -> RepoResult<BookId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in books.id")))
}

fn parse_stored_count(value: i64) -> RepoResult<u32> {
    u32::try_from(value).map_err(|_| {
        RepoError::InvalidData(format!("invalid comment_count `{value}` in books.comment_count"))
    })
}

fn ensure_book_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let columns = table_columns(conn, "books")?;
    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable("books"));
    }
    for column in BOOK_COLUMNS {
        if !columns.iter().any(|current| current == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "books",
                column,
            });
        }
    }

    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }
    Ok(columns)
}
