//! In-process book repository.
//!
//! Stands in for the SQLite store where a test or tool wants the catalog
//! semantics without a database file. Mutations go through
//! `Book::append_comment`, so the counter invariant holds here too.

use crate::model::book::{Book, BookSummary};
use crate::model::book_id::BookId;
use crate::repo::book_repo::{BookRepository, RepoError, RepoResult};
use parking_lot::Mutex;

/// `BookRepository` over a mutex-guarded vector.
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    books: Mutex<Vec<Book>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.books.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.lock().is_empty()
    }
}

impl BookRepository for InMemoryBookRepository {
    fn insert_book(&self, book: &Book) -> RepoResult<BookId> {
        let mut books = self.books.lock();
        if books.iter().any(|stored| stored.id() == book.id()) {
            return Err(RepoError::Integrity(format!(
                "duplicate book id {}",
                book.id()
            )));
        }
        books.push(book.clone());
        Ok(book.id())
    }

    fn list_books(&self, limit: u32) -> RepoResult<Vec<BookSummary>> {
        let mut summaries: Vec<BookSummary> =
            self.books.lock().iter().map(Book::summary).collect();
        summaries.sort_by(|left, right| {
            left.title
                .as_bytes()
                .cmp(right.title.as_bytes())
                .then_with(|| left.id.cmp(&right.id))
        });
        summaries.truncate(limit as usize);
        Ok(summaries)
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        Ok(self
            .books
            .lock()
            .iter()
            .find(|book| book.id() == id)
            .cloned())
    }

    fn append_comment(&self, id: BookId, comment: &str) -> RepoResult<()> {
        let mut books = self.books.lock();
        let book = books
            .iter_mut()
            .find(|book| book.id() == id)
            .ok_or(RepoError::NotFound(id))?;
        book.append_comment(comment);
        Ok(())
    }

    fn delete_book(&self, id: BookId) -> RepoResult<usize> {
        let mut books = self.books.lock();
        let before = books.len();
        books.retain(|book| book.id() != id);
        Ok(before - books.len())
    }

    fn delete_all_books(&self) -> RepoResult<usize> {
        let mut books = self.books.lock();
        let removed = books.len();
        books.clear();
        Ok(removed)
    }
}
