use bookcat_core::db::migrations::latest_version;
use bookcat_core::db::open_db_in_memory;
use bookcat_core::{Book, BookRepository, RepoError, SqliteBookRepository};
use rusqlite::Connection;
use uuid::Uuid;

#[test]
fn insert_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let book = Book::new("Neuromancer").unwrap();
    let id = repo.insert_book(&book).unwrap();

    let loaded = repo.get_book(id).unwrap().unwrap();
    assert_eq!(loaded, book);
    assert!(loaded.comments().is_empty());
    assert_eq!(loaded.comment_count(), 0);
}

#[test]
fn get_missing_book_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    assert!(repo.get_book(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn append_comment_extends_list_and_counter_together() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let id = repo.insert_book(&Book::new("Solaris").unwrap()).unwrap();

    repo.append_comment(id, "first").unwrap();
    repo.append_comment(id, "").unwrap();
    repo.append_comment(id, "quote \" and \\ backslash").unwrap();

    let loaded = repo.get_book(id).unwrap().unwrap();
    assert_eq!(
        loaded.comments(),
        ["first", "", "quote \" and \\ backslash"]
    );
    assert_eq!(loaded.comment_count(), 3);

    let (stored_count, stored_len): (i64, i64) = conn
        .query_row(
            "SELECT comment_count, json_array_length(comments) FROM books WHERE id = ?1;",
            [id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(stored_count, stored_len);
}

#[test]
fn append_comment_to_missing_book_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let id = Uuid::new_v4();
    let err = repo.append_comment(id, "orphan").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id));
}

#[test]
fn list_orders_by_title_bytes_and_applies_limit() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    for title in ["b", "C", "a", "B"] {
        repo.insert_book(&Book::new(title).unwrap()).unwrap();
    }

    let titles: Vec<String> = repo
        .list_books(10)
        .unwrap()
        .into_iter()
        .map(|book| book.title)
        .collect();
    assert_eq!(titles, vec!["B", "C", "a", "b"]);

    assert_eq!(repo.list_books(2).unwrap().len(), 2);
}

#[test]
fn list_reports_counter_without_loading_comments() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let id = repo.insert_book(&Book::new("Ubik").unwrap()).unwrap();
    repo.append_comment(id, "one").unwrap();
    repo.append_comment(id, "two").unwrap();

    let listed = repo.list_books(10).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].comment_count, 2);
}

#[test]
fn delete_book_reports_removed_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let id = repo.insert_book(&Book::new("Gone").unwrap()).unwrap();

    assert_eq!(repo.delete_book(id).unwrap(), 1);
    assert_eq!(repo.delete_book(id).unwrap(), 0);
    assert!(repo.get_book(id).unwrap().is_none());
}

#[test]
fn delete_all_books_reports_removed_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    repo.insert_book(&Book::new("One").unwrap()).unwrap();
    repo.insert_book(&Book::new("Two").unwrap()).unwrap();

    assert_eq!(repo.delete_all_books().unwrap(), 2);
    assert_eq!(repo.delete_all_books().unwrap(), 0);
}

#[test]
fn duplicate_titles_are_stored_separately() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let first = repo.insert_book(&Book::new("Twin").unwrap()).unwrap();
    let second = repo.insert_book(&Book::new("Twin").unwrap()).unwrap();

    assert_ne!(first, second);
    assert_eq!(repo.list_books(10).unwrap().len(), 2);
}

#[test]
fn corrupted_counter_is_reported_as_integrity_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let id = repo.insert_book(&Book::new("Tampered").unwrap()).unwrap();

    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "UPDATE books SET comment_count = 5 WHERE id = ?1;",
        [id.to_string()],
    )
    .unwrap();

    let err = repo.get_book(id).unwrap_err();
    assert!(matches!(err, RepoError::Integrity(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteBookRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_books_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteBookRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("books"))
    ));
}

#[test]
fn repository_rejects_books_table_missing_columns() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE books (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteBookRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "books",
            column: "comments"
        })
    ));
}
