//! Shared fixtures for store, catalog and web tests

use super::sqlite::schema_sql;
use bookshelf_core::book::Book;
use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

/// 45 books: 20 "Tech", 15 "Poetry", 10 "Mystery", interleaved
pub fn scenario_books() -> Vec<Book> {
    (0..45)
        .map(|i| {
            let category = match i % 9 {
                0 | 2 | 4 | 6 => "Tech",
                1 | 3 | 5 => "Poetry",
                _ => "Mystery",
            };
            Book::new(
                format!("upc{i:04}"),
                format!("{category} Volume {i}"),
                category,
            )
            .with_attribute("price", format!("£{}.99", 10 + i))
        })
        .collect()
}

/// Write `books` into a fresh SQLite database file
///
/// Returns the temp dir guard and the database path.
pub fn sqlite_fixture(collection: &str, books: &[Book]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scrapy_data.db");
    write_sqlite(&path, collection, books);
    (dir, path)
}

pub fn write_sqlite(path: &std::path::Path, collection: &str, books: &[Book]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(&schema_sql(collection).unwrap()).unwrap();
    let sql = format!(
        "INSERT INTO \"{collection}\" (upc, title, category, attributes) VALUES (?1, ?2, ?3, ?4)"
    );
    for book in books {
        let attributes = serde_json::to_string(&book.attributes).unwrap();
        conn.execute(&sql, (&book.upc, &book.title, &book.category, &attributes))
            .unwrap();
    }
}

/// Serialize `books` as JSON Lines
pub fn jsonl(books: &[Book]) -> String {
    books
        .iter()
        .map(|b| serde_json::to_string(b).unwrap())
        .collect::<Vec<_>>()
        .join("\n")
}
