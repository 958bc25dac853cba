//! Storage collaborators for the catalog
//!
//! The catalog only ever reads. Every backend exposes the same four
//! capabilities: count, windowed find, distinct values, and find-one.

pub mod jsonl;
pub mod sqlite;
#[cfg(test)]
pub mod testing;

use bookshelf_core::book::{Book, Field};
use bookshelf_core::filter::Predicate;
use bookshelf_core::pagination::PageWindow;

pub use jsonl::JsonStore;
pub use sqlite::{SqliteOptions, SqliteStore};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Collection not found: {0}")]
    MissingCollection(String),

    #[error("Invalid collection name: {0}")]
    InvalidCollection(String),

    #[error("Query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Malformed document {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only access to a book collection
///
/// Results of `find` follow the backend's natural order, which must be the
/// same for every call against an unchanged collection.
pub trait BookStore: Send + Sync {
    /// Number of books matching the predicate
    fn count(&self, predicate: &Predicate) -> Result<u64, StoreError>;

    /// Matching books inside the window, in natural order
    fn find(&self, predicate: &Predicate, window: PageWindow) -> Result<Vec<Book>, StoreError>;

    /// Distinct values of a field across the whole collection
    fn distinct(&self, field: Field) -> Result<Vec<String>, StoreError>;

    /// First matching book, if any
    fn find_one(&self, predicate: &Predicate) -> Result<Option<Book>, StoreError> {
        let mut found = self.find(predicate, PageWindow { offset: 0, limit: 1 })?;
        Ok(if found.is_empty() {
            None
        } else {
            Some(found.swap_remove(0))
        })
    }
}

/// Whether `name` can be used as a bare collection (table) name
pub fn is_valid_collection_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
