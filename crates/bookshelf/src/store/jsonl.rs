use super::{BookStore, StoreError};
use bookshelf_core::book::{Book, Field};
use bookshelf_core::filter::Predicate;
use bookshelf_core::pagination::PageWindow;
use std::collections::BTreeSet;
use std::path::Path;

/// In-memory snapshot of a collection exported as JSON Lines
///
/// One document per line, blank lines ignored. Natural order is file order.
#[derive(Debug, Clone, Default)]
pub struct JsonStore {
    books: Vec<Book>,
}

impl JsonStore {
    #[cfg(test)]
    pub fn from_books(books: Vec<Book>) -> Self {
        Self { books }
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Unavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        let store = Self::parse(&content)?;

        tracing::debug!(
            "Loaded {} book(s) from {}",
            store.books.len(),
            path.display()
        );

        Ok(store)
    }

    pub fn parse(content: &str) -> Result<Self, StoreError> {
        let books = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str::<Book>(line).map_err(|source| StoreError::Decode {
                    context: format!("on line {}", idx + 1),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { books })
    }

    fn matching<'a>(&'a self, predicate: &'a Predicate) -> impl Iterator<Item = &'a Book> + 'a {
        self.books.iter().filter(move |b| predicate.matches(b))
    }
}

impl BookStore for JsonStore {
    fn count(&self, predicate: &Predicate) -> Result<u64, StoreError> {
        Ok(self.matching(predicate).count() as u64)
    }

    fn find(&self, predicate: &Predicate, window: PageWindow) -> Result<Vec<Book>, StoreError> {
        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
        Ok(self
            .matching(predicate)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn distinct(&self, field: Field) -> Result<Vec<String>, StoreError> {
        let values: BTreeSet<&str> = self.books.iter().map(|b| b.field(field)).collect();
        Ok(values.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{jsonl, scenario_books};
    use bookshelf_core::filter::{build_predicate, FilterCriteria};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_skips_blank_lines() {
        let content = format!("\n{}\n\n", jsonl(&scenario_books()[..3]));
        let store = JsonStore::parse(&content).unwrap();
        assert_eq!(store.count(&Predicate::all()).unwrap(), 3);
    }

    #[test]
    fn test_parse_reports_line_number() {
        let content = "{\"upc\":\"a\",\"title\":\"A\",\"category\":\"C\"}\n{broken";
        let err = JsonStore::parse(content).unwrap_err();
        match err {
            StoreError::Decode { context, .. } => assert_eq!(context, "on line 2"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(jsonl(&scenario_books()).as_bytes()).unwrap();

        let store = JsonStore::load(file.path()).unwrap();
        assert_eq!(store.count(&Predicate::all()).unwrap(), 45);
    }

    #[test]
    fn test_load_missing_file() {
        let result = JsonStore::load(Path::new("/nonexistent/books.jsonl"));
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn test_find_windows_in_file_order() {
        let books = scenario_books();
        let store = JsonStore::from_books(books.clone());
        let tech = build_predicate(&FilterCriteria::new(None, Some("Tech")));

        let first = store
            .find(&tech, PageWindow { offset: 0, limit: 20 })
            .unwrap();
        let expected: Vec<Book> = books
            .iter()
            .filter(|b| b.category == "Tech")
            .cloned()
            .collect();
        assert_eq!(first, expected);

        let second = store
            .find(&tech, PageWindow { offset: 20, limit: 20 })
            .unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn test_distinct_is_sorted_and_deduplicated() {
        let store = JsonStore::from_books(scenario_books());
        assert_eq!(
            store.distinct(Field::Category).unwrap(),
            vec!["Mystery", "Poetry", "Tech"]
        );
    }

    #[test]
    fn test_find_one_takes_first_match() {
        let store = JsonStore::from_books(vec![
            Book::new("dup", "First", "A"),
            Book::new("dup", "Second", "B"),
        ]);
        let found = store
            .find_one(&Predicate::by_identifier("dup"))
            .unwrap()
            .unwrap();
        assert_eq!(found.title, "First");
    }
}
