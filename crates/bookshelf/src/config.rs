use crate::catalog::Catalog;
use crate::prelude::Error;
use crate::store::{is_valid_collection_name, BookStore, JsonStore, SqliteOptions, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Storage backend holding the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    /// `<data-dir>/<database>.db`, one table per collection
    Sqlite,
    /// `<data-dir>/<database>/<collection>.jsonl`, loaded into memory at startup
    Jsonl,
}

/// Where the collection lives and how it is read
///
/// Every setting can come from the environment so that deployments never
/// need storage locations baked into the binary.
#[derive(Debug, Clone, clap::Args)]
pub struct StoreOptions {
    /// Storage backend
    #[clap(long, env = "BOOKSHELF_BACKEND", global = true, value_enum, default_value_t = Backend::Sqlite)]
    pub backend: Backend,

    /// Directory holding the databases
    #[clap(long, env = "BOOKSHELF_DATA_DIR", global = true, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Database name
    #[clap(long, env = "BOOKSHELF_DATABASE", global = true, default_value = "scrapy_data")]
    pub database: String,

    /// Collection holding the books
    #[clap(long, env = "BOOKSHELF_COLLECTION", global = true, default_value = "books")]
    pub collection: String,

    /// Books per page
    #[clap(long, env = "BOOKSHELF_PAGE_SIZE", global = true, default_value = "20")]
    pub page_size: u64,

    /// Milliseconds a query waits on a locked database before failing
    #[clap(long, env = "BOOKSHELF_BUSY_TIMEOUT_MS", global = true, default_value = "5000")]
    pub busy_timeout_ms: u64,

    /// Number of pooled read-only connections
    #[clap(long, env = "BOOKSHELF_POOL_SIZE", global = true, default_value = "4")]
    pub pool_size: usize,
}

impl StoreOptions {
    pub fn validate(&self) -> Result<(), Error> {
        if self.database.trim().is_empty() {
            return Err(Error::Config("database name cannot be empty".to_string()));
        }
        if self.database.contains(['/', '\\', '\0']) || self.database.contains("..") {
            return Err(Error::Config(format!(
                "database name must not contain path components: {}",
                self.database
            )));
        }
        if !is_valid_collection_name(&self.collection) {
            return Err(Error::Config(format!(
                "collection name must be letters, digits and underscores: {}",
                self.collection
            )));
        }
        if self.page_size == 0 {
            return Err(Error::Config("page size must be at least 1".to_string()));
        }
        if self.pool_size == 0 {
            return Err(Error::Config("pool size must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Path of the file backing the configured collection
    pub fn store_path(&self) -> PathBuf {
        match self.backend {
            Backend::Sqlite => self.data_dir.join(format!("{}.db", self.database)),
            Backend::Jsonl => self
                .data_dir
                .join(&self.database)
                .join(format!("{}.jsonl", self.collection)),
        }
    }

    pub fn open_store(&self) -> Result<Arc<dyn BookStore>, Error> {
        self.validate()?;
        let path = self.store_path();

        tracing::info!(
            "Opening {:?} collection {}.{} from {}",
            self.backend,
            self.database,
            self.collection,
            path.display()
        );

        let store: Arc<dyn BookStore> = match self.backend {
            Backend::Sqlite => {
                let options = SqliteOptions {
                    pool_size: self.pool_size,
                    busy_timeout: Duration::from_millis(self.busy_timeout_ms),
                };
                Arc::new(SqliteStore::open(&path, &self.collection, &options)?)
            }
            Backend::Jsonl => Arc::new(JsonStore::load(&path)?),
        };
        Ok(store)
    }

    pub fn open_catalog(&self) -> Result<Catalog, Error> {
        Ok(Catalog::new(self.open_store()?, self.page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{jsonl, scenario_books, write_sqlite};
    use bookshelf_core::filter::FilterCriteria;
    use bookshelf_core::pagination::PageRequest;
    use clap::Parser;
    use tempfile::TempDir;

    #[derive(Debug, clap::Parser)]
    struct Cli {
        #[clap(flatten)]
        store: StoreOptions,
    }

    fn parse(args: &[&str]) -> StoreOptions {
        let mut argv = vec!["bookshelf"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().store
    }

    #[test]
    fn test_explicit_arguments() {
        let options = parse(&[
            "--backend",
            "jsonl",
            "--data-dir",
            "/srv/books",
            "--database",
            "shop",
            "--collection",
            "titles",
            "--page-size",
            "50",
        ]);
        assert_eq!(options.backend, Backend::Jsonl);
        assert_eq!(options.page_size, 50);
        assert_eq!(
            options.store_path(),
            PathBuf::from("/srv/books/shop/titles.jsonl")
        );
    }

    #[test]
    fn test_sqlite_store_path() {
        let options = parse(&["--data-dir", "/srv/books", "--database", "shop", "--backend", "sqlite"]);
        assert_eq!(options.store_path(), PathBuf::from("/srv/books/shop.db"));
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let options = parse(&["--page-size", "0"]);
        assert!(matches!(options.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_names() {
        let options = parse(&["--collection", "books;drop"]);
        assert!(options.validate().is_err());

        let options = parse(&["--database", "../etc/passwd"]);
        assert!(options.validate().is_err());

        let options = parse(&["--database", "  "]);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_pool() {
        let options = parse(&["--pool-size", "0"]);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_open_catalog_sqlite() {
        let dir = TempDir::new().unwrap();
        write_sqlite(&dir.path().join("shop.db"), "titles", &scenario_books());

        let options = parse(&[
            "--backend",
            "sqlite",
            "--data-dir",
            dir.path().to_str().unwrap(),
            "--database",
            "shop",
            "--collection",
            "titles",
            "--page-size",
            "10",
        ]);
        let catalog = options.open_catalog().unwrap();
        let result = catalog
            .list_page(&FilterCriteria::default(), PageRequest::new(1, catalog.page_size()))
            .unwrap();
        assert_eq!(result.items.len(), 10);
        assert_eq!(result.total_pages, 5);
    }

    #[test]
    fn test_open_catalog_jsonl() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("shop")).unwrap();
        std::fs::write(dir.path().join("shop/titles.jsonl"), jsonl(&scenario_books())).unwrap();

        let options = parse(&[
            "--backend",
            "jsonl",
            "--data-dir",
            dir.path().to_str().unwrap(),
            "--database",
            "shop",
            "--collection",
            "titles",
        ]);
        let catalog = options.open_catalog().unwrap();
        assert_eq!(catalog.get_by_identifier("upc0001").unwrap().category, "Poetry");
    }

    #[test]
    fn test_open_store_missing_database() {
        let dir = TempDir::new().unwrap();
        let options = parse(&[
            "--backend",
            "sqlite",
            "--data-dir",
            dir.path().to_str().unwrap(),
        ]);
        assert!(matches!(options.open_store(), Err(Error::Storage(_))));
    }
}
