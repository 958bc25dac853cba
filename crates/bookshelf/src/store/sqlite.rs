use super::{is_valid_collection_name, BookStore, StoreError};
use bookshelf_core::book::{Book, Field};
use bookshelf_core::filter::{Predicate, TitleFilter};
use bookshelf_core::pagination::PageWindow;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::{FromSqlError, Value as SqlValue};
use rusqlite::{params_from_iter, Connection, OpenFlags};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Connection settings for [`SqliteStore`]
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    /// Number of read-only connections shared across requests
    pub pool_size: usize,
    /// How long a query waits on a locked database before failing
    pub busy_timeout: Duration,
}

impl Default for SqliteOptions {
    fn default() -> Self {
        Self {
            pool_size: 4,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// DDL for a collection table
///
/// The ingestion process owns the data; this is the layout it must write.
/// `attributes` holds a JSON object with every other display field.
pub fn schema_sql(collection: &str) -> Result<String, StoreError> {
    if !is_valid_collection_name(collection) {
        return Err(StoreError::InvalidCollection(collection.to_string()));
    }
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS \"{collection}\" (\n    \
         upc TEXT PRIMARY KEY,\n    \
         title TEXT NOT NULL,\n    \
         category TEXT NOT NULL,\n    \
         attributes TEXT NOT NULL DEFAULT '{{}}'\n);\n\
         CREATE INDEX IF NOT EXISTS \"{collection}_category\" ON \"{collection}\" (category);\n"
    ))
}

/// A collection stored as a table in a SQLite database file
///
/// Connections are opened read-only and handed out round-robin. Natural
/// order is `rowid`, i.e. insertion order.
pub struct SqliteStore {
    pool: Vec<Mutex<Connection>>,
    next: AtomicUsize,
    table: String,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("table", &self.table)
            .field("pool_size", &self.pool.len())
            .finish()
    }
}

impl SqliteStore {
    pub fn open(path: &Path, collection: &str, options: &SqliteOptions) -> Result<Self, StoreError> {
        if !is_valid_collection_name(collection) {
            return Err(StoreError::InvalidCollection(collection.to_string()));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let pool_size = options.pool_size.max(1);
        let mut pool = Vec::with_capacity(pool_size);

        for _ in 0..pool_size {
            let conn = Connection::open_with_flags(path, flags).map_err(|e| {
                StoreError::Unavailable(format!("cannot open {}: {}", path.display(), e))
            })?;
            conn.busy_timeout(options.busy_timeout)?;
            register_title_contains(&conn)?;
            pool.push(Mutex::new(conn));
        }

        let store = Self {
            pool,
            next: AtomicUsize::new(0),
            table: format!("\"{collection}\""),
        };

        let exists: i64 = store.with_conn(|conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [collection],
                |row| row.get(0),
            )
        })?;
        if exists == 0 {
            return Err(StoreError::MissingCollection(format!(
                "{} in {}",
                collection,
                path.display()
            )));
        }

        tracing::debug!(
            "Opened SQLite collection {} at {} with {} connection(s)",
            collection,
            path.display(),
            pool_size
        );

        Ok(store)
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, StoreError> {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.pool.len();
        let conn = self.pool[idx]
            .lock()
            .map_err(|_| StoreError::Unavailable("connection pool poisoned".to_string()))?;
        Ok(f(&*conn)?)
    }
}

/// Registers `title_contains(title, needle)` on a connection
///
/// Evaluates the core title matcher, so case folding is Unicode-aware. The
/// compiled matcher is cached per statement for the needle argument.
fn register_title_contains(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "title_contains",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let filter = ctx.get_or_create_aux(1, |needle| -> Result<TitleFilter, FromSqlError> {
                Ok(TitleFilter::new(needle.as_str()?))
            })?;
            let title: String = ctx.get(0)?;
            Ok(filter.is_match(&title))
        },
    )
}

/// WHERE clause and positional parameters for a predicate
fn where_clause(predicate: &Predicate) -> (String, Vec<SqlValue>) {
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    if let Some(title) = &predicate.title {
        params.push(SqlValue::Text(title.text().to_string()));
        clauses.push(format!("title_contains(title, ?{})", params.len()));
    }

    for (field, value) in predicate.equalities() {
        params.push(SqlValue::Text(value.to_string()));
        clauses.push(format!("{} = ?{}", field.name(), params.len()));
    }

    if clauses.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), params)
    }
}

fn to_sql_int(value: u64) -> SqlValue {
    SqlValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
}

type BookRow = (String, String, String, String);

fn decode_row((upc, title, category, attributes): BookRow) -> Result<Book, StoreError> {
    let attributes: Map<String, Value> =
        serde_json::from_str(&attributes).map_err(|source| StoreError::Decode {
            context: format!("upc={upc}"),
            source,
        })?;
    Ok(Book {
        upc,
        title,
        category,
        attributes,
    })
}

impl BookStore for SqliteStore {
    fn count(&self, predicate: &Predicate) -> Result<u64, StoreError> {
        let (clause, params) = where_clause(predicate);
        let sql = format!("SELECT COUNT(*) FROM {}{}", self.table, clause);

        let count: i64 = self.with_conn(|conn| {
            conn.query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))
        })?;
        Ok(count.max(0) as u64)
    }

    fn find(&self, predicate: &Predicate, window: PageWindow) -> Result<Vec<Book>, StoreError> {
        let (clause, mut params) = where_clause(predicate);
        params.push(to_sql_int(window.limit));
        let limit_idx = params.len();
        params.push(to_sql_int(window.offset));
        let offset_idx = params.len();

        let sql = format!(
            "SELECT upc, title, category, attributes FROM {}{} ORDER BY rowid LIMIT ?{} OFFSET ?{}",
            self.table, clause, limit_idx, offset_idx
        );

        let rows: Vec<BookRow> = self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?;
            rows.collect()
        })?;

        rows.into_iter().map(decode_row).collect()
    }

    fn distinct(&self, field: Field) -> Result<Vec<String>, StoreError> {
        let sql = format!(
            "SELECT DISTINCT {col} FROM {} ORDER BY {col}",
            self.table,
            col = field.name()
        );

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            rows.collect()
        })
    }
}
