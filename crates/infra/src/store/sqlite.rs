//! SQLite-backed catalog + ledger.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx error | `ErrorKind` | `StoreError` | Scenario |
//! |------------|-------------|--------------|----------|
//! | Database | `UniqueViolation` | `DuplicateProduct` | `products.name` already present |
//! | Database | `ForeignKeyViolation` | `UnknownProduct` | movement names a product not in `products` |
//! | Database | anything else | `Unavailable` | check constraints, I/O, locking |
//! | any other | n/a | `Unavailable` | pool closed, connection failure, decode failure |
//!
//! ## Concurrency
//!
//! SQLite admits one writer at a time; the pool waits on a busy database for
//! up to [`BUSY_TIMEOUT`]. Product uniqueness and id assignment are enforced
//! by the schema (`UNIQUE`, `AUTOINCREMENT`), so they hold across processes.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, instrument, warn};

use stockbook_catalog::{Product, ProductName};
use stockbook_core::{ProductId, RecordId};
use stockbook_ledger::{Direction, MovementRecord, NewMovement};

use super::r#trait::{InventoryStore, LedgerSnapshot, StoreError};

pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id   INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT    NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS movements (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        direction        TEXT    NOT NULL CHECK (direction IN ('inward', 'outward')),
        sequence_no      INTEGER NULL,
        occurred_at      TEXT    NULL,
        product_name     TEXT    NOT NULL REFERENCES products (name),
        pouch_batch_date TEXT    NULL,
        pouch_count      INTEGER NOT NULL CHECK (pouch_count >= 0),
        weight_grams     REAL    NOT NULL CHECK (weight_grams >= 0),
        remarks          TEXT    NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS movements_by_direction_time
        ON movements (direction, occurred_at DESC, id DESC)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS movements_by_product
        ON movements (product_name)
    "#,
];

/// Tables of the older spreadsheet-era database layout. SQLite table names
/// are case-insensitive, so `products` would silently resolve to `Products`.
const LEGACY_TABLES: &[&str] = &["Products", "InwardTransactions", "DispatchTransactions"];

const MOVEMENT_COLUMNS: &str = "id, direction, sequence_no, occurred_at, product_name, \
                                pouch_batch_date, pouch_count, weight_grams, remarks";

/// SQLite-backed [`InventoryStore`].
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url` and bootstrap the
    /// schema.
    ///
    /// In-memory URLs get a single long-lived connection, since every SQLite
    /// connection to `:memory:` is a separate database.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        let mut options = SqliteConnectOptions::from_str(url)
            .map_err(|e| map_sqlx_error("parse database url", e))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let mut pool_options = SqlitePoolOptions::new();
        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        let store = Self::from_pool(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Private in-memory database (tests/dev).
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:", 1).await
    }

    /// Wrap an existing pool. The caller is responsible for [`Self::migrate`].
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables and indexes if they do not exist. Idempotent.
    ///
    /// Refuses a database that still carries the legacy table layout;
    /// those files have to be brought over with the workbook importer.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        let legacy: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN (?1, ?2, ?3) \
             ORDER BY name",
        )
        .bind(LEGACY_TABLES[0])
        .bind(LEGACY_TABLES[1])
        .bind(LEGACY_TABLES[2])
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("migrate", e))?;
        if !legacy.is_empty() {
            warn!(tables = ?legacy, "database uses the legacy table layout");
            return Err(StoreError::Unavailable(format!(
                "migrate: legacy tables present ({}); point DATABASE_URL at a new file",
                legacy.join(", ")
            )));
        }

        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("migrate", e))?;
        }
        debug!("schema ready");
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for SqliteStore {
    async fn insert_product(&self, name: &ProductName) -> Result<Product, StoreError> {
        let result = sqlx::query("INSERT INTO products (name) VALUES (?1)")
            .bind(name.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| match classify(&e) {
                Some(sqlx::error::ErrorKind::UniqueViolation) => {
                    StoreError::DuplicateProduct(name.to_string())
                }
                _ => map_sqlx_error("insert_product", e),
            })?;

        Ok(Product::new(
            ProductId::new(result.last_insert_rowid()),
            name.clone(),
        ))
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query("SELECT id, name FROM products ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_products", e))?;

        rows.iter().map(product_from_row).collect()
    }

    async fn product_exists(&self, name: &ProductName) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM products WHERE name = ?1)")
            .bind(name.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("product_exists", e))
    }

    async fn append_movement(&self, movement: NewMovement) -> Result<MovementRecord, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO movements
                (direction, sequence_no, occurred_at, product_name,
                 pouch_batch_date, pouch_count, weight_grams, remarks)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(movement.direction.as_str())
        .bind(movement.sequence_no)
        .bind(movement.timestamp.as_deref())
        .bind(movement.product_name.as_str())
        .bind(movement.pouch_batch_date.as_deref())
        .bind(movement.pouch_count)
        .bind(movement.weight_grams)
        .bind(movement.remarks.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| match classify(&e) {
            Some(sqlx::error::ErrorKind::ForeignKeyViolation) => {
                StoreError::UnknownProduct(movement.product_name.to_string())
            }
            _ => map_sqlx_error("append_movement", e),
        })?;

        Ok(movement.into_record(RecordId::new(result.last_insert_rowid())))
    }

    async fn list_movements(&self, direction: Direction) -> Result<Vec<MovementRecord>, StoreError> {
        // COALESCE: a missing timestamp sorts as the empty string.
        let sql = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM movements WHERE direction = ?1 \
             ORDER BY COALESCE(occurred_at, '') DESC, id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(direction.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_movements", e))?;

        rows.iter().map(movement_from_row).collect()
    }

    async fn snapshot(&self) -> Result<LedgerSnapshot, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("snapshot", e))?;

        let product_rows = sqlx::query("SELECT id, name FROM products ORDER BY name ASC")
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("snapshot", e))?;

        let sql = format!("SELECT {MOVEMENT_COLUMNS} FROM movements ORDER BY id ASC");
        let movement_rows = sqlx::query(&sql)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("snapshot", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("snapshot", e))?;

        Ok(LedgerSnapshot {
            products: product_rows
                .iter()
                .map(product_from_row)
                .collect::<Result<_, _>>()?,
            movements: movement_rows
                .iter()
                .map(movement_from_row)
                .collect::<Result<_, _>>()?,
        })
    }
}

fn classify(err: &sqlx::Error) -> Option<sqlx::error::ErrorKind> {
    match err {
        sqlx::Error::Database(db) => Some(db.kind()),
        _ => None,
    }
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(format!("{operation}: {err}"))
}

fn product_from_row(row: &SqliteRow) -> Result<Product, StoreError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| map_sqlx_error("decode product", e))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| map_sqlx_error("decode product", e))?;
    let name = ProductName::parse(&name)
        .map_err(|_| StoreError::Unavailable(format!("decode product: blank name in row {id}")))?;

    Ok(Product::new(ProductId::new(id), name))
}

fn movement_from_row(row: &SqliteRow) -> Result<MovementRecord, StoreError> {
    let decode = |e| map_sqlx_error("decode movement", e);

    let id: i64 = row.try_get("id").map_err(decode)?;
    let direction: String = row.try_get("direction").map_err(decode)?;
    let direction = direction
        .parse::<Direction>()
        .map_err(|e| StoreError::Unavailable(format!("decode movement {id}: {e}")))?;

    Ok(MovementRecord {
        id: RecordId::new(id),
        direction,
        sequence_no: row.try_get("sequence_no").map_err(decode)?,
        timestamp: row.try_get("occurred_at").map_err(decode)?,
        product_name: row.try_get("product_name").map_err(decode)?,
        pouch_batch_date: row.try_get("pouch_batch_date").map_err(decode)?,
        pouch_count: row.try_get("pouch_count").map_err(decode)?,
        weight_grams: row.try_get("weight_grams").map_err(decode)?,
        remarks: row.try_get("remarks").map_err(decode)?,
    })
}
