//! SQLite store bootstrap
//!
//! Opens the pool and creates the two tables if they are missing.
//! The parent directory of the database file must already exist.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use super::StoreError;

/// Default maximum connections for the pool.
/// One connection keeps SQLite write transactions from racing for the lock.
const DEFAULT_MAX_CONNECTIONS: u32 = 1;

/// How long a statement waits on a locked database before failing.
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// ManagedList must be created first; Item references it.
const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS ManagedList (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        counter INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS Item (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        text TEXT NOT NULL,
        checked BOOLEAN NOT NULL,
        managedList INTEGER NOT NULL,
        FOREIGN KEY (managedList) REFERENCES ManagedList(id)
    )
    "#,
];

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database file, created if absent
    pub path: PathBuf,

    /// Maximum pooled connections (default: 1)
    pub max_connections: u32,

    /// Lock wait before a statement fails (default: 5s)
    pub busy_timeout: Duration,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

/// Handle to an opened, schema-ready store. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
    path: PathBuf,
}

impl Store {
    /// Open the store at `path` with default options.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Store::open("data/shopping_list/sqlite.db").await?;
    /// ```
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with(StoreConfig::new(path.as_ref())).await
    }

    /// Open the store with explicit pool options.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the file cannot be opened or the
    /// schema cannot be created.
    pub async fn open_with(config: StoreConfig) -> Result<Self, StoreError> {
        tracing::info!(path = %config.path.display(), "Opening store");

        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await?;

        create_schema(&pool).await?;

        Ok(Self {
            pool,
            path: config.path,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if the database answers a trivial query.
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

async fn create_schema(pool: &SqlitePool) -> Result<(), StoreError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!("Schema ready");
    Ok(())
}
