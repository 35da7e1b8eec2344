//! SQLite-based record store using `SeaORM`.
//!
//! `SqliteStore` implements `RecordStore` against two tables, `zones` and `records`,
//! with records removed together with their zone.

pub(crate) mod entity;
mod migration;
mod record_store;

use std::path::Path;

use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use zonesync_core::error::{CoreError, CoreResult};

use migration::Migrator;

/// `SQLite` implementation of `RecordStore`.
pub struct SqliteStore {
    /// Shared `SeaORM` database connection.
    pub(crate) db: DatabaseConnection,
}

impl SqliteStore {
    /// Open (or create) the database file at `db_path` and bring the schema up to date.
    ///
    /// # Errors
    /// Returns `CoreError::StorageError` if directory creation, database
    /// connection, or schema migration fails.
    pub async fn new(db_path: &Path) -> CoreResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::StorageError(format!("Failed to create directory: {e}")))?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let db = Database::connect(&db_url)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to connect to SQLite: {e}")))?;

        let store = Self { db };
        store.install().await?;
        Ok(store)
    }

    /// Wrap an existing connection. The schema is left untouched; call
    /// [`install`](Self::install) if it may be missing.
    #[must_use]
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create the `zones` and `records` tables if they do not exist.
    ///
    /// # Errors
    /// Returns `CoreError::StorageError` if a migration fails.
    pub async fn install(&self) -> CoreResult<()> {
        Migrator::up(&self.db, None)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to run migrations: {e}")))
    }

    /// Drop both tables and every row in them.
    ///
    /// # Errors
    /// Returns `CoreError::StorageError` if a migration fails.
    pub async fn uninstall(&self) -> CoreResult<()> {
        Migrator::down(&self.db, None)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to revert migrations: {e}")))
    }
}
