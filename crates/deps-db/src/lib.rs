//! # deps-db
//!
//! libSQL persistence for depsmanager.
//!
//! Stores ingested projects and their scored dependencies. [`ProjectStore`]
//! is the seam the ingestion pipeline writes through; [`DepsStore`] implements
//! it on top of a single local libSQL connection.

pub mod error;
mod migrations;
pub mod repos;
pub mod service;
mod store;

#[cfg(test)]
mod test_support;

use std::time::Duration;

use error::DatabaseError;
use libsql::Builder;

pub use service::DepsStore;
pub use store::{ProjectStore, ReconcileOutcome};

/// Raw database handle: the libSQL database and its one connection.
pub struct DepsDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl DepsDb {
    /// Open a local database at `path`, or `":memory:"`.
    ///
    /// Enables foreign keys, applies `busy_timeout`, and runs migrations.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str, busy_timeout: Duration) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Per-connection in SQLite; cascade deletes depend on it.
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        // busy_timeout echoes the new value as a row, so it goes through query.
        conn.query(
            &format!("PRAGMA busy_timeout = {}", busy_timeout.as_millis()),
            (),
        )
        .await
        .map_err(|e| DatabaseError::Migration(format!("PRAGMA busy_timeout: {e}")))?;

        let deps_db = Self { db, conn };
        deps_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(deps_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}
