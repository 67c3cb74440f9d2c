//! Service layer wrapping `DepsDb` with transaction handling.
//!
//! All repo methods are implemented as `impl DepsStore` in `repos/`.

use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};

use crate::DepsDb;
use crate::error::DatabaseError;

/// Project and dependency store over one shared libSQL connection.
///
/// SQLite allows one open transaction per connection, so every operation
/// holds `gate` while it talks to the database. Concurrent reconciliations of
/// the same project are not otherwise coordinated; the UNIQUE constraints
/// are what keep the stored data consistent.
pub struct DepsStore {
    db: DepsDb,
    gate: Mutex<()>,
}

impl DepsStore {
    /// Open (or create) a local database and wrap it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str, busy_timeout: Duration) -> Result<Self, DatabaseError> {
        let db = DepsDb::open_local(path, busy_timeout).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `DepsDb`.
    #[must_use]
    pub fn from_db(db: DepsDb) -> Self {
        Self {
            db,
            gate: Mutex::new(()),
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &DepsDb {
        &self.db
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }

    /// Begin a transaction on the shared connection. Hold the gate first.
    pub(crate) async fn begin(
        &self,
        context: &'static str,
    ) -> Result<libsql::Transaction, DatabaseError> {
        self.db
            .conn()
            .transaction()
            .await
            .map_err(DatabaseError::query(context))
    }
}

/// Commit `tx` if `result` is `Ok`, roll it back otherwise.
///
/// A transaction dropped before reaching here (cancelled future) is rolled
/// back by libSQL.
pub(crate) async fn finish<T>(
    tx: libsql::Transaction,
    result: Result<T, DatabaseError>,
) -> Result<T, DatabaseError> {
    match result {
        Ok(value) => {
            tx.commit().await.map_err(DatabaseError::query("commit"))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(error = %rollback, "rollback failed");
            }
            Err(err)
        }
    }
}
