//! # cspm-db
//!
//! libSQL persistence for collected CSPM data.
//!
//! The database is a disposable local cache of the remote API: every save
//! is an idempotent upsert keyed by the API's natural key, and each save call
//! runs in a single transaction that is rolled back as a whole on any row
//! failure.
//!
//! Uses the `libsql` crate (C `SQLite` fork) in local-only mode.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;

pub use error::DatabaseError;
pub use repos::relations::ControlResourceRelation;
pub use repos::stats::ComplianceStats;

use libsql::Builder;
use tracing::warn;

/// Handle to the local CSPM database.
pub struct CspmDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl CspmDb {
    /// Open (or create) a local database file and apply the schema.
    ///
    /// Pass `":memory:"` for a throwaway database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        // libsql enables enforcement by default; the declared keys are not unique targets
        conn.execute("PRAGMA foreign_keys = OFF", ()).await?;

        let cspm_db = Self { db, conn };
        cspm_db.run_migrations().await?;
        Ok(cspm_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Run `body` inside a transaction: commit on `Ok`, roll back on `Err`.
    pub(crate) async fn write_tx<F>(&self, what: &str, body: F) -> Result<(), DatabaseError>
    where
        F: AsyncFnOnce(&libsql::Connection) -> Result<(), DatabaseError>,
    {
        let tx = self.conn.transaction().await?;
        let conn: &libsql::Connection = &tx;
        match body(conn).await {
            Ok(()) => {
                tx.commit().await?;
                Ok(())
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(what, error = %rollback_err, "rollback failed");
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = CspmDb::open_local(":memory:").await.unwrap();
        let tables = [
            "compliance_requirements",
            "controls",
            "cloud_resources",
            "inventory_resources",
            "control_resource_relations",
            "risk_acceptances",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn foreign_keys_are_not_enforced() {
        let db = CspmDb::open_local(":memory:").await.unwrap();
        let mut rows = db.conn().query("PRAGMA foreign_keys", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 0);

        db.conn()
            .execute(
                "INSERT INTO control_resource_relations (control_id, resource_hash, passed, acceptance_status)
                 VALUES ('ctrl-orphan', 'h-orphan', 0, 'failed')",
                (),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = CspmDb::open_local(":memory:").await.unwrap();
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn reopening_a_file_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cspm.db");
        let path = path.to_str().unwrap();

        {
            let db = CspmDb::open_local(path).await.unwrap();
            db.conn()
                .execute(
                    "INSERT INTO risk_acceptances (id, control_id) VALUES ('ra-1', 'c-1')",
                    (),
                )
                .await
                .unwrap();
        }

        let db = CspmDb::open_local(path).await.unwrap();
        let mut rows = db
            .conn()
            .query("SELECT COUNT(*) FROM risk_acceptances", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }
}
