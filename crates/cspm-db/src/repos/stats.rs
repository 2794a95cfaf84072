//! Aggregate counts over the local database.

use serde::Serialize;

use crate::CspmDb;
use crate::error::DatabaseError;

/// Totals across requirements, controls and evaluated resources.
///
/// Resources are counted once however many controls evaluated them; the
/// per-status counts are over control/resource relations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceStats {
    pub total_requirements: i64,
    pub failed_requirements: i64,
    pub passed_requirements: i64,
    pub total_controls: i64,
    pub failed_controls: i64,
    pub passed_controls: i64,
    pub total_resources: i64,
    pub failed_relations: i64,
    pub passed_relations: i64,
    pub accepted_relations: i64,
}

impl CspmDb {
    /// Compute [`ComplianceStats`] from the current database contents.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn compliance_stats(&self) -> Result<ComplianceStats, DatabaseError> {
        let mut stats = ComplianceStats::default();

        let mut rows = self
            .conn()
            .query(
                "SELECT COUNT(*),
                        COALESCE(SUM(CASE WHEN pass = 0 THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN pass != 0 THEN 1 ELSE 0 END), 0)
                 FROM compliance_requirements",
                (),
            )
            .await?;
        if let Some(row) = rows.next().await? {
            stats.total_requirements = row.get::<i64>(0)?;
            stats.failed_requirements = row.get::<i64>(1)?;
            stats.passed_requirements = row.get::<i64>(2)?;
        }

        let mut rows = self
            .conn()
            .query(
                "SELECT COUNT(*),
                        COALESCE(SUM(CASE WHEN pass = 0 THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN pass != 0 THEN 1 ELSE 0 END), 0)
                 FROM controls",
                (),
            )
            .await?;
        if let Some(row) = rows.next().await? {
            stats.total_controls = row.get::<i64>(0)?;
            stats.failed_controls = row.get::<i64>(1)?;
            stats.passed_controls = row.get::<i64>(2)?;
        }

        let mut rows = self
            .conn()
            .query(
                "SELECT COUNT(DISTINCT resource_hash),
                        COALESCE(SUM(CASE WHEN acceptance_status = 'failed' THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN acceptance_status = 'passed' THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN acceptance_status = 'accepted' THEN 1 ELSE 0 END), 0)
                 FROM control_resource_relations",
                (),
            )
            .await?;
        if let Some(row) = rows.next().await? {
            stats.total_resources = row.get::<i64>(0)?;
            stats.failed_relations = row.get::<i64>(1)?;
            stats.passed_relations = row.get::<i64>(2)?;
            stats.accepted_relations = row.get::<i64>(3)?;
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn empty_database_is_all_zero() {
        let db = CspmDb::open_local(":memory:").await.unwrap();
        assert_eq!(db.compliance_stats().await.unwrap(), ComplianceStats::default());
    }
}
