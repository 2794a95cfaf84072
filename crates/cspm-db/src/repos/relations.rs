//! Control-to-resource evaluation results.

use chrono::{DateTime, Utc};
use cspm_core::AcceptanceStatus;
use cspm_core::entities::CloudResource;
use serde::Serialize;
use tracing::debug;

use super::resources::upsert_cloud_resource;
use crate::CspmDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, non_empty, parse_datetime, parse_enum};

/// How one resource fared against one control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlResourceRelation {
    pub control_id: String,
    pub resource_hash: String,
    pub passed: bool,
    pub acceptance_status: AcceptanceStatus,
    pub acceptance_justification: Option<String>,
    pub updated_at: DateTime<Utc>,
}

fn row_to_relation(row: &libsql::Row) -> Result<ControlResourceRelation, DatabaseError> {
    Ok(ControlResourceRelation {
        control_id: row.get::<String>(0)?,
        resource_hash: row.get::<String>(1)?,
        passed: row.get::<i64>(2)? != 0,
        acceptance_status: parse_enum(&row.get::<String>(3)?)?,
        acceptance_justification: get_opt_string(row, 4)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl CspmDb {
    /// Upsert the resources evaluated by `control_id` and one relation row
    /// per resource, keyed by `(control_id, resource_hash)`.
    ///
    /// The stored status is derived from each resource's pass flag and
    /// acceptance override.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any row fails; nothing from this call is kept.
    pub async fn save_control_resource_relations(
        &self,
        control_id: &str,
        resources: &[CloudResource],
    ) -> Result<(), DatabaseError> {
        self.write_tx("control_resource_relations", async |conn| {
            for r in resources {
                upsert_cloud_resource(conn, r).await?;
                conn.execute(
                    "INSERT INTO control_resource_relations (
                        control_id, resource_hash, passed, acceptance_status, acceptance_justification)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(control_id, resource_hash) DO UPDATE SET
                       passed = excluded.passed,
                       acceptance_status = excluded.acceptance_status,
                       acceptance_justification = excluded.acceptance_justification,
                       updated_at = datetime('now')",
                    libsql::params![
                        control_id,
                        r.hash.as_str(),
                        i64::from(r.passed),
                        r.acceptance_status().as_str(),
                        non_empty(r.acceptance_justification())
                    ],
                )
                .await
                .map_err(|e| {
                    DatabaseError::Query(format!("relation {control_id}/{}: {e}", r.hash))
                })?;
            }
            Ok(())
        })
        .await?;
        debug!(control_id, count = resources.len(), "saved control resources");
        Ok(())
    }

    /// Relations stored for a control, ordered by resource hash.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is malformed.
    pub async fn relations_for_control(
        &self,
        control_id: &str,
    ) -> Result<Vec<ControlResourceRelation>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT control_id, resource_hash, passed, acceptance_status,
                        acceptance_justification, updated_at
                 FROM control_resource_relations
                 WHERE control_id = ?1
                 ORDER BY resource_hash",
                [control_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_relation(&row)?);
        }
        Ok(results)
    }
}
