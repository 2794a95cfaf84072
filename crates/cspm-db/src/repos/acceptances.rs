//! Risk acceptances.

use cspm_core::entities::RiskAcceptance;
use tracing::debug;

use crate::CspmDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, non_empty};

fn row_to_acceptance(row: &libsql::Row) -> Result<RiskAcceptance, DatabaseError> {
    Ok(RiskAcceptance {
        id: row.get::<String>(0)?,
        tenant_id: row.get::<String>(1)?,
        control_id: row.get::<String>(2)?,
        description: get_opt_string(row, 3)?,
        reason: get_opt_string(row, 4)?,
        acceptance_date: get_opt_string(row, 5)?,
        username: get_opt_string(row, 6)?,
        user_display_name: get_opt_string(row, 7)?,
        filter: get_opt_string(row, 8)?,
        zone_id: get_opt_string(row, 9)?,
        accept_period: get_opt_string(row, 10)?,
        expires_at: get_opt_string(row, 11)?,
        is_expired: row.get::<i64>(12)? != 0,
        is_system: row.get::<i64>(13)? != 0,
        acceptance_type: row.get::<Option<i64>>(14)?,
        source_id: get_opt_string(row, 15)?,
    })
}

impl CspmDb {
    /// Upsert risk acceptances keyed by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any row fails; nothing from this call is kept.
    pub async fn save_risk_acceptances(
        &self,
        acceptances: &[RiskAcceptance],
    ) -> Result<(), DatabaseError> {
        self.write_tx("risk_acceptances", async |conn| {
            for a in acceptances {
                conn.execute(
                    "INSERT INTO risk_acceptances (
                        id, tenant_id, control_id, description, reason, acceptance_date,
                        username, user_display_name, filter, zone_id, accept_period,
                        expires_at, is_expired, is_system, type, source_id)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
                     ON CONFLICT(id) DO UPDATE SET
                       tenant_id = excluded.tenant_id,
                       control_id = excluded.control_id,
                       description = excluded.description,
                       reason = excluded.reason,
                       acceptance_date = excluded.acceptance_date,
                       username = excluded.username,
                       user_display_name = excluded.user_display_name,
                       filter = excluded.filter,
                       zone_id = excluded.zone_id,
                       accept_period = excluded.accept_period,
                       expires_at = excluded.expires_at,
                       is_expired = excluded.is_expired,
                       is_system = excluded.is_system,
                       type = excluded.type,
                       source_id = excluded.source_id,
                       updated_at = datetime('now')",
                    libsql::params![
                        a.id.as_str(),
                        a.tenant_id.as_str(),
                        a.control_id.as_str(),
                        non_empty(a.description.as_deref()),
                        non_empty(a.reason.as_deref()),
                        non_empty(a.acceptance_date.as_deref()),
                        non_empty(a.username.as_deref()),
                        non_empty(a.user_display_name.as_deref()),
                        non_empty(a.filter.as_deref()),
                        non_empty(a.zone_id.as_deref()),
                        non_empty(a.accept_period.as_deref()),
                        non_empty(a.expires_at.as_deref()),
                        i64::from(a.is_expired),
                        i64::from(a.is_system),
                        a.acceptance_type,
                        non_empty(a.source_id.as_deref())
                    ],
                )
                .await
                .map_err(|e| DatabaseError::Query(format!("risk acceptance {}: {e}", a.id)))?;
            }
            Ok(())
        })
        .await?;
        debug!(count = acceptances.len(), "saved risk acceptances");
        Ok(())
    }

    /// Stored acceptances, newest first, optionally for one control.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_risk_acceptances(
        &self,
        control_id: Option<&str>,
    ) -> Result<Vec<RiskAcceptance>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, tenant_id, control_id, description, reason, acceptance_date,
                        username, user_display_name, filter, zone_id, accept_period,
                        expires_at, is_expired, is_system, type, source_id
                 FROM risk_acceptances
                 WHERE (?1 = '' OR control_id = ?1)
                 ORDER BY acceptance_date DESC, id",
                [control_id.unwrap_or_default()],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_acceptance(&row)?);
        }
        Ok(results)
    }

    /// Remove a stored acceptance. Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the statement fails.
    pub async fn delete_risk_acceptance(&self, id: &str) -> Result<bool, DatabaseError> {
        let affected = self
            .conn()
            .execute("DELETE FROM risk_acceptances WHERE id = ?1", [id])
            .await?;
        Ok(affected > 0)
    }
}
