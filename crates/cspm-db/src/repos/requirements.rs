//! Compliance requirements and controls.

use cspm_core::classify;
use cspm_core::entities::{ComplianceRequirement, ComplianceRequirementWithControls, Control};
use tracing::debug;

use crate::CspmDb;
use crate::error::DatabaseError;
use crate::helpers::{get_string_or_empty, non_empty};

const REQUIREMENT_COLUMNS: &str = "requirement_id, name, policy_id, policy_name, policy_type, platform,
       severity, pass, zone_id, zone_name, failed_controls,
       high_severity_count, medium_severity_count, low_severity_count,
       accepted_count, passing_count, description, resource_api_endpoint";

const CONTROL_COLUMNS: &str = "control_id, name, description, severity, pass,
       objects_count, passing_count, accepted_count, resource_kind,
       resource_api_endpoint, target, platform";

fn row_to_requirement(row: &libsql::Row) -> Result<ComplianceRequirement, DatabaseError> {
    Ok(ComplianceRequirement {
        requirement_id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        policy_id: row.get::<String>(2)?,
        policy_name: row.get::<String>(3)?,
        policy_type: get_string_or_empty(row, 4)?,
        platform: get_string_or_empty(row, 5)?,
        severity: row.get::<String>(6)?,
        pass: row.get::<i64>(7)? != 0,
        zone_id: row.get::<String>(8)?,
        zone_name: get_string_or_empty(row, 9)?,
        failed_controls: row.get::<i64>(10)?,
        high_severity_count: row.get::<i64>(11)?,
        medium_severity_count: row.get::<i64>(12)?,
        low_severity_count: row.get::<i64>(13)?,
        accepted_count: row.get::<i64>(14)?,
        passing_count: row.get::<i64>(15)?,
        description: get_string_or_empty(row, 16)?,
        resource_api_endpoint: get_string_or_empty(row, 17)?,
    })
}

fn row_to_control(row: &libsql::Row) -> Result<Control, DatabaseError> {
    Ok(Control {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        description: get_string_or_empty(row, 2)?,
        severity: row.get::<String>(3)?,
        pass: row.get::<i64>(4)? != 0,
        objects_count: row.get::<i64>(5)?,
        passing_count: row.get::<i64>(6)?,
        accepted_count: row.get::<i64>(7)?,
        resource_kind: get_string_or_empty(row, 8)?,
        resource_api_endpoint: row.get::<String>(9)?,
        target: get_string_or_empty(row, 10)?,
        platform: get_string_or_empty(row, 11)?,
        ..Control::default()
    })
}

/// Upsert one requirement. Policy type and platform are always classified
/// from the policy name; values sent by the API are ignored.
async fn upsert_requirement(
    conn: &libsql::Connection,
    req: &ComplianceRequirement,
) -> Result<(), DatabaseError> {
    let policy_type = classify::policy_type(&req.policy_name);
    let platform = classify::platform(&req.policy_name);

    conn.execute(
        "INSERT INTO compliance_requirements (
            requirement_id, name, policy_id, policy_name, policy_type, platform,
            severity, pass, zone_id, zone_name, failed_controls,
            high_severity_count, medium_severity_count, low_severity_count,
            accepted_count, passing_count, description, resource_api_endpoint)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
         ON CONFLICT(requirement_id, policy_id, zone_id) DO UPDATE SET
           name = excluded.name,
           policy_name = excluded.policy_name,
           policy_type = excluded.policy_type,
           platform = excluded.platform,
           severity = excluded.severity,
           pass = excluded.pass,
           zone_name = excluded.zone_name,
           failed_controls = excluded.failed_controls,
           high_severity_count = excluded.high_severity_count,
           medium_severity_count = excluded.medium_severity_count,
           low_severity_count = excluded.low_severity_count,
           accepted_count = excluded.accepted_count,
           passing_count = excluded.passing_count,
           description = excluded.description,
           resource_api_endpoint = excluded.resource_api_endpoint,
           updated_at = datetime('now')",
        libsql::params![
            req.requirement_id.as_str(),
            req.name.as_str(),
            req.policy_id.as_str(),
            req.policy_name.as_str(),
            policy_type,
            platform,
            req.severity.as_str(),
            i64::from(req.pass),
            req.zone_id.as_str(),
            non_empty(Some(req.zone_name.as_str())),
            req.failed_controls,
            req.high_severity_count,
            req.medium_severity_count,
            req.low_severity_count,
            req.accepted_count,
            req.passing_count,
            non_empty(Some(req.description.as_str())),
            non_empty(Some(req.resource_api_endpoint.as_str()))
        ],
    )
    .await
    .map_err(|e| DatabaseError::Query(format!("requirement {}: {e}", req.requirement_id)))?;
    Ok(())
}

async fn upsert_control(
    conn: &libsql::Connection,
    requirement_id: &str,
    ctrl: &Control,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO controls (
            control_id, name, description, requirement_id, severity, pass,
            objects_count, passing_count, accepted_count, resource_kind,
            resource_api_endpoint, target, platform)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
         ON CONFLICT(control_id) DO UPDATE SET
           name = excluded.name,
           description = excluded.description,
           requirement_id = excluded.requirement_id,
           severity = excluded.severity,
           pass = excluded.pass,
           objects_count = excluded.objects_count,
           passing_count = excluded.passing_count,
           accepted_count = excluded.accepted_count,
           resource_kind = excluded.resource_kind,
           resource_api_endpoint = excluded.resource_api_endpoint,
           target = excluded.target,
           platform = excluded.platform,
           updated_at = datetime('now')",
        libsql::params![
            ctrl.id.as_str(),
            ctrl.name.as_str(),
            non_empty(Some(ctrl.description.as_str())),
            requirement_id,
            ctrl.severity.as_str(),
            i64::from(ctrl.pass),
            ctrl.objects_count,
            ctrl.passing_count,
            ctrl.accepted_count,
            non_empty(Some(ctrl.resource_kind.as_str())),
            ctrl.resource_api_endpoint.as_str(),
            non_empty(Some(ctrl.target.as_str())),
            non_empty(Some(ctrl.platform.as_str()))
        ],
    )
    .await
    .map_err(|e| DatabaseError::Query(format!("control {}: {e}", ctrl.id)))?;
    Ok(())
}

impl CspmDb {
    /// Upsert flat requirements keyed by `(requirement_id, policy_id, zone_id)`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any row fails; nothing from this call is kept.
    pub async fn save_compliance_requirements(
        &self,
        requirements: &[ComplianceRequirement],
    ) -> Result<(), DatabaseError> {
        self.write_tx("compliance_requirements", async |conn| {
            for req in requirements {
                upsert_requirement(conn, req).await?;
            }
            Ok(())
        })
        .await?;
        debug!(count = requirements.len(), "saved compliance requirements");
        Ok(())
    }

    /// Upsert requirements and every control they carry.
    ///
    /// Policy type and platform are classified from the policy name; controls
    /// are keyed by their globally unique id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any row fails; nothing from this call is kept.
    pub async fn save_requirements_with_controls(
        &self,
        requirements: &[ComplianceRequirementWithControls],
    ) -> Result<(), DatabaseError> {
        let mut controls = 0_usize;
        self.write_tx("requirements_with_controls", async |conn| {
            for req in requirements {
                upsert_requirement(conn, &req.to_requirement()).await?;
                for ctrl in &req.controls {
                    upsert_control(conn, &req.requirement_id, ctrl).await?;
                    controls += 1;
                }
            }
            Ok(())
        })
        .await?;
        debug!(
            requirements = requirements.len(),
            controls, "saved requirements with controls"
        );
        Ok(())
    }

    /// Failed requirements, optionally narrowed by policy type and/or
    /// platform (case-insensitive substring match; empty means no filter).
    ///
    /// Ordered by severity (high first), then by failed-control count.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_violations(
        &self,
        policy_type: &str,
        platform: &str,
    ) -> Result<Vec<ComplianceRequirement>, DatabaseError> {
        let sql = format!(
            "SELECT {REQUIREMENT_COLUMNS}
             FROM compliance_requirements
             WHERE pass = 0
               AND (?1 = '' OR policy_type LIKE '%' || ?1 || '%')
               AND (?2 = '' OR platform LIKE '%' || ?2 || '%')
             ORDER BY CASE lower(severity)
                        WHEN 'high' THEN 3
                        WHEN 'medium' THEN 2
                        WHEN 'low' THEN 1
                        ELSE 0
                      END DESC,
                      failed_controls DESC,
                      requirement_id"
        );
        let mut rows = self
            .conn()
            .query(&sql, libsql::params![policy_type, platform])
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_requirement(&row)?);
        }
        Ok(results)
    }

    /// Controls stored for a requirement, ordered by control id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn controls_for_requirement(
        &self,
        requirement_id: &str,
    ) -> Result<Vec<Control>, DatabaseError> {
        let sql = format!(
            "SELECT {CONTROL_COLUMNS} FROM controls WHERE requirement_id = ?1 ORDER BY control_id"
        );
        let mut rows = self.conn().query(&sql, [requirement_id]).await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_control(&row)?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cspm_core::entities::Zone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    async fn test_db() -> CspmDb {
        CspmDb::open_local(":memory:").await.unwrap()
    }

    fn requirement(id: &str, severity: &str, failed: i64, pass: bool) -> ComplianceRequirement {
        ComplianceRequirement {
            requirement_id: id.into(),
            name: format!("Requirement {id}"),
            policy_id: "pol-1".into(),
            policy_name: "CIS Amazon Web Services Foundations Benchmark".into(),
            severity: severity.into(),
            pass,
            zone_id: "z-1".into(),
            zone_name: "Entire Infrastructure".into(),
            failed_controls: failed,
            ..ComplianceRequirement::default()
        }
    }

    async fn count(db: &CspmDb, table: &str) -> i64 {
        let mut rows = db
            .conn()
            .query(&format!("SELECT COUNT(*) FROM {table}"), ())
            .await
            .unwrap();
        rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
    }

    #[tokio::test]
    async fn upsert_keeps_one_row_with_latest_values() {
        let db = test_db().await;
        db.save_compliance_requirements(&[requirement("r1", "High", 2, false)])
            .await
            .unwrap();
        db.save_compliance_requirements(&[requirement("r1", "Low", 7, false)])
            .await
            .unwrap();

        assert_eq!(count(&db, "compliance_requirements").await, 1);
        let rows = db.list_violations("", "").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].severity, "Low");
        assert_eq!(rows[0].failed_controls, 7);
    }

    #[tokio::test]
    async fn same_requirement_in_another_zone_is_a_new_row() {
        let db = test_db().await;
        let mut other = requirement("r1", "High", 1, false);
        other.zone_id = "z-2".into();
        db.save_compliance_requirements(&[requirement("r1", "High", 1, false), other])
            .await
            .unwrap();
        assert_eq!(count(&db, "compliance_requirements").await, 2);
    }

    #[tokio::test]
    async fn classification_fills_missing_policy_type() {
        let db = test_db().await;
        db.save_compliance_requirements(&[requirement("r1", "High", 1, false)])
            .await
            .unwrap();
        let rows = db.list_violations("cis", "aws").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].policy_type, "CIS");
        assert_eq!(rows[0].platform, "AWS");
        assert!(db.list_violations("SOC2", "").await.unwrap().is_empty());
        assert!(db.list_violations("", "GCP").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn classification_overrides_api_values() {
        let db = test_db().await;
        let mut req = requirement("r1", "High", 1, false);
        req.policy_name = "SOC 2 Google Cloud".into();
        req.policy_type = "Custom".into();
        req.platform = "AWS".into();
        db.save_compliance_requirements(&[req]).await.unwrap();

        let rows = db.list_violations("", "").await.unwrap();
        assert_eq!(rows[0].policy_type, "SOC2");
        assert_eq!(rows[0].platform, "GCP");
    }

    #[rstest]
    #[case("", "", 1)]
    #[case("CIS", "", 1)]
    #[case("ci", "Aw", 1)]
    #[case("PCI", "", 0)]
    #[case("", "Multi", 0)]
    #[tokio::test]
    async fn violation_filters_match_substrings(
        #[case] policy_type: &str,
        #[case] platform: &str,
        #[case] expected: usize,
    ) {
        let db = test_db().await;
        db.save_compliance_requirements(&[requirement("r1", "High", 1, false)])
            .await
            .unwrap();
        let rows = db.list_violations(policy_type, platform).await.unwrap();
        assert_eq!(rows.len(), expected);
    }

    #[tokio::test]
    async fn violations_exclude_passing_and_sort_by_severity() {
        let db = test_db().await;
        db.save_compliance_requirements(&[
            requirement("low", "Low", 9, false),
            requirement("high-1", "High", 1, false),
            requirement("high-5", "High", 5, false),
            requirement("medium", "Medium", 3, false),
            requirement("ok", "High", 0, true),
        ])
        .await
        .unwrap();

        let ids: Vec<String> = db
            .list_violations("", "")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.requirement_id)
            .collect();
        assert_eq!(ids, vec!["high-5", "high-1", "medium", "low"]);
    }

    #[tokio::test]
    async fn saves_requirements_with_controls() {
        let db = test_db().await;
        let req = ComplianceRequirementWithControls {
            requirement_id: "r1".into(),
            name: "1.1".into(),
            policy_id: "pol-1".into(),
            policy_name: "CIS Google Cloud Platform Foundation Benchmark".into(),
            severity: "Medium".into(),
            failed_controls: 1,
            zone: Zone {
                id: "z-1".into(),
                name: "Entire Infrastructure".into(),
            },
            controls: vec![
                Control {
                    id: "ctrl-2".into(),
                    name: "second".into(),
                    severity: "Low".into(),
                    pass: true,
                    ..Control::default()
                },
                Control {
                    id: "ctrl-1".into(),
                    name: "first".into(),
                    severity: "High".into(),
                    objects_count: 4,
                    resource_api_endpoint: "/api/cspm/v1/cloud/resources?controlId=1".into(),
                    ..Control::default()
                },
            ],
            ..ComplianceRequirementWithControls::default()
        };
        db.save_requirements_with_controls(std::slice::from_ref(&req))
            .await
            .unwrap();
        // second save is an upsert, not a duplicate
        db.save_requirements_with_controls(&[req]).await.unwrap();

        assert_eq!(count(&db, "compliance_requirements").await, 1);
        assert_eq!(count(&db, "controls").await, 2);

        let violations = db.list_violations("", "gcp").await.unwrap();
        assert_eq!(violations[0].zone_name, "Entire Infrastructure");

        let controls = db.controls_for_requirement("r1").await.unwrap();
        let ids: Vec<_> = controls.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["ctrl-1", "ctrl-2"]);
        assert_eq!(controls[0].objects_count, 4);
        assert!(controls[0].has_endpoint());
        assert!(!controls[1].has_endpoint());
    }

    #[tokio::test]
    async fn failed_row_rolls_back_whole_call() {
        let db = test_db().await;
        db.conn()
            .execute(
                "CREATE TRIGGER reject_bad BEFORE INSERT ON compliance_requirements
                 WHEN NEW.requirement_id = 'bad'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END",
                (),
            )
            .await
            .unwrap();

        let result = db
            .save_compliance_requirements(&[
                requirement("good", "High", 1, false),
                requirement("bad", "High", 1, false),
            ])
            .await;
        assert!(result.is_err());
        assert_eq!(count(&db, "compliance_requirements").await, 0);
    }
}
