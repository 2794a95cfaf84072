//! Inventory resources.

use cspm_core::entities::InventoryResource;
use tracing::debug;

use crate::CspmDb;
use crate::error::DatabaseError;
use crate::helpers::{get_json_or_default, get_string_or_empty, non_empty, to_json};

fn row_to_inventory(row: &libsql::Row) -> Result<InventoryResource, DatabaseError> {
    Ok(InventoryResource {
        hash: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        resource_type: row.get::<String>(2)?,
        platform: row.get::<String>(3)?,
        category: get_string_or_empty(row, 4)?,
        metadata: get_json_or_default(row, 5)?,
        labels: get_json_or_default(row, 6)?,
        zones: get_json_or_default(row, 7)?,
        posture_control_summary: get_json_or_default(row, 8)?,
        posture_policy_summary: get_json_or_default(row, 9)?,
        config_api_endpoint: get_string_or_empty(row, 10)?,
        resource_origin: get_string_or_empty(row, 11)?,
        last_seen: row.get::<Option<i64>>(12)?.map(|n| n.to_string()),
    })
}

impl CspmDb {
    /// Upsert inventory resources keyed by hash.
    ///
    /// Provider identifiers (account, project, subscription, namespace, ...)
    /// are extracted from each resource's metadata into their own columns;
    /// the full metadata is kept as JSON.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any row fails; nothing from this call is kept.
    pub async fn save_inventory_resources(
        &self,
        resources: &[InventoryResource],
    ) -> Result<(), DatabaseError> {
        self.write_tx("inventory_resources", async |conn| {
            for r in resources {
                let ids = r.platform_identifiers();
                conn.execute(
                    "INSERT INTO inventory_resources (
                        hash, name, type, platform, category, organization, region,
                        aws_account, aws_arn, gcp_project, gcp_resource_id,
                        azure_subscription, azure_resource_id, k8s_namespace, k8s_cluster,
                        metadata_json, labels_json, zones_json,
                        posture_control_summary_json, posture_policy_summary_json,
                        config_api_endpoint, resource_origin, last_seen)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                             ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23)
                     ON CONFLICT(hash) DO UPDATE SET
                       name = excluded.name,
                       type = excluded.type,
                       platform = excluded.platform,
                       category = excluded.category,
                       organization = excluded.organization,
                       region = excluded.region,
                       aws_account = excluded.aws_account,
                       aws_arn = excluded.aws_arn,
                       gcp_project = excluded.gcp_project,
                       gcp_resource_id = excluded.gcp_resource_id,
                       azure_subscription = excluded.azure_subscription,
                       azure_resource_id = excluded.azure_resource_id,
                       k8s_namespace = excluded.k8s_namespace,
                       k8s_cluster = excluded.k8s_cluster,
                       metadata_json = excluded.metadata_json,
                       labels_json = excluded.labels_json,
                       zones_json = excluded.zones_json,
                       posture_control_summary_json = excluded.posture_control_summary_json,
                       posture_policy_summary_json = excluded.posture_policy_summary_json,
                       config_api_endpoint = excluded.config_api_endpoint,
                       resource_origin = excluded.resource_origin,
                       last_seen = excluded.last_seen,
                       updated_at = datetime('now')",
                    libsql::params![
                        r.hash.as_str(),
                        r.name.as_str(),
                        r.resource_type.as_str(),
                        r.platform.as_str(),
                        non_empty(Some(r.category.as_str())),
                        ids.organization,
                        ids.region,
                        ids.aws_account,
                        ids.aws_arn,
                        ids.gcp_project,
                        ids.gcp_resource_id,
                        ids.azure_subscription,
                        ids.azure_resource_id,
                        ids.k8s_namespace,
                        ids.k8s_cluster,
                        to_json(&r.metadata)?,
                        to_json(&r.labels)?,
                        to_json(&r.zones)?,
                        to_json(&r.posture_control_summary)?,
                        to_json(&r.posture_policy_summary)?,
                        non_empty(Some(r.config_api_endpoint.as_str())),
                        non_empty(Some(r.resource_origin.as_str())),
                        r.last_seen_epoch()
                    ],
                )
                .await
                .map_err(|e| DatabaseError::Query(format!("inventory resource {}: {e}", r.hash)))?;
            }
            Ok(())
        })
        .await?;
        debug!(count = resources.len(), "saved inventory resources");
        Ok(())
    }

    /// Stored inventory for one platform (exact match), ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a JSON column is corrupt.
    pub async fn inventory_by_platform(
        &self,
        platform: &str,
        limit: Option<u32>,
    ) -> Result<Vec<InventoryResource>, DatabaseError> {
        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.map_or(-1, i64::from);
        let mut rows = self
            .conn()
            .query(
                "SELECT hash, name, type, platform, category, metadata_json, labels_json,
                        zones_json, posture_control_summary_json, posture_policy_summary_json,
                        config_api_endpoint, resource_origin, last_seen
                 FROM inventory_resources
                 WHERE platform = ?1
                 ORDER BY name, hash
                 LIMIT ?2",
                libsql::params![platform, limit],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_inventory(&row)?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn inventory(hash: &str, name: &str, platform: &str, metadata: serde_json::Value) -> InventoryResource {
        InventoryResource {
            hash: hash.into(),
            name: name.into(),
            resource_type: "Bucket".into(),
            platform: platform.into(),
            metadata: metadata.as_object().cloned().unwrap_or_default(),
            labels: vec!["team:core".into()],
            last_seen: Some("1733011200".into()),
            ..InventoryResource::default()
        }
    }

    async fn column(db: &CspmDb, col: &str, hash: &str) -> Option<String> {
        let mut rows = db
            .conn()
            .query(
                &format!("SELECT {col} FROM inventory_resources WHERE hash = ?1"),
                [hash],
            )
            .await
            .unwrap();
        rows.next()
            .await
            .unwrap()
            .unwrap()
            .get::<Option<String>>(0)
            .unwrap()
    }

    #[tokio::test]
    async fn extracts_identifiers_into_columns() {
        let db = CspmDb::open_local(":memory:").await.unwrap();
        db.save_inventory_resources(&[
            inventory("a", "bucket", "AWS", json!({"account": "123", "arn": "arn:x", "region": "us-east-1"})),
            inventory("g", "vm", "GCP", json!({"project": "proj-1", "location": "europe-west1"})),
        ])
        .await
        .unwrap();

        assert_eq!(column(&db, "aws_account", "a").await.as_deref(), Some("123"));
        assert_eq!(column(&db, "region", "a").await.as_deref(), Some("us-east-1"));
        assert_eq!(column(&db, "gcp_project", "a").await, None);
        assert_eq!(column(&db, "gcp_project", "g").await.as_deref(), Some("proj-1"));
        assert_eq!(column(&db, "region", "g").await.as_deref(), Some("europe-west1"));
    }

    #[tokio::test]
    async fn lists_by_platform_with_limit() {
        let db = CspmDb::open_local(":memory:").await.unwrap();
        db.save_inventory_resources(&[
            inventory("1", "zeta", "AWS", json!({})),
            inventory("2", "alpha", "AWS", json!({"account": "123"})),
            inventory("3", "other", "GCP", json!({})),
        ])
        .await
        .unwrap();

        let all = db.inventory_by_platform("AWS", None).await.unwrap();
        let names: Vec<_> = all.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(all[0].metadata.get("account"), Some(&json!("123")));
        assert_eq!(all[0].labels, vec!["team:core".to_string()]);
        assert_eq!(all[0].last_seen_epoch(), Some(1_733_011_200));

        let limited = db.inventory_by_platform("AWS", Some(1)).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert!(db.inventory_by_platform("aws", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upsert_by_hash() {
        let db = CspmDb::open_local(":memory:").await.unwrap();
        db.save_inventory_resources(&[inventory("1", "old", "AWS", json!({}))])
            .await
            .unwrap();
        db.save_inventory_resources(&[inventory("1", "new", "AWS", json!({}))])
            .await
            .unwrap();
        let all = db.inventory_by_platform("AWS", None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "new");
    }
}
