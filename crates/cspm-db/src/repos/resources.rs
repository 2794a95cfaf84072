//! Resources evaluated by controls.

use cspm_core::entities::CloudResource;
use tracing::debug;

use crate::CspmDb;
use crate::error::DatabaseError;
use crate::helpers::{get_json_or_default, get_opt_string, get_string_or_empty, non_empty, to_json};

pub(crate) async fn upsert_cloud_resource(
    conn: &libsql::Connection,
    r: &CloudResource,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO cloud_resources (
            hash, name, type, platform, account, location, organization,
            os_name, os_image, cluster_name, distribution_name, distribution_version,
            platform_account_id, cloud_resource_id, cloud_region,
            zones_json, label_values_json, agent_tags_json, last_seen_date, global_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
         ON CONFLICT(hash) DO UPDATE SET
           name = excluded.name,
           type = excluded.type,
           platform = excluded.platform,
           account = excluded.account,
           location = excluded.location,
           organization = excluded.organization,
           os_name = excluded.os_name,
           os_image = excluded.os_image,
           cluster_name = excluded.cluster_name,
           distribution_name = excluded.distribution_name,
           distribution_version = excluded.distribution_version,
           platform_account_id = excluded.platform_account_id,
           cloud_resource_id = excluded.cloud_resource_id,
           cloud_region = excluded.cloud_region,
           zones_json = excluded.zones_json,
           label_values_json = excluded.label_values_json,
           agent_tags_json = excluded.agent_tags_json,
           last_seen_date = excluded.last_seen_date,
           global_id = excluded.global_id,
           updated_at = datetime('now')",
        libsql::params![
            r.hash.as_str(),
            r.name.as_str(),
            r.resource_type.as_str(),
            non_empty(r.platform.as_deref()),
            non_empty(r.account.as_deref()),
            non_empty(r.location.as_deref()),
            non_empty(r.organization.as_deref()),
            non_empty(r.os_name.as_deref()),
            non_empty(r.os_image.as_deref()),
            non_empty(r.cluster_name.as_deref()),
            non_empty(r.distribution_name.as_deref()),
            non_empty(r.distribution_version.as_deref()),
            non_empty(r.platform_account_id.as_deref()),
            non_empty(r.cloud_resource_id.as_deref()),
            non_empty(r.cloud_region.as_deref()),
            to_json(&r.zones)?,
            to_json(&r.label_values)?,
            to_json(&r.agent_tags)?,
            non_empty(Some(r.last_seen_date.as_str())),
            non_empty(r.global_id.as_deref())
        ],
    )
    .await
    .map_err(|e| DatabaseError::Query(format!("cloud resource {}: {e}", r.hash)))?;
    Ok(())
}

/// Rebuild a resource from its stored row.
///
/// Pass/acceptance state lives in `control_resource_relations`, so `passed`
/// and `acceptance` come back at their defaults.
fn row_to_cloud_resource(row: &libsql::Row) -> Result<CloudResource, DatabaseError> {
    Ok(CloudResource {
        hash: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        resource_type: row.get::<String>(2)?,
        platform: get_opt_string(row, 3)?,
        account: get_opt_string(row, 4)?,
        location: get_opt_string(row, 5)?,
        organization: get_opt_string(row, 6)?,
        os_name: get_opt_string(row, 7)?,
        os_image: get_opt_string(row, 8)?,
        cluster_name: get_opt_string(row, 9)?,
        distribution_name: get_opt_string(row, 10)?,
        distribution_version: get_opt_string(row, 11)?,
        platform_account_id: get_opt_string(row, 12)?,
        cloud_resource_id: get_opt_string(row, 13)?,
        cloud_region: get_opt_string(row, 14)?,
        zones: get_json_or_default(row, 15)?,
        label_values: get_json_or_default(row, 16)?,
        agent_tags: get_json_or_default(row, 17)?,
        last_seen_date: get_string_or_empty(row, 18)?,
        global_id: get_opt_string(row, 19)?,
        ..CloudResource::default()
    })
}

impl CspmDb {
    /// Upsert resources keyed by hash.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any row fails; nothing from this call is kept.
    pub async fn save_cloud_resources(
        &self,
        resources: &[CloudResource],
    ) -> Result<(), DatabaseError> {
        self.write_tx("cloud_resources", async |conn| {
            for r in resources {
                upsert_cloud_resource(conn, r).await?;
            }
            Ok(())
        })
        .await?;
        debug!(count = resources.len(), "saved cloud resources");
        Ok(())
    }

    /// Look up one stored resource by hash.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no resource has this hash.
    pub async fn get_cloud_resource(&self, hash: &str) -> Result<CloudResource, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT hash, name, type, platform, account, location, organization,
                        os_name, os_image, cluster_name, distribution_name, distribution_version,
                        platform_account_id, cloud_resource_id, cloud_region,
                        zones_json, label_values_json, agent_tags_json, last_seen_date, global_id
                 FROM cloud_resources WHERE hash = ?1",
                [hash],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_cloud_resource(&row)
    }
}
