use cspm_core::entities::InventoryResource;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::{Column, output_list};

const COLUMNS: &[Column] = &[
    ("name", "name"),
    ("type", "type"),
    ("category", "category"),
    ("region", "region"),
    ("account", "account"),
    ("pass %", "passPercentage"),
];

/// Inventory resource with the identifiers a reader scans for pulled up front.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InventoryRow {
    #[serde(flatten)]
    resource: InventoryResource,
    region: Option<String>,
    account: Option<String>,
    pass_percentage: f64,
}

impl From<InventoryResource> for InventoryRow {
    fn from(resource: InventoryResource) -> Self {
        let ids = resource.platform_identifiers();
        let account = ids
            .aws_account
            .or(ids.gcp_project)
            .or(ids.azure_subscription)
            .or(ids.k8s_cluster);
        Self {
            region: ids.region,
            account,
            pass_percentage: resource.posture_policy_summary.pass_percentage,
            resource,
        }
    }
}

pub async fn run(platform: &str, limit: Option<u32>, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config(flags, None)?;
    let db = bootstrap::open_db(&config).await?;
    let rows: Vec<InventoryRow> = db
        .inventory_by_platform(platform, limit)
        .await?
        .into_iter()
        .map(InventoryRow::from)
        .collect();
    output_list(&rows, COLUMNS, flags.format)
}

#[cfg(test)]
mod tests {
    use cspm_core::entities::InventoryResource;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::InventoryRow;

    #[test]
    fn row_pulls_identifiers_from_metadata() {
        let resource: InventoryResource = serde_json::from_value(json!({
            "hash": "h1",
            "name": "prod-bucket",
            "type": "S3 Bucket",
            "platform": "AWS",
            "metadata": {"region": "us-east-1", "account": "123456789012"},
            "posturePolicySummary": {"passPercentage": 50.0, "policies": []}
        }))
        .unwrap();

        let value = serde_json::to_value(InventoryRow::from(resource)).unwrap();
        assert_eq!(value["name"], "prod-bucket");
        assert_eq!(value["type"], "S3 Bucket");
        assert_eq!(value["region"], "us-east-1");
        assert_eq!(value["account"], "123456789012");
        assert_eq!(value["passPercentage"], 50.0);
    }
}
