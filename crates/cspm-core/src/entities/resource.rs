use serde::{Deserialize, Serialize};

use super::Zone;
use crate::enums::AcceptanceStatus;
use crate::lenient::null_as_empty;

/// A risk-acceptance override attached to a resource's evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Acceptance {
    pub justification: String,
    #[serde(deserialize_with = "crate::lenient::opt_string_or_number")]
    pub expiration_date: Option<String>,
}

/// A resource evaluated by a control, as returned by a control's resource
/// listing.
///
/// Cloud-provider listings fill `platform`/`account`/`location`/`organization`;
/// host and cluster listings fill the `os_*`, `cluster_name` and
/// `distribution_*` fields instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudResource {
    pub hash: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub passed: bool,

    pub platform: Option<String>,
    pub account: Option<String>,
    pub location: Option<String>,
    pub organization: Option<String>,

    pub os_name: Option<String>,
    pub os_image: Option<String>,
    pub cluster_name: Option<String>,
    pub distribution_name: Option<String>,
    pub distribution_version: Option<String>,
    pub platform_account_id: Option<String>,
    pub cloud_resource_id: Option<String>,
    pub cloud_region: Option<String>,

    pub acceptance: Option<Acceptance>,
    #[serde(deserialize_with = "null_as_empty")]
    pub zones: Vec<Zone>,
    pub last_seen_date: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub label_values: Vec<String>,
    pub global_id: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub agent_tags: Vec<String>,
    pub config_error: Option<String>,
    pub nodes_count: Option<i64>,
}

impl CloudResource {
    #[must_use]
    pub const fn acceptance_status(&self) -> AcceptanceStatus {
        AcceptanceStatus::derive(self.passed, self.acceptance.as_ref())
    }

    /// Justification text, present only for accepted resources.
    #[must_use]
    pub fn acceptance_justification(&self) -> Option<&str> {
        self.acceptance.as_ref().map(|a| a.justification.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_cloud_listing_row() {
        let json = r#"{
            "hash": "h1",
            "name": "prod-logs",
            "type": "AWS_S3_BUCKET",
            "passed": false,
            "platform": "AWS",
            "account": "123456789012",
            "location": "us-east-1",
            "acceptance": {"justification": "legacy bucket", "expirationDate": 1767225600000},
            "zones": [{"id": "z-1", "name": "Entire Infrastructure"}],
            "lastSeenDate": "2024-11-30T10:00:00Z",
            "labelValues": null
        }"#;
        let resource: CloudResource = serde_json::from_str(json).unwrap();
        assert_eq!(resource.resource_type, "AWS_S3_BUCKET");
        assert_eq!(resource.account.as_deref(), Some("123456789012"));
        assert!(resource.label_values.is_empty());
        assert_eq!(
            resource.acceptance.as_ref().and_then(|a| a.expiration_date.as_deref()),
            Some("1767225600000")
        );
        assert_eq!(resource.acceptance_status(), AcceptanceStatus::Accepted);
        assert_eq!(resource.acceptance_justification(), Some("legacy bucket"));
    }

    #[test]
    fn decodes_cluster_listing_row() {
        let json = r#"{
            "hash": "h2",
            "name": "node-a",
            "type": "Host",
            "passed": true,
            "osName": "linux",
            "osImage": "Amazon Linux 2023",
            "clusterName": "prod",
            "acceptance": null
        }"#;
        let resource: CloudResource = serde_json::from_str(json).unwrap();
        assert!(resource.platform.is_none());
        assert_eq!(resource.cluster_name.as_deref(), Some("prod"));
        assert_eq!(resource.acceptance_status(), AcceptanceStatus::Passed);
        assert!(resource.acceptance_justification().is_none());
    }
}
