use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Zone;
use crate::lenient::{null_as_empty, opt_string_or_number};

/// A policy reference inside a posture policy summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PolicyRef {
    pub id: String,
    pub name: String,
    pub pass: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicySummary {
    pub pass_percentage: f64,
    #[serde(deserialize_with = "null_as_empty")]
    pub policies: Vec<PolicyRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlSummary {
    pub name: String,
    pub policy_id: String,
    pub failed_controls: i64,
    pub accepted_controls: i64,
}

/// A resource from the inventory listing.
///
/// `metadata` is free-form; provider identifiers are pulled out of it with
/// [`InventoryResource::platform_identifiers`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryResource {
    pub hash: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub platform: String,
    pub category: String,
    /// Epoch timestamp; sent as a string or a number depending on the API version.
    #[serde(deserialize_with = "opt_string_or_number")]
    pub last_seen: Option<String>,
    pub metadata: Map<String, Value>,
    pub posture_policy_summary: PolicySummary,
    #[serde(deserialize_with = "null_as_empty")]
    pub labels: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub posture_control_summary: Vec<ControlSummary>,
    #[serde(deserialize_with = "null_as_empty")]
    pub zones: Vec<Zone>,
    pub resource_origin: String,
    pub config_api_endpoint: String,
}

/// Provider-specific identifiers extracted from inventory metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformIdentifiers {
    pub organization: Option<String>,
    pub region: Option<String>,
    pub aws_account: Option<String>,
    pub aws_arn: Option<String>,
    pub gcp_project: Option<String>,
    pub gcp_resource_id: Option<String>,
    pub azure_subscription: Option<String>,
    pub azure_resource_id: Option<String>,
    pub k8s_namespace: Option<String>,
    pub k8s_cluster: Option<String>,
}

impl InventoryResource {
    /// Pull the identifiers relevant to this resource's platform out of
    /// `metadata`. Azure reports its region as `location`.
    #[must_use]
    pub fn platform_identifiers(&self) -> PlatformIdentifiers {
        let get = |key: &str| {
            self.metadata
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let mut ids = PlatformIdentifiers {
            organization: get("organization"),
            region: get("region").or_else(|| get("location")),
            ..PlatformIdentifiers::default()
        };

        match self.platform.as_str() {
            "AWS" => {
                ids.aws_account = get("account");
                ids.aws_arn = get("arn");
            }
            "GCP" => {
                ids.gcp_project = get("project");
                ids.gcp_resource_id = get("resourceId");
            }
            "Azure" => {
                ids.azure_subscription = get("subscription");
                ids.azure_resource_id = get("resourceId");
            }
            "Kubernetes" => {
                ids.k8s_namespace = get("namespace");
                ids.k8s_cluster = get("cluster");
            }
            _ => {}
        }
        ids
    }

    /// `last_seen` as an integer, if it parses.
    #[must_use]
    pub fn last_seen_epoch(&self) -> Option<i64> {
        self.last_seen.as_deref().and_then(|s| s.parse().ok())
    }
}
