use serde::{Deserialize, Serialize};

use super::Control;
use crate::classify;

/// A posture zone (a named scope of resources).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Zone {
    pub id: String,
    pub name: String,
}

/// A compliance requirement as stored locally and as returned by the flat
/// requirements listing.
///
/// Natural key: `(requirement_id, policy_id, zone_id)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplianceRequirement {
    pub requirement_id: String,
    pub name: String,
    pub policy_id: String,
    pub policy_name: String,
    pub policy_type: String,
    pub platform: String,
    pub severity: String,
    pub pass: bool,
    pub zone_id: String,
    pub zone_name: String,
    pub failed_controls: i64,
    pub high_severity_count: i64,
    pub medium_severity_count: i64,
    pub low_severity_count: i64,
    pub accepted_count: i64,
    pub passing_count: i64,
    pub description: String,
    pub resource_api_endpoint: String,
}

/// A requirement returned with `includeControls=true`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplianceRequirementWithControls {
    pub requirement_id: String,
    pub name: String,
    pub policy_id: String,
    pub policy_name: String,
    pub severity: String,
    pub pass: bool,
    pub failed_controls: i64,
    pub high_severity_count: i64,
    pub medium_severity_count: i64,
    pub low_severity_count: i64,
    pub accepted_count: i64,
    pub passing_count: i64,
    pub description: String,
    #[serde(deserialize_with = "crate::lenient::null_as_empty")]
    pub controls: Vec<Control>,
    pub zone: Zone,
}

impl ComplianceRequirementWithControls {
    /// Flatten into the stored requirement shape.
    ///
    /// The zone object is split into id/name columns and the policy type and
    /// platform are classified from the policy name.
    #[must_use]
    pub fn to_requirement(&self) -> ComplianceRequirement {
        ComplianceRequirement {
            requirement_id: self.requirement_id.clone(),
            name: self.name.clone(),
            policy_id: self.policy_id.clone(),
            policy_name: self.policy_name.clone(),
            policy_type: classify::policy_type(&self.policy_name).to_string(),
            platform: classify::platform(&self.policy_name).to_string(),
            severity: self.severity.clone(),
            pass: self.pass,
            zone_id: self.zone.id.clone(),
            zone_name: self.zone.name.clone(),
            failed_controls: self.failed_controls,
            high_severity_count: self.high_severity_count,
            medium_severity_count: self.medium_severity_count,
            low_severity_count: self.low_severity_count,
            accepted_count: self.accepted_count,
            passing_count: self.passing_count,
            description: self.description.clone(),
            resource_api_endpoint: String::new(),
        }
    }
}
