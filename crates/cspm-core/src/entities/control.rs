use serde::{Deserialize, Serialize};

/// A single check inside a compliance requirement.
///
/// `objects_count` is the number of failing resources; passing and accepted
/// resources are counted separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Control {
    pub id: String,
    pub name: String,
    pub description: String,
    pub target: String,
    #[serde(rename = "type")]
    pub control_type: i64,
    pub pass: bool,
    pub severity: String,
    pub objects_count: i64,
    pub passing_count: i64,
    pub accepted_count: i64,
    pub remediation_id: String,
    pub last_update: String,
    pub resource_kind: String,
    pub is_manual: bool,
    /// Path (with query string) listing the resources evaluated by this control.
    pub resource_api_endpoint: String,
    pub platform: String,
    pub authors: String,
}

impl Control {
    /// Whether the control points at a resource listing that can be fetched.
    #[must_use]
    pub fn has_endpoint(&self) -> bool {
        !self.resource_api_endpoint.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_api_payload() {
        let json = r#"{
            "id": "ctrl-1",
            "name": "S3 bucket versioning",
            "type": 7,
            "pass": false,
            "severity": "High",
            "objectsCount": 3,
            "passingCount": 10,
            "acceptedCount": 1,
            "resourceKind": "AWS_S3_BUCKET",
            "resourceApiEndpoint": "/api/cspm/v1/cloud/resources?controlId=ctrl-1",
            "isManual": false
        }"#;
        let control: Control = serde_json::from_str(json).unwrap();
        assert_eq!(control.id, "ctrl-1");
        assert_eq!(control.control_type, 7);
        assert_eq!(control.objects_count, 3);
        assert!(control.has_endpoint());
        assert!(control.description.is_empty());
    }

    #[test]
    fn blank_endpoint_is_not_fetchable() {
        let control = Control {
            resource_api_endpoint: "  ".into(),
            ..Control::default()
        };
        assert!(!control.has_endpoint());
    }
}
