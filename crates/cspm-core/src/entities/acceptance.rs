use serde::{Deserialize, Serialize};

use crate::lenient::opt_string_or_number;

/// A risk acceptance registered against a control.
///
/// Dates and periods come back as either strings or epoch numbers, so they
/// are kept as text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskAcceptance {
    pub id: String,
    pub tenant_id: String,
    pub control_id: String,
    pub description: Option<String>,
    pub reason: Option<String>,
    #[serde(deserialize_with = "opt_string_or_number")]
    pub acceptance_date: Option<String>,
    pub username: Option<String>,
    pub user_display_name: Option<String>,
    pub filter: Option<String>,
    pub zone_id: Option<String>,
    #[serde(deserialize_with = "opt_string_or_number")]
    pub accept_period: Option<String>,
    #[serde(deserialize_with = "opt_string_or_number")]
    pub expires_at: Option<String>,
    pub is_expired: bool,
    pub is_system: bool,
    #[serde(rename = "type")]
    pub acceptance_type: Option<i64>,
    pub source_id: Option<String>,
}

/// Body of the acceptance search call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RiskAcceptanceSearchRequest {
    pub filter: String,
    pub page_number: u32,
    pub page_size: u32,
    pub sort: String,
    pub order_by: String,
}

impl RiskAcceptanceSearchRequest {
    /// Newest acceptances first, no filter.
    #[must_use]
    pub fn newest_first(page_number: u32, page_size: u32) -> Self {
        Self {
            filter: String::new(),
            page_number,
            page_size,
            sort: "acceptanceDate".to_string(),
            order_by: "desc".to_string(),
        }
    }
}

/// Body of the acceptance revoke call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RiskAcceptanceRevokeRequest {
    pub id: String,
}
