//! Entity structs for the CSPM API payloads.
//!
//! Field names follow the API's camelCase JSON. Every struct tolerates missing
//! fields (`#[serde(default)]`) because the API omits empty values freely.

mod acceptance;
mod control;
mod inventory;
mod requirement;
mod resource;

pub use acceptance::{RiskAcceptance, RiskAcceptanceRevokeRequest, RiskAcceptanceSearchRequest};
pub use control::Control;
pub use inventory::{ControlSummary, InventoryResource, PlatformIdentifiers, PolicyRef, PolicySummary};
pub use requirement::{ComplianceRequirement, ComplianceRequirementWithControls, Zone};
pub use resource::{Acceptance, CloudResource};
