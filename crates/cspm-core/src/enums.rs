//! Derived status values stored alongside control/resource relations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::Acceptance;

/// Outcome of a resource against a control, after risk acceptances are applied.
///
/// Always derived from the resource's pass flag and acceptance override at
/// write time; never read back as a source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptanceStatus {
    Failed,
    Passed,
    Accepted,
}

impl AcceptanceStatus {
    /// An acceptance override wins over the pass flag.
    #[must_use]
    pub const fn derive(passed: bool, acceptance: Option<&Acceptance>) -> Self {
        match (acceptance, passed) {
            (Some(_), _) => Self::Accepted,
            (None, false) => Self::Failed,
            (None, true) => Self::Passed,
        }
    }

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Failed => "failed",
            Self::Passed => "passed",
            Self::Accepted => "accepted",
        }
    }
}

impl fmt::Display for AcceptanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
