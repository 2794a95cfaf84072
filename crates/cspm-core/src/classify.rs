//! Best-effort classification of policy names.
//!
//! The API does not report a policy's framework or target platform on the
//! requirement itself, so both are guessed from the policy name. Each table is
//! scanned in order and the first keyword found (case-insensitively) wins.

/// Fallback when no policy-type keyword matches.
pub const UNKNOWN_POLICY_TYPE: &str = "Unknown";

/// Fallback when no platform keyword matches.
pub const MULTI_CLOUD: &str = "Multi-Cloud";

/// `(keyword, policy type)` pairs, checked in order.
pub const POLICY_TYPE_TABLE: &[(&str, &str)] = &[
    ("CIS", "CIS"),
    ("SOC", "SOC2"),
    ("SOC 2", "SOC2"),
    ("PCI", "PCI-DSS"),
    ("HIPAA", "HIPAA"),
    ("NIST", "NIST"),
];

/// `(keyword, platform)` pairs, checked in order.
pub const PLATFORM_TABLE: &[(&str, &str)] = &[
    ("AWS", "AWS"),
    ("Amazon", "AWS"),
    ("GCP", "GCP"),
    ("Google Cloud", "GCP"),
    ("Azure", "Azure"),
    ("Kubernetes", "Kubernetes"),
    ("K8s", "Kubernetes"),
];

/// Classify a policy name into a compliance framework.
#[must_use]
pub fn policy_type(policy_name: &str) -> &'static str {
    first_match(POLICY_TYPE_TABLE, policy_name).unwrap_or(UNKNOWN_POLICY_TYPE)
}

/// Classify a policy name into the cloud platform it targets.
#[must_use]
pub fn platform(policy_name: &str) -> &'static str {
    first_match(PLATFORM_TABLE, policy_name).unwrap_or(MULTI_CLOUD)
}

fn first_match(table: &[(&str, &'static str)], name: &str) -> Option<&'static str> {
    let haystack = name.to_lowercase();
    table
        .iter()
        .find(|(keyword, _)| haystack.contains(&keyword.to_lowercase()))
        .map(|&(_, class)| class)
}
