//! Pagination and rate-limit settings for collection runs.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ZONE: &str = "Entire Infrastructure";

const fn default_page_size() -> i64 {
    50
}

const fn default_batch_size() -> i64 {
    3
}

const fn default_api_delay_secs() -> i64 {
    1
}

fn default_zone() -> String {
    DEFAULT_ZONE.to_string()
}

/// Values are signed on purpose: non-positive page/batch sizes and negative
/// delays are accepted here and replaced by defaults when a run starts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectConfig {
    /// Records requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: i64,

    /// Pages fetched concurrently per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: i64,

    /// Seconds to wait between batches and between controls.
    #[serde(default = "default_api_delay_secs")]
    pub api_delay_secs: i64,

    /// Zone name used when building the default filter.
    #[serde(default = "default_zone")]
    pub zone: String,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            batch_size: default_batch_size(),
            api_delay_secs: default_api_delay_secs(),
            zone: default_zone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = CollectConfig::default();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.batch_size, 3);
        assert_eq!(config.api_delay_secs, 1);
        assert_eq!(config.zone, "Entire Infrastructure");
    }
}
