//! The `{data, totalCount}` envelope shared by all paginated CSPM endpoints.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::count::FlexibleCount;
use crate::lenient::null_as_empty;

/// One page of records plus the server's authoritative total.
///
/// A missing `totalCount` decodes as zero; a present but malformed one is an
/// error (see [`FlexibleCount`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Page<T> {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<T>,
    #[serde(rename = "totalCount", default)]
    pub total_count: FlexibleCount,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn new(data: Vec<T>, total_count: i64) -> Self {
        Self {
            data,
            total_count: FlexibleCount::new(total_count),
        }
    }
}
