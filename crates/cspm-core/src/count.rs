//! Decoding for `totalCount`, which the API sends as either `42` or `"42"`.
//!
//! Page-count arithmetic depends on this value, so anything that is not an
//! integer (empty string, non-digit string, float, bool, null) is rejected
//! instead of falling back to zero.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Failure to turn a string token into a count.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert {input:?} to an integer count: {reason}")]
pub struct CountError {
    /// The raw string that was rejected.
    pub input: String,
    /// Parser message.
    pub reason: String,
}

/// An integer count decoded from a JSON number or a JSON string of digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlexibleCount(i64);

impl FlexibleCount {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Number of pages needed to hold this many records at `page_size` per page.
    ///
    /// Zero or negative counts need no pages.
    #[must_use]
    pub fn pages(self, page_size: u32) -> u32 {
        if self.0 <= 0 || page_size == 0 {
            return 0;
        }
        let Ok(count) = u64::try_from(self.0) else {
            return 0;
        };
        let pages = count.div_ceil(u64::from(page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

impl From<i64> for FlexibleCount {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for FlexibleCount {
    type Err = CountError;

    /// Accepts an optionally signed run of decimal digits, nothing else.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self).map_err(|e| CountError {
            input: s.to_string(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for FlexibleCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for FlexibleCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

struct FlexibleCountVisitor;

impl Visitor<'_> for FlexibleCountVisitor {
    type Value = FlexibleCount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or a string containing an integer")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(FlexibleCount(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map(FlexibleCount)
            .map_err(|_| E::custom(format!("count {v} does not fit in i64")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse::<FlexibleCount>().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for FlexibleCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FlexibleCountVisitor)
    }
}
