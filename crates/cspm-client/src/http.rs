//! Shared HTTP response helpers.
//!
//! Centralizes status-code checks and body decoding so the endpoint modules
//! stay focused on request construction.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;

/// Return the response unchanged on success, otherwise
/// [`ClientError::ApiStatus`] carrying the server's JSON `message`, if any.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::ApiStatus {
        status: status.as_u16(),
        message: extract_message(&body),
    })
}

/// Read the body and decode it as JSON.
pub async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// The `message` field of a JSON error body.
fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Append `key=value` pairs to a path, percent-encoding the values.
pub fn with_query(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let query = pairs
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}

/// Query pairs for one page of a filtered listing.
///
/// An empty filter, a page number ≤ 0 and a page size ≤ 0 are each omitted.
pub fn page_params(filter: &str, page_number: i64, page_size: i64) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::with_capacity(3);
    if !filter.is_empty() {
        pairs.push(("filter", filter.to_string()));
    }
    if page_number > 0 {
        pairs.push(("pageNumber", page_number.to_string()));
    }
    if page_size > 0 {
        pairs.push(("pageSize", page_size.to_string()));
    }
    pairs
}
