//! # cspm-client
//!
//! HTTP client for the CSPM REST API.
//!
//! - Single-page fetchers for compliance requirements (flat or with
//!   controls), control resource listings, inventory resources and risk
//!   acceptances
//! - [`pagination::collect_all_pages`], the batched parallel page collector
//!   every multi-page listing goes through
//! - [`filter::FilterBuilder`] for the query-language filter strings
//!
//! Every request carries `Authorization: Bearer <token>`.

pub mod acceptances;
pub mod filter;
pub mod inventory;
pub mod pagination;
pub mod requirements;
pub mod resources;

mod error;
mod http;

pub use error::ClientError;
pub use filter::FilterBuilder;
pub use pagination::PaginationOptions;

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::http::{check_response, decode_json};

/// Client for one CSPM API tenant.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct CspmClient {
    http: reqwest::Client,
    base_url: String,
}

impl CspmClient {
    /// Build a client for `base_url` (scheme and host, e.g.
    /// `https://us2.app.sysdig.com`) authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidToken`] if the token contains characters
    /// not allowed in a header, or [`ClientError::Request`] if the underlying
    /// `reqwest::Client` fails to build.
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ClientError::InvalidToken(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .user_agent(concat!("cspm-utils/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a path (with optional query) against the base URL. Absolute
    /// URLs are returned unchanged.
    fn url(&self, path_and_query: &str) -> String {
        if path_and_query.starts_with("http://") || path_and_query.starts_with("https://") {
            path_and_query.to_string()
        } else if path_and_query.starts_with('/') {
            format!("{}{path_and_query}", self.base_url)
        } else {
            format!("{}/{path_and_query}", self.base_url)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, ClientError> {
        let url = self.url(path_and_query);
        debug!(%url, "GET");
        let resp = check_response(self.http.get(&url).send().await?).await?;
        decode_json(resp).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "POST");
        let resp = check_response(self.http.post(&url).json(body).send().await?).await?;
        decode_json(resp).await
    }

    /// POST where only the status matters.
    async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ClientError> {
        let url = self.url(path);
        debug!(%url, "POST");
        check_response(self.http.post(&url).json(body).send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> CspmClient {
        CspmClient::new(base, "token", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn url_joins_paths() {
        let c = client("https://us2.app.sysdig.com/");
        assert_eq!(c.base_url(), "https://us2.app.sysdig.com");
        assert_eq!(c.url("/api/x?a=1"), "https://us2.app.sysdig.com/api/x?a=1");
        assert_eq!(c.url("api/x"), "https://us2.app.sysdig.com/api/x");
        assert_eq!(c.url("https://other.host/api"), "https://other.host/api");
    }

    #[test]
    fn rejects_token_with_newline() {
        let result = CspmClient::new("https://x", "abc\ndef", Duration::from_secs(1));
        assert!(matches!(result, Err(ClientError::InvalidToken(_))));
    }
}
