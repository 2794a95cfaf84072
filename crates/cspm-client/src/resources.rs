//! Per-control resource listings.
//!
//! A control's `resourceApiEndpoint` is a path that already carries its own
//! query string. Pagination parameters are set on top of it, replacing any
//! values the endpoint came with.

use cspm_core::Page;
use cspm_core::entities::CloudResource;
use reqwest::Url;

use crate::pagination::{PaginationOptions, collect_all_pages};
use crate::{ClientError, CspmClient};

impl CspmClient {
    /// One page of a control's resource listing.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] if the endpoint cannot be
    /// resolved, otherwise the usual transport/status/decode errors.
    pub async fn get_cloud_resources_page(
        &self,
        endpoint: &str,
        page_number: i64,
        page_size: i64,
    ) -> Result<Page<CloudResource>, ClientError> {
        let url = self.paged_endpoint(endpoint, page_number, page_size)?;
        self.get_json(url.as_str()).await
    }

    /// Every page of a control's resource listing.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Page`] if any page fails.
    pub async fn get_all_cloud_resources(
        &self,
        endpoint: &str,
        opts: PaginationOptions,
    ) -> Result<Page<CloudResource>, ClientError> {
        // Fail fast on a malformed endpoint before any request goes out.
        self.paged_endpoint(endpoint, 0, 0)?;

        let client = self.clone();
        let owned = endpoint.to_string();
        let page_size = i64::from(opts.page_size);
        let fetch = move |page: u32| {
            let client = client.clone();
            let endpoint = owned.clone();
            async move {
                client
                    .get_cloud_resources_page(&endpoint, i64::from(page), page_size)
                    .await
            }
        };
        collect_all_pages(endpoint, fetch, opts).await
    }

    fn paged_endpoint(
        &self,
        endpoint: &str,
        page_number: i64,
        page_size: i64,
    ) -> Result<Url, ClientError> {
        let invalid = |reason: String| ClientError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };
        let base = Url::parse(self.base_url()).map_err(|e| invalid(e.to_string()))?;
        let mut url = base.join(endpoint).map_err(|e| invalid(e.to_string()))?;

        let mut pairs: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != "pageNumber" && k != "pageSize")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        if page_number > 0 {
            pairs.push(("pageNumber".into(), page_number.to_string()));
        }
        if page_size > 0 {
            pairs.push(("pageSize".into(), page_size.to_string()));
        }

        if pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }
        Ok(url)
    }
}
