//! Risk acceptance search and revoke.
//!
//! The search endpoint is rate limited more aggressively than the listings,
//! so pages are fetched one at a time.

use cspm_core::Page;
use cspm_core::entities::{RiskAcceptance, RiskAcceptanceRevokeRequest, RiskAcceptanceSearchRequest};
use tracing::info;

use crate::pagination::{SEQUENTIAL_DELAY, SEQUENTIAL_PAGE_SIZE, collect_pages_sequential};
use crate::{ClientError, CspmClient};

pub const SEARCH_PATH: &str = "/api/cspm/v1/compliance/violations/acceptances/search";
pub const REVOKE_PATH: &str = "/api/cspm/v1/compliance/violations/revoke";

impl CspmClient {
    /// One page of acceptances, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, non-success status or an
    /// undecodable body.
    pub async fn search_risk_acceptances(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> Result<Page<RiskAcceptance>, ClientError> {
        let body = RiskAcceptanceSearchRequest::newest_first(page_number, page_size);
        self.post_json(SEARCH_PATH, &body).await
    }

    /// Every acceptance, fetched page by page with a pause between pages.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Page`] for the first failing page.
    pub async fn list_risk_acceptances(&self) -> Result<Vec<RiskAcceptance>, ClientError> {
        self.list_risk_acceptances_with(SEQUENTIAL_PAGE_SIZE, SEQUENTIAL_DELAY)
            .await
    }

    /// [`Self::list_risk_acceptances`] with explicit page size and delay.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Page`] for the first failing page.
    pub async fn list_risk_acceptances_with(
        &self,
        page_size: u32,
        delay: std::time::Duration,
    ) -> Result<Vec<RiskAcceptance>, ClientError> {
        let acceptances = collect_pages_sequential(
            "risk acceptances",
            move |page| self.search_risk_acceptances(page, page_size),
            page_size,
            delay,
        )
        .await?;
        info!(count = acceptances.len(), "collected risk acceptances");
        Ok(acceptances)
    }

    /// Revoke (delete) an acceptance on the server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ApiStatus`] if the server refuses.
    pub async fn revoke_risk_acceptance(&self, id: &str) -> Result<(), ClientError> {
        let body = RiskAcceptanceRevokeRequest { id: id.to_string() };
        self.post_unit(REVOKE_PATH, &body).await
    }
}
