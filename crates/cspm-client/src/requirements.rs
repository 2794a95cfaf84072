//! Compliance requirement listings.

use cspm_core::Page;
use cspm_core::entities::{ComplianceRequirement, ComplianceRequirementWithControls};

use crate::http::{page_params, with_query};
use crate::pagination::{PaginationOptions, collect_all_pages};
use crate::{ClientError, CspmClient};

pub const REQUIREMENTS_PATH: &str = "/api/cspm/v1/compliance/requirements";

impl CspmClient {
    /// Single unpaginated query; the server decides how many records to return.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, non-success status or an
    /// undecodable body.
    pub async fn get_compliance_requirements(
        &self,
        filter: &str,
    ) -> Result<Page<ComplianceRequirement>, ClientError> {
        self.get_requirements_page(filter, 0, 0).await
    }

    /// One page of the flat requirements listing.
    ///
    /// # Errors
    ///
    /// See [`Self::get_compliance_requirements`].
    pub async fn get_requirements_page(
        &self,
        filter: &str,
        page_number: i64,
        page_size: i64,
    ) -> Result<Page<ComplianceRequirement>, ClientError> {
        let path = with_query(REQUIREMENTS_PATH, &page_params(filter, page_number, page_size));
        self.get_json(&path).await
    }

    /// One page of requirements with their controls embedded.
    ///
    /// # Errors
    ///
    /// See [`Self::get_compliance_requirements`].
    pub async fn get_requirements_with_controls_page(
        &self,
        filter: &str,
        page_number: i64,
        page_size: i64,
    ) -> Result<Page<ComplianceRequirementWithControls>, ClientError> {
        let mut params = vec![("includeControls", "true".to_string())];
        params.extend(page_params(filter, page_number, page_size));
        self.get_json(&with_query(REQUIREMENTS_PATH, &params)).await
    }

    /// Every page of the flat requirements listing.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Page`] if any page fails.
    pub async fn get_all_requirements(
        &self,
        filter: &str,
        opts: PaginationOptions,
    ) -> Result<Page<ComplianceRequirement>, ClientError> {
        let client = self.clone();
        let owned = filter.to_string();
        let page_size = i64::from(opts.page_size);
        let fetch = move |page: u32| {
            let client = client.clone();
            let filter = owned.clone();
            async move {
                client
                    .get_requirements_page(&filter, i64::from(page), page_size)
                    .await
            }
        };
        collect_all_pages(&format!("requirements [{filter}]"), fetch, opts).await
    }

    /// Every page of requirements with controls.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Page`] if any page fails.
    pub async fn get_all_requirements_with_controls(
        &self,
        filter: &str,
        opts: PaginationOptions,
    ) -> Result<Page<ComplianceRequirementWithControls>, ClientError> {
        let client = self.clone();
        let owned = filter.to_string();
        let page_size = i64::from(opts.page_size);
        let fetch = move |page: u32| {
            let client = client.clone();
            let filter = owned.clone();
            async move {
                client
                    .get_requirements_with_controls_page(&filter, i64::from(page), page_size)
                    .await
            }
        };
        collect_all_pages(&format!("requirements with controls [{filter}]"), fetch, opts).await
    }
}
