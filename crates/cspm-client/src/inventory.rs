//! Inventory resource listing.

use cspm_core::Page;
use cspm_core::entities::InventoryResource;

use crate::http::{page_params, with_query};
use crate::pagination::{PaginationOptions, collect_all_pages};
use crate::{ClientError, CspmClient};

pub const INVENTORY_PATH: &str = "/api/cspm/v1/inventory/resources";

impl CspmClient {
    /// One page of the inventory listing.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, non-success status or an
    /// undecodable body.
    pub async fn get_inventory_page(
        &self,
        filter: &str,
        page_number: i64,
        page_size: i64,
    ) -> Result<Page<InventoryResource>, ClientError> {
        let path = with_query(INVENTORY_PATH, &page_params(filter, page_number, page_size));
        self.get_json(&path).await
    }

    /// Every page of the inventory listing.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Page`] if any page fails.
    pub async fn get_all_inventory(
        &self,
        filter: &str,
        opts: PaginationOptions,
    ) -> Result<Page<InventoryResource>, ClientError> {
        let client = self.clone();
        let owned = filter.to_string();
        let page_size = i64::from(opts.page_size);
        let fetch = move |page: u32| {
            let client = client.clone();
            let filter = owned.clone();
            async move {
                client
                    .get_inventory_page(&filter, i64::from(page), page_size)
                    .await
            }
        };
        collect_all_pages(&format!("inventory [{filter}]"), fetch, opts).await
    }
}
