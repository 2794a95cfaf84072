//! # cspm-collector
//!
//! Drives a collection run against the CSPM API and stores the results.
//!
//! A full run has two phases:
//! 1. Fetch every compliance requirement with its controls and save them.
//! 2. For each failed requirement, fetch and save the resources evaluated by
//!    each of its controls, pausing between controls.
//!
//! Phase 2 tolerates per-control fetch failures; anything that fails to save
//! aborts the run.

mod error;

pub use error::CollectError;

use cspm_client::{CspmClient, PaginationOptions};
use cspm_core::AcceptanceStatus;
use cspm_core::entities::CloudResource;
use cspm_db::{ComplianceStats, CspmDb};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Counts from one full collection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectSummary {
    pub requirements: usize,
    /// Controls of failed requirements, including skipped and failed ones.
    pub controls_processed: usize,
    /// Controls without a resource-listing endpoint.
    pub controls_skipped: usize,
    /// Controls whose resource listing could not be fetched.
    pub controls_failed: usize,
    pub resources_collected: usize,
}

/// Collects compliance data from the API into the local database.
pub struct ComplianceCollector {
    client: CspmClient,
    db: CspmDb,
    opts: PaginationOptions,
}

impl ComplianceCollector {
    #[must_use]
    pub const fn new(client: CspmClient, db: CspmDb, opts: PaginationOptions) -> Self {
        Self { client, db, opts }
    }

    #[must_use]
    pub const fn db(&self) -> &CspmDb {
        &self.db
    }

    /// Run both phases for requirements matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Requirements`] if phase 1 cannot be fetched and
    /// [`CollectError::Persist`] if any save fails.
    pub async fn collect(&self, filter: &str) -> Result<CollectSummary, CollectError> {
        info!(filter, "fetching compliance requirements with controls");
        let requirements = self
            .client
            .get_all_requirements_with_controls(filter, self.opts)
            .await
            .map_err(CollectError::Requirements)?
            .data;
        info!(count = requirements.len(), "retrieved requirements");

        self.db
            .save_requirements_with_controls(&requirements)
            .await
            .map_err(CollectError::persist("compliance requirements"))?;

        let mut summary = CollectSummary {
            requirements: requirements.len(),
            ..CollectSummary::default()
        };

        let total = requirements.len();
        for (idx, req) in requirements.iter().enumerate() {
            if req.pass {
                debug!(requirement = %req.name, "skipping passed requirement");
                continue;
            }
            info!(
                "[{}/{total}] requirement {} ({} controls)",
                idx + 1,
                req.name,
                req.controls.len()
            );

            for ctrl in &req.controls {
                summary.controls_processed += 1;
                if !ctrl.has_endpoint() {
                    debug!(control_id = %ctrl.id, "no resource endpoint, skipping");
                    summary.controls_skipped += 1;
                    continue;
                }

                let resources = match self
                    .fetch_control_resources(&ctrl.id, &ctrl.resource_api_endpoint)
                    .await
                {
                    Ok(resources) => resources,
                    Err(err) => {
                        warn!(control_id = %ctrl.id, error = %err, "skipping control");
                        summary.controls_failed += 1;
                        continue;
                    }
                };

                self.save_control_resources(&ctrl.id, &resources).await?;
                summary.resources_collected += resources.len();

                if !self.opts.api_delay.is_zero() {
                    tokio::time::sleep(self.opts.api_delay).await;
                }
            }
        }

        info!(
            requirements = summary.requirements,
            controls = summary.controls_processed,
            skipped = summary.controls_skipped,
            failed = summary.controls_failed,
            resources = summary.resources_collected,
            "collection finished"
        );
        Ok(summary)
    }

    /// [`Self::collect`], then read the database statistics.
    ///
    /// # Errors
    ///
    /// See [`Self::collect`].
    pub async fn collect_with_stats(
        &self,
        filter: &str,
    ) -> Result<(CollectSummary, ComplianceStats), CollectError> {
        let summary = self.collect(filter).await?;
        let stats = self.compliance_stats().await?;
        Ok((summary, stats))
    }

    /// Current statistics from the database.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Persist`] if the database cannot be read.
    pub async fn compliance_stats(&self) -> Result<ComplianceStats, CollectError> {
        self.db
            .compliance_stats()
            .await
            .map_err(CollectError::persist("compliance stats"))
    }

    /// Fetch and save the resources of a single control.
    ///
    /// Unlike a full run, a fetch failure here is returned to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::ControlResources`] or [`CollectError::Persist`].
    pub async fn collect_control_resources(
        &self,
        control_id: &str,
        endpoint: &str,
    ) -> Result<Vec<CloudResource>, CollectError> {
        let resources = self
            .fetch_control_resources(control_id, endpoint)
            .await
            .map_err(|source| CollectError::ControlResources {
                control_id: control_id.to_string(),
                source,
            })?;
        self.save_control_resources(control_id, &resources).await?;
        Ok(resources)
    }

    /// Fetch every inventory resource matching `filter` and save it.
    /// Returns the number of resources stored.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Inventory`] or [`CollectError::Persist`].
    pub async fn collect_inventory(&self, filter: &str) -> Result<usize, CollectError> {
        info!(filter, "fetching inventory");
        let resources = self
            .client
            .get_all_inventory(filter, self.opts)
            .await
            .map_err(CollectError::Inventory)?
            .data;
        self.db
            .save_inventory_resources(&resources)
            .await
            .map_err(CollectError::persist("inventory resources"))?;
        info!(count = resources.len(), "inventory saved");
        Ok(resources.len())
    }

    /// Fetch every risk acceptance (sequentially, newest first) and save it.
    /// Returns the number of acceptances stored.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::RiskAcceptances`] or [`CollectError::Persist`].
    pub async fn collect_risk_acceptances(&self) -> Result<usize, CollectError> {
        info!("fetching risk acceptances");
        let acceptances = self
            .client
            .list_risk_acceptances()
            .await
            .map_err(CollectError::RiskAcceptances)?;
        self.db
            .save_risk_acceptances(&acceptances)
            .await
            .map_err(CollectError::persist("risk acceptances"))?;
        info!(count = acceptances.len(), "risk acceptances saved");
        Ok(acceptances.len())
    }

    async fn fetch_control_resources(
        &self,
        control_id: &str,
        endpoint: &str,
    ) -> Result<Vec<CloudResource>, cspm_client::ClientError> {
        let started = tokio::time::Instant::now();
        let resources = self
            .client
            .get_all_cloud_resources(endpoint, self.opts)
            .await?
            .data;

        let (mut failed, mut passed, mut accepted) = (0_usize, 0_usize, 0_usize);
        for r in &resources {
            match r.acceptance_status() {
                AcceptanceStatus::Failed => failed += 1,
                AcceptanceStatus::Passed => passed += 1,
                AcceptanceStatus::Accepted => accepted += 1,
            }
        }
        info!(
            control_id,
            count = resources.len(),
            failed,
            passed,
            accepted,
            elapsed_ms = started.elapsed().as_millis(),
            "retrieved control resources"
        );
        Ok(resources)
    }

    async fn save_control_resources(
        &self,
        control_id: &str,
        resources: &[CloudResource],
    ) -> Result<(), CollectError> {
        if resources.is_empty() {
            return Ok(());
        }
        self.db
            .save_control_resource_relations(control_id, resources)
            .await
            .map_err(CollectError::persist(format!("resources for control {control_id}")))
    }
}
