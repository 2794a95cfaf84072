use clap::{Args, Subcommand};

use crate::cli::subcommands::{InventoryCommands, RiskCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// List compliance requirements straight from the API (single query).
    List(FilterArgs),
    /// Collect requirements, controls and their resources into the database.
    Collect(CollectArgs),
    /// Show statistics from the database.
    Stats,
    /// List failed requirements stored in the database.
    Violations(ViolationsArgs),
    /// Inventory resources.
    Inventory {
        #[command(subcommand)]
        action: InventoryCommands,
    },
    /// Risk acceptances.
    Risk {
        #[command(subcommand)]
        action: RiskCommands,
    },
}

/// Requirement filter flags, turned into an API filter string.
#[derive(Clone, Debug, Default, Args)]
pub struct FilterArgs {
    /// Policy names to match, comma-separated, partial match (e.g. "CIS AWS,SOC 2")
    #[arg(long)]
    pub policy: Option<String>,

    /// Platform to match exactly (AWS, GCP, Azure, Kubernetes)
    #[arg(long)]
    pub platform: Option<String>,

    /// Zone name [default: collect.zone from config]
    #[arg(long)]
    pub zone: Option<String>,

    /// Include passing requirements
    #[arg(long)]
    pub include_pass: bool,
}

/// Pagination overrides for commands that page through the API.
#[derive(Clone, Debug, Default, Args)]
pub struct PaginationArgs {
    /// Records per page
    #[arg(long)]
    pub page_size: Option<i64>,

    /// Pages fetched concurrently per batch
    #[arg(long)]
    pub batch_size: Option<i64>,

    /// Seconds to wait between batches and between controls
    #[arg(long)]
    pub api_delay: Option<i64>,
}

#[derive(Clone, Debug, Args)]
pub struct CollectArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub pagination: PaginationArgs,
}

#[derive(Clone, Debug, Args)]
pub struct ViolationsArgs {
    /// Policy type substring (CIS, SOC2, PCI-DSS, HIPAA, NIST, Unknown)
    #[arg(long)]
    pub policy_type: Option<String>,

    /// Platform substring (AWS, GCP, Azure, Kubernetes, Multi-Cloud)
    #[arg(long)]
    pub platform: Option<String>,
}
