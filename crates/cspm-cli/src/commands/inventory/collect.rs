use anyhow::Context;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::PaginationArgs;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct InventoryCollectResponse {
    filter: String,
    resources: usize,
}

pub async fn run(
    filter: &str,
    pagination: &PaginationArgs,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let config = bootstrap::load_config(flags, Some(pagination))?;
    let collector = bootstrap::collector(&config).await?;

    let progress = Progress::spinner("Collecting inventory");
    let resources = progress
        .finish(
            collector.collect_inventory(filter).await,
            "Inventory saved",
            "Inventory collection failed",
        )
        .context("failed to collect inventory")?;

    output(
        &InventoryCollectResponse {
            filter: filter.to_string(),
            resources,
        },
        flags.format,
    )
}
