use anyhow::Context;
use cspm_collector::CollectSummary;
use cspm_db::ComplianceStats;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::CollectArgs;
use crate::commands::shared::build_filter;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct CollectResponse {
    filter: String,
    database: String,
    #[serde(flatten)]
    summary: CollectSummary,
    #[serde(flatten)]
    stats: ComplianceStats,
}

/// Handle `cspm-utils collect`.
pub async fn handle(args: &CollectArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config(flags, Some(&args.pagination))?;
    let filter = build_filter(&args.filter, &config.collect.zone);
    let collector = bootstrap::collector(&config).await?;

    let progress = Progress::spinner("Collecting compliance data");
    let (summary, stats) = progress
        .finish(
            collector.collect_with_stats(&filter).await,
            "Collection complete",
            "Collection failed",
        )
        .with_context(|| format!("failed to collect compliance data [{filter}]"))?;

    output(
        &CollectResponse {
            filter,
            database: config.database.path.display().to_string(),
            summary,
            stats,
        },
        flags.format,
    )
}
