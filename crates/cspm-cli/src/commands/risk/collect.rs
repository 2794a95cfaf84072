use anyhow::Context;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct RiskCollectResponse {
    acceptances: usize,
}

pub async fn run(flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config(flags, None)?;
    let collector = bootstrap::collector(&config).await?;

    let progress = Progress::spinner("Collecting risk acceptances");
    let acceptances = progress
        .finish(
            collector.collect_risk_acceptances().await,
            "Risk acceptances saved",
            "Risk acceptance collection failed",
        )
        .context("failed to collect risk acceptances")?;

    output(&RiskCollectResponse { acceptances }, flags.format)
}
