use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `cspm-utils stats`.
pub async fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config(flags, None)?;
    let db = bootstrap::open_db(&config).await?;
    let stats = db.compliance_stats().await?;
    output(&stats, flags.format)
}
