use anyhow::Context;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Debug, Serialize)]
struct RiskDeleteResponse {
    id: String,
    revoked: bool,
    deleted_locally: bool,
}

pub async fn run(id: &str, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config(flags, None)?;
    let client = bootstrap::client(&config)?;
    let db = bootstrap::open_db(&config).await?;

    client
        .revoke_risk_acceptance(id)
        .await
        .with_context(|| format!("failed to revoke risk acceptance {id}"))?;
    let deleted_locally = db.delete_risk_acceptance(id).await?;
    tracing::info!(id, deleted_locally, "risk acceptance revoked");

    output(
        &RiskDeleteResponse {
            id: id.to_string(),
            revoked: true,
            deleted_locally,
        },
        flags.format,
    )
}
