mod collect;
mod delete;
mod list;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::RiskCommands;

/// Handle `cspm-utils risk`.
pub async fn handle(action: &RiskCommands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        RiskCommands::Collect => collect::run(flags).await,
        RiskCommands::List { control_id } => list::run(control_id.as_deref(), flags).await,
        RiskCommands::Delete { id } => delete::run(id, flags).await,
    }
}
