mod collect;
mod list;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::InventoryCommands;

/// Handle `cspm-utils inventory`.
pub async fn handle(action: &InventoryCommands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        InventoryCommands::Collect { filter, pagination } => {
            collect::run(filter, pagination, flags).await
        }
        InventoryCommands::List { platform, limit } => list::run(platform, *limit, flags).await,
    }
}
