use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::List(args) => commands::list::handle(&args, flags).await,
        Commands::Collect(args) => commands::collect::handle(&args, flags).await,
        Commands::Stats => commands::stats::handle(flags).await,
        Commands::Violations(args) => commands::violations::handle(&args, flags).await,
        Commands::Inventory { action } => commands::inventory::handle(&action, flags).await,
        Commands::Risk { action } => commands::risk::handle(&action, flags).await,
    }
}
