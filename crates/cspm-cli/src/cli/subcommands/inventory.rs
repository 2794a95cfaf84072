use clap::Subcommand;

use crate::cli::root_commands::PaginationArgs;

/// Inventory commands.
#[derive(Clone, Debug, Subcommand)]
pub enum InventoryCommands {
    /// Fetch inventory resources from the API into the database.
    Collect {
        /// Raw API filter expression (e.g. 'platform = "AWS"')
        #[arg(long, default_value = "")]
        filter: String,
        #[command(flatten)]
        pagination: PaginationArgs,
    },
    /// List stored inventory resources for a platform.
    List {
        #[arg(long)]
        platform: String,
        #[arg(long)]
        limit: Option<u32>,
    },
}
