use clap::Subcommand;

/// Risk acceptance commands.
#[derive(Clone, Debug, Subcommand)]
pub enum RiskCommands {
    /// Fetch every risk acceptance from the API into the database.
    Collect,
    /// List stored risk acceptances.
    List {
        #[arg(long)]
        control_id: Option<String>,
    },
    /// Revoke an acceptance on the server and remove it from the database.
    Delete {
        #[arg(long)]
        id: String,
    },
}
