use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `cspm-utils` binary.
#[derive(Debug, Parser)]
#[command(
    name = "cspm-utils",
    version,
    about = "Collect and analyze CSPM compliance violations and their resources"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API token (or set SYSDIG_API_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// API base URL (or set SYSDIG_API_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// SQLite database path
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            config: self.config.clone(),
            token: self.token.clone(),
            url: self.url.clone(),
            db: self.db.clone(),
        }
    }
}
