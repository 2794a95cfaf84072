use anyhow::Context;
use cspm_core::entities::ComplianceRequirement;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::root_commands::FilterArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::build_filter;
use crate::output::{Column, output, output_list};
use crate::progress::Progress;

const COLUMNS: &[Column] = &[
    ("requirement", "name"),
    ("policy", "policyName"),
    ("platform", "platform"),
    ("severity", "severity"),
    ("failed controls", "failedControls"),
];

#[derive(Debug, Serialize)]
struct ListResponse {
    filter: String,
    total_count: i64,
    requirements: Vec<ComplianceRequirement>,
}

/// Handle `cspm-utils list`.
pub async fn handle(args: &FilterArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config(flags, None)?;
    let client = bootstrap::client(&config)?;
    let filter = build_filter(args, &config.collect.zone);

    let progress = Progress::spinner("Querying compliance requirements");
    let page = progress
        .finish(
            client.get_compliance_requirements(&filter).await,
            "Requirements received",
            "Query failed",
        )
        .with_context(|| format!("failed to get compliance requirements [{filter}]"))?;

    if flags.format == OutputFormat::Table {
        if !flags.quiet {
            eprintln!("Filter: {filter}");
            eprintln!("Found {} compliance requirements", page.total_count.get());
        }
        return output_list(&page.data, COLUMNS, flags.format);
    }

    output(
        &ListResponse {
            filter,
            total_count: page.total_count.get(),
            requirements: page.data,
        },
        flags.format,
    )
}
