use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::ViolationsArgs;
use crate::output::{Column, output_list};

const COLUMNS: &[Column] = &[
    ("requirement", "name"),
    ("policy type", "policyType"),
    ("platform", "platform"),
    ("severity", "severity"),
    ("failed", "failedControls"),
    ("zone", "zoneName"),
];

/// Handle `cspm-utils violations`.
pub async fn handle(args: &ViolationsArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config(flags, None)?;
    let db = bootstrap::open_db(&config).await?;
    let violations = db
        .list_violations(
            args.policy_type.as_deref().unwrap_or_default(),
            args.platform.as_deref().unwrap_or_default(),
        )
        .await?;
    output_list(&violations, COLUMNS, flags.format)
}
