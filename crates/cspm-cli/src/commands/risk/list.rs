use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::{Column, output_list};

const COLUMNS: &[Column] = &[
    ("id", "id"),
    ("control", "controlId"),
    ("reason", "reason"),
    ("period", "acceptPeriod"),
    ("expires", "expiresAt"),
    ("user", "username"),
];

pub async fn run(control_id: Option<&str>, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config(flags, None)?;
    let db = bootstrap::open_db(&config).await?;
    let acceptances = db.list_risk_acceptances(control_id).await?;
    output_list(&acceptances, COLUMNS, flags.format)
}
