use cspm_client::FilterBuilder;

use crate::cli::root_commands::FilterArgs;

/// Build the API filter string; the zone falls back to `default_zone`.
pub fn build_filter(args: &FilterArgs, default_zone: &str) -> String {
    FilterBuilder::new()
        .include_pass(args.include_pass)
        .policies(args.policy.as_deref().unwrap_or_default())
        .platform(args.platform.as_deref().unwrap_or_default())
        .zone(args.zone.as_deref().unwrap_or(default_zone))
        .build()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::build_filter;
    use crate::cli::root_commands::FilterArgs;

    #[test]
    fn defaults_to_failed_in_configured_zone() {
        let filter = build_filter(&FilterArgs::default(), "Entire Infrastructure");
        assert_eq!(
            filter,
            r#"pass = "false" and zone.name in ("Entire Infrastructure")"#
        );
    }

    #[test]
    fn all_flags() {
        let args = FilterArgs {
            policy: Some("CIS AWS, SOC 2".into()),
            platform: Some("AWS".into()),
            zone: Some("Production".into()),
            include_pass: true,
        };
        assert_eq!(
            build_filter(&args, "Entire Infrastructure"),
            r#"(policy.name contains "CIS AWS" or policy.name contains "SOC 2") and platform = "AWS" and zone.name in ("Production")"#
        );
    }

    #[test]
    fn empty_zone_flag_drops_zone_clause() {
        let args = FilterArgs {
            zone: Some(String::new()),
            include_pass: true,
            ..FilterArgs::default()
        };
        assert_eq!(build_filter(&args, "Entire Infrastructure"), "");
    }
}
