//! Builder for the CSPM query-language filter string.
//!
//! The string is passed to the API verbatim; nothing here interprets it.

/// Collects filter clauses and joins them with ` and `.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterBuilder {
    include_pass: bool,
    policies: Vec<String>,
    platform: Option<String>,
    zone: Option<String>,
}

impl FilterBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Include passing requirements (drops the `pass = "false"` clause).
    #[must_use]
    pub const fn include_pass(mut self, include: bool) -> Self {
        self.include_pass = include;
        self
    }

    /// Match policy names containing any of the comma-separated values.
    #[must_use]
    pub fn policies(mut self, csv: &str) -> Self {
        self.policies = csv
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    #[must_use]
    pub fn platform(mut self, platform: &str) -> Self {
        self.platform = non_empty(platform);
        self
    }

    #[must_use]
    pub fn zone(mut self, zone: &str) -> Self {
        self.zone = non_empty(zone);
        self
    }

    /// Render the filter. May be empty if every clause is disabled.
    #[must_use]
    pub fn build(&self) -> String {
        let mut clauses = Vec::new();
        if !self.include_pass {
            clauses.push(r#"pass = "false""#.to_string());
        }
        if !self.policies.is_empty() {
            let any = self
                .policies
                .iter()
                .map(|p| format!(r#"policy.name contains "{p}""#))
                .collect::<Vec<_>>()
                .join(" or ");
            clauses.push(format!("({any})"));
        }
        if let Some(platform) = &self.platform {
            clauses.push(format!(r#"platform = "{platform}""#));
        }
        if let Some(zone) = &self.zone {
            clauses.push(format!(r#"zone.name in ("{zone}")"#));
        }
        clauses.join(" and ")
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_filter_only_failed() {
        assert_eq!(FilterBuilder::new().build(), r#"pass = "false""#);
    }

    #[test]
    fn full_filter() {
        let filter = FilterBuilder::new()
            .policies("CIS Amazon, SOC 2")
            .platform("AWS")
            .zone("Entire Infrastructure")
            .build();
        assert_eq!(
            filter,
            r#"pass = "false" and (policy.name contains "CIS Amazon" or policy.name contains "SOC 2") and platform = "AWS" and zone.name in ("Entire Infrastructure")"#
        );
    }

    #[test]
    fn include_pass_and_blank_values() {
        let filter = FilterBuilder::new()
            .include_pass(true)
            .policies(" , ")
            .platform("")
            .zone("Prod")
            .build();
        assert_eq!(filter, r#"zone.name in ("Prod")"#);
    }

    #[test]
    fn everything_disabled_is_empty() {
        assert_eq!(FilterBuilder::new().include_pass(true).build(), "");
    }
}
