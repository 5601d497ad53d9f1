use allowlist_core::{IngressRule, MigrationPlan};
use colored::Colorize;
use serde::Serialize;

use crate::apply::{MembershipOutcome, OriginOutcome};
use crate::backup::BackupReport;

/// Machine-readable record of a whole run, for `--format json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub plan: MigrationPlan,
    pub backup: Option<BackupReport>,
    pub rule_outcomes: Vec<OriginOutcome>,
    pub membership: Option<MembershipOutcome>,
    /// Ground truth re-read from the backends after mutation.
    pub final_rules: Option<Vec<IngressRule>>,
    pub final_membership: Option<Vec<String>>,
}

impl RunReport {
    pub fn partial_failures(&self) -> usize {
        let rule_failures = self.rule_outcomes.iter().filter(|o| !o.ok).count();
        let membership_failure = match &self.membership {
            Some(outcome) if !outcome.ok => 1,
            _ => 0,
        };
        rule_failures + membership_failure
    }
}

/// Render the stateful backend's current rules, marking entries that grant an
/// incoming origin with `+`.
pub fn render_rule_set_state(name: &str, rules: &[IngressRule], incoming: &[String]) -> String {
    let mut out = vec![format!("[rules] {name}")];
    if rules.is_empty() {
        out.push("  (empty)".to_string());
    }
    for rule in rules {
        for grant in &rule.grants {
            let line = format!(
                "  {} {}: {}{}",
                rule.protocol,
                rule.port_label(),
                grant.cidr,
                grant
                    .description
                    .as_deref()
                    .map(|d| format!(" ({d})"))
                    .unwrap_or_default()
            );
            out.push(mark_changed(line, incoming.contains(&grant.cidr)));
        }
    }
    out.join("\n")
}

/// Render the flat backend's current members, marking incoming origins.
pub fn render_membership_state(name: &str, addresses: &[String], incoming: &[String]) -> String {
    let mut out = vec![format!("[members] {name}")];
    if addresses.is_empty() {
        out.push("  (empty)".to_string());
    }
    let mut sorted: Vec<&String> = addresses.iter().collect();
    sorted.sort();
    for address in sorted {
        out.push(mark_changed(
            format!("  {address}"),
            incoming.contains(address),
        ));
    }
    out.join("\n")
}

/// Render per-origin mutation outcomes.
pub fn render_outcomes(outcomes: &[OriginOutcome]) -> String {
    let mut out = Vec::new();
    for outcome in outcomes {
        let state = if outcome.ok { "ok" } else { "FAILED" };
        let line = format!(
            "  [{state}] {} {}: {}",
            outcome.action, outcome.origin, outcome.detail
        );
        if outcome.ok {
            out.push(line);
        } else {
            out.push(line.red().to_string());
        }
    }
    out.join("\n")
}

fn mark_changed(line: String, changed: bool) -> String {
    if changed {
        format!("+ {}", line.trim_start()).green().to_string()
    } else {
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allowlist_core::OriginGrant;

    fn rules() -> Vec<IngressRule> {
        vec![IngressRule {
            protocol: "tcp".to_string(),
            from_port: Some(22),
            to_port: Some(22),
            grants: vec![
                OriginGrant {
                    cidr: "198.51.100.9/32".to_string(),
                    description: Some("office".to_string()),
                },
                OriginGrant {
                    cidr: "192.0.2.7/32".to_string(),
                    description: None,
                },
            ],
        }]
    }

    #[test]
    fn changed_rule_entries_are_marked() {
        let rendered =
            render_rule_set_state("web", &rules(), &["198.51.100.9/32".to_string()]);
        assert!(rendered.contains("+ tcp 22-22: 198.51.100.9/32 (office)"));
        assert!(rendered.contains("  tcp 22-22: 192.0.2.7/32"));
    }

    #[test]
    fn membership_listing_is_sorted_with_markers() {
        let addresses = vec!["203.0.113.5/32".to_string(), "198.51.100.9/32".to_string()];
        let rendered =
            render_membership_state("edge", &addresses, &["198.51.100.9/32".to_string()]);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[1], "+ 198.51.100.9/32");
        assert_eq!(lines[2], "  203.0.113.5/32");
    }

    #[test]
    fn empty_backends_render_placeholders() {
        assert!(render_rule_set_state("web", &[], &[]).contains("(empty)"));
        assert!(render_membership_state("edge", &[], &[]).contains("(empty)"));
    }
}
