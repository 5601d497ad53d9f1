//! Best-effort pre-mutation snapshots.
//!
//! One tabular record per available backend per run plus a human-readable
//! summary referencing both. Every failure lands in `warnings`; nothing here
//! may stop the migration itself.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use allowlist_core::{IngressRule, MembershipSnapshot};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct BackupReport {
    pub rules_file: Option<PathBuf>,
    pub membership_file: Option<PathBuf>,
    pub summary_file: Option<PathBuf>,
    pub warnings: Vec<String>,
}

/// Unix-seconds run id used to name the backup artifacts.
pub fn run_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// Write all backup artifacts for one run.
///
/// A `None` snapshot means that backend is unavailable and is noted as absent
/// in the summary instead of producing a record.
pub fn record_backups(
    dir: &Path,
    run_id: u64,
    rules: Option<&[IngressRule]>,
    membership: Option<&MembershipSnapshot>,
) -> BackupReport {
    let mut report = BackupReport::default();

    if let Err(err) = fs::create_dir_all(dir) {
        report
            .warnings
            .push(format!("failed to create backup dir {}: {err}", dir.display()));
        return report;
    }

    if let Some(rules) = rules {
        let path = dir.join(format!("rules-{run_id}.csv"));
        match fs::write(&path, rules_csv(rules)) {
            Ok(()) => report.rules_file = Some(path),
            Err(err) => report
                .warnings
                .push(format!("failed to write {}: {err}", path.display())),
        }
    }

    if let Some(membership) = membership {
        let path = dir.join(format!("membership-{run_id}.csv"));
        match fs::write(&path, membership_csv(membership)) {
            Ok(()) => report.membership_file = Some(path),
            Err(err) => report
                .warnings
                .push(format!("failed to write {}: {err}", path.display())),
        }
    }

    let summary_path = dir.join(format!("summary-{run_id}.txt"));
    let summary = render_summary(run_id, &report);
    match fs::write(&summary_path, summary) {
        Ok(()) => report.summary_file = Some(summary_path),
        Err(err) => report
            .warnings
            .push(format!("failed to write {}: {err}", summary_path.display())),
    }

    report
}

fn rules_csv(rules: &[IngressRule]) -> String {
    let mut out = vec!["protocol,from_port,to_port,cidr,description".to_string()];
    for rule in rules {
        for grant in &rule.grants {
            out.push(format!(
                "{},{},{},{},{}",
                csv_field(&rule.protocol),
                rule.from_port.map(|p| p.to_string()).unwrap_or_default(),
                rule.to_port.map(|p| p.to_string()).unwrap_or_default(),
                csv_field(&grant.cidr),
                csv_field(grant.description.as_deref().unwrap_or("")),
            ));
        }
    }
    out.join("\n") + "\n"
}

fn membership_csv(membership: &MembershipSnapshot) -> String {
    let mut out = vec!["address".to_string()];
    for address in &membership.addresses {
        out.push(csv_field(address));
    }
    out.join("\n") + "\n"
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn render_summary(run_id: u64, report: &BackupReport) -> String {
    let mut out = vec![format!("backup run {run_id}")];
    out.push(artifact_line("rules", report.rules_file.as_deref()));
    out.push(artifact_line(
        "membership",
        report.membership_file.as_deref(),
    ));
    for warning in &report.warnings {
        out.push(format!("warning: {warning}"));
    }
    out.join("\n") + "\n"
}

fn artifact_line(label: &str, path: Option<&Path>) -> String {
    match path {
        Some(path) => {
            let size = fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);
            format!("{label}: {} ({size} bytes)", path.display())
        }
        None => format!("{label}: absent"),
    }
}
