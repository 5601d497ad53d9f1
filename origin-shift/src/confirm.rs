use std::io::{self, BufRead, Write};

use allowlist_core::MigrationPlan;
use colored::Colorize;

/// Render the planned change for operator review.
///
/// Each retiring origin is annotated with the backends that currently hold
/// it, so "absent" entries are visible before anything is touched.
pub fn render_plan(plan: &MigrationPlan, rule_set_name: &str, membership_name: &str) -> String {
    let mut out = Vec::new();
    out.push("=== planned change ===".to_string());
    out.push(format!(
        "rule set: {} ({})",
        rule_set_name,
        availability(plan.stateful_available)
    ));
    out.push(format!(
        "membership set: {} ({})",
        membership_name,
        availability(plan.flat_available)
    ));
    out.push(String::new());

    out.push("remove:".to_string());
    if plan.retiring.is_empty() {
        out.push("  (none)".to_string());
    }
    for origin in &plan.retiring {
        let line = format!("  - {} [{}]", origin, presence(plan, origin));
        out.push(line.red().to_string());
    }

    out.push("add:".to_string());
    if plan.incoming.is_empty() {
        out.push("  (none)".to_string());
    }
    for origin in &plan.incoming {
        out.push(format!("  + {origin}").green().to_string());
    }

    out.join("\n")
}

fn availability(available: bool) -> &'static str {
    if available {
        "available"
    } else {
        "not found, skipped"
    }
}

fn presence(plan: &MigrationPlan, origin: &str) -> String {
    let mut held = Vec::new();
    if plan.stateful_exists.get(origin).copied().unwrap_or(false) {
        held.push("rules");
    }
    if plan.flat_exists.get(origin).copied().unwrap_or(false) {
        held.push("members");
    }
    if held.is_empty() {
        "absent".to_string()
    } else {
        held.join(", ")
    }
}

/// Block until the operator answers yes or no.
///
/// Case-insensitive `yes`/`y` and `no`/`n` are accepted; anything else
/// re-prompts with no side effects. EOF counts as a refusal.
pub fn confirm(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    loop {
        write!(output, "apply these changes? (yes/no): ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => return Ok(true),
            "no" | "n" => return Ok(false),
            _ => writeln!(output, "please answer 'yes' or 'no'.")?,
        }
    }
}
