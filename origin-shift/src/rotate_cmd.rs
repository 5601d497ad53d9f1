use std::io;

use allowlist_core::{parse_origin_list, validate_origin_lists};
use anyhow::{Context, Result};
use origin_shift::apply::{migrate_rule_set, reconcile_membership};
use origin_shift::backend::{MembershipBackend, RuleSetBackend};
use origin_shift::backup::{record_backups, run_id};
use origin_shift::config::load_config;
use origin_shift::confirm::{confirm, render_plan};
use origin_shift::probe::probe_backends;
use origin_shift::report::{
    render_membership_state, render_outcomes, render_rule_set_state, RunReport,
};
use origin_shift::store::JsonStateStore;

use crate::cli::{OutputFormat, RotateArgs};

pub fn run_rotate(args: RotateArgs) -> Result<()> {
    let json = matches!(args.format, OutputFormat::Json);
    let config = load_config(&args.config)?;

    let retiring = parse_origin_list(&args.before);
    let incoming = parse_origin_list(&args.after);
    validate_origin_lists(&retiring, &incoming)?;

    let mut store = JsonStateStore::open(&config.state_file)
        .with_context(|| format!("failed to open state file {}", config.state_file.display()))?;
    if store.region() != config.region {
        eprintln!(
            "warning: state file region '{}' does not match configured region '{}'",
            store.region(),
            config.region
        );
    }

    let probe = probe_backends(
        &store,
        &store,
        &config.rule_set_name,
        &config.membership_set_name,
        retiring,
        incoming,
    )?;

    if !json {
        println!("region: {}", config.region);
        if let Some(id) = &probe.rule_set_id {
            println!("rule set id: {id}");
        }
        if let Some(id) = &probe.membership_id {
            println!("membership set id: {id}");
        }
        println!();
    }

    let rendered_plan = render_plan(&probe.plan, &config.rule_set_name, &config.membership_set_name);
    if json {
        eprintln!("{rendered_plan}");
    } else {
        println!("{rendered_plan}");
        println!();
    }

    if !args.assume_yes {
        let stdin = io::stdin();
        let approved = if json {
            confirm(&mut stdin.lock(), &mut io::stderr())?
        } else {
            confirm(&mut stdin.lock(), &mut io::stdout())?
        };
        if !approved {
            println!("cancelled; no changes applied.");
            return Ok(());
        }
    }

    let backup = if args.skip_backup {
        None
    } else {
        let report = record_backups(
            &config.backup_dir,
            run_id(),
            probe.rule_snapshot.as_deref(),
            probe.membership.as_ref(),
        );
        for warning in &report.warnings {
            eprintln!("warning: {warning}");
        }
        if !json {
            if let Some(path) = &report.summary_file {
                println!("backup summary: {}", path.display());
            }
        }
        Some(report)
    };

    let rule_outcomes = match (&probe.rule_set_id, &probe.rule_snapshot) {
        (Some(id), Some(snapshot)) => {
            if !json {
                println!("[rules] updating {}", config.rule_set_name);
            }
            let outcomes = migrate_rule_set(&mut store, id, snapshot, &probe.plan);
            if !json {
                println!("{}", render_outcomes(&outcomes));
            }
            outcomes
        }
        _ => {
            if !json {
                println!("[rules] {} not found, skipped", config.rule_set_name);
            }
            Vec::new()
        }
    };

    let membership_outcome = match (&probe.membership_id, &probe.membership) {
        (Some(id), Some(snapshot)) => {
            if !json {
                println!("[members] updating {}", config.membership_set_name);
            }
            let outcome = reconcile_membership(&mut store, id, snapshot, &probe.plan);
            if !json {
                let state = if outcome.ok { "ok" } else { "FAILED" };
                println!("  [{state}] {}", outcome.detail);
            }
            Some(outcome)
        }
        _ => {
            if !json {
                println!(
                    "[members] {} not found, skipped",
                    config.membership_set_name
                );
            }
            None
        }
    };

    // ground truth, re-read regardless of which calls failed above
    let final_rules = match &probe.rule_set_id {
        Some(id) => Some(store.read_rules(id).with_context(|| {
            format!("failed to read back rule set '{}'", config.rule_set_name)
        })?),
        None => None,
    };
    let final_membership = match &probe.membership_id {
        Some(id) => Some(
            store
                .read_set(id)
                .with_context(|| {
                    format!(
                        "failed to read back membership set '{}'",
                        config.membership_set_name
                    )
                })?
                .addresses,
        ),
        None => None,
    };

    let report = RunReport {
        plan: probe.plan,
        backup,
        rule_outcomes,
        membership: membership_outcome,
        final_rules,
        final_membership,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!("=== resulting state ===");
    match &report.final_rules {
        Some(rules) => println!(
            "{}",
            render_rule_set_state(&config.rule_set_name, rules, &report.plan.incoming)
        ),
        None => println!("[rules] {} not found, skipped", config.rule_set_name),
    }
    match &report.final_membership {
        Some(addresses) => println!(
            "{}",
            render_membership_state(&config.membership_set_name, addresses, &report.plan.incoming)
        ),
        None => println!(
            "[members] {} not found, skipped",
            config.membership_set_name
        ),
    }

    let failures = report.partial_failures();
    if failures > 0 {
        println!("done with {failures} partial failures.");
    } else {
        println!("done.");
    }
    Ok(())
}
