use anyhow::{Context, Result};
use origin_shift::backend::{MembershipBackend, RuleSetBackend};
use origin_shift::config::load_config;
use origin_shift::report::{render_membership_state, render_rule_set_state};
use origin_shift::store::JsonStateStore;

use crate::cli::{OutputFormat, ShowArgs};

pub fn run_show(args: ShowArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let store = JsonStateStore::open(&config.state_file)
        .with_context(|| format!("failed to open state file {}", config.state_file.display()))?;

    let rules = match RuleSetBackend::resolve_name(&store, &config.rule_set_name)? {
        Some(id) => Some(store.read_rules(&id)?),
        None => None,
    };
    let membership = match MembershipBackend::resolve_name(&store, &config.membership_set_name)? {
        Some(id) => Some(store.read_set(&id)?.addresses),
        None => None,
    };

    match args.format {
        OutputFormat::Json => {
            let report = ShowReport { rules, membership };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            match &rules {
                Some(rules) => {
                    println!("{}", render_rule_set_state(&config.rule_set_name, rules, &[]))
                }
                None => println!("[rules] {} not found", config.rule_set_name),
            }
            match &membership {
                Some(addresses) => println!(
                    "{}",
                    render_membership_state(&config.membership_set_name, addresses, &[])
                ),
                None => println!("[members] {} not found", config.membership_set_name),
            }
        }
    }
    Ok(())
}

#[derive(Debug, serde::Serialize)]
struct ShowReport {
    rules: Option<Vec<allowlist_core::IngressRule>>,
    membership: Option<Vec<String>>,
}
