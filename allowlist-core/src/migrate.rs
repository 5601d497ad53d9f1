//! Rule-preserving migration math for the stateful backend.
//!
//! All functions here operate on a single rule snapshot read before any
//! mutation in the run. The snapshot is never refreshed between the removal
//! and addition phases: both are derived from the same stale-but-consistent
//! view, so an addition always mirrors exactly what the removal targeted.

use serde::Serialize;

use crate::plan::MigrationPlan;
use crate::rules::{IngressRule, OriginGrant};

/// Rules to strip for one retiring origin, one backend call per batch.
///
/// An empty `rules` list means "nothing to remove" for that origin and is
/// reported, not treated as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalBatch {
    pub origin: String,
    pub rules: Vec<IngressRule>,
}

/// Reconstructed rules to create for one incoming origin, one call per batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdditionBatch {
    pub origin: String,
    pub rules: Vec<IngressRule>,
}

/// Every rule in the snapshot granting the given origin.
pub fn rules_matching(snapshot: &[IngressRule], origin: &str) -> Vec<IngressRule> {
    snapshot
        .iter()
        .filter(|rule| rule.matches_origin(origin))
        .cloned()
        .collect()
}

/// One removal batch per retiring origin, in input order.
///
/// Duplicate retiring origins yield duplicate batches; the backend's removal
/// must tolerate rules that are already gone.
pub fn removal_batches(snapshot: &[IngressRule], plan: &MigrationPlan) -> Vec<RemovalBatch> {
    plan.retiring
        .iter()
        .map(|origin| RemovalBatch {
            origin: origin.clone(),
            rules: rules_matching(snapshot, origin),
        })
        .collect()
}

/// One addition batch per incoming origin, cloning rule metadata from every
/// retiring origin's matched rules.
///
/// For each matched rule the grant carrying the retiring CIDR is rewritten to
/// the incoming CIDR with its description preserved verbatim; all other
/// grants on the rule are carried over unchanged. Exact duplicate
/// reconstructions (from duplicate retiring tokens) collapse to one.
pub fn addition_batches(snapshot: &[IngressRule], plan: &MigrationPlan) -> Vec<AdditionBatch> {
    plan.incoming
        .iter()
        .map(|incoming| {
            let mut rules: Vec<IngressRule> = Vec::new();
            for retiring in &plan.retiring {
                for matched in rules_matching(snapshot, retiring) {
                    let rebuilt = rebuild_rule(&matched, retiring, incoming);
                    if !rules.contains(&rebuilt) {
                        rules.push(rebuilt);
                    }
                }
            }
            AdditionBatch {
                origin: incoming.clone(),
                rules,
            }
        })
        .collect()
}

fn rebuild_rule(rule: &IngressRule, retiring: &str, incoming: &str) -> IngressRule {
    IngressRule {
        protocol: rule.protocol.clone(),
        from_port: rule.from_port,
        to_port: rule.to_port,
        grants: rule
            .grants
            .iter()
            .map(|grant| {
                if grant.cidr == retiring {
                    OriginGrant {
                        cidr: incoming.to_string(),
                        description: grant.description.clone(),
                    }
                } else {
                    grant.clone()
                }
            })
            .collect(),
    }
}
