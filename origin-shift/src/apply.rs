//! Mutation drivers for both backends.
//!
//! Each backend applies its half of the change independently. Per-origin
//! failures on the stateful side and a stale token on the flat side are
//! recorded in the outcome and the run keeps going; "completed with partial
//! failures" is the normal terminal state, not an error path.

use allowlist_core::{
    addition_batches, reconcile, removal_batches, IngressRule, MembershipSnapshot, MigrationPlan,
};
use serde::Serialize;

use crate::backend::{MembershipBackend, RuleSetBackend};

/// Result of one removal or addition call for one origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OriginOutcome {
    pub origin: String,
    pub action: String,
    pub rules: usize,
    pub ok: bool,
    pub detail: String,
}

/// Result of the flat backend's single replace call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipOutcome {
    pub ok: bool,
    pub detail: String,
    pub removed: Vec<String>,
    pub added: Vec<String>,
    /// Full resulting member list, sorted; what the backend holds on success.
    pub resulting: Vec<String>,
}

/// Remove retiring rules, then recreate their metadata under each incoming
/// origin, all derived from the single pre-mutation snapshot.
///
/// One backend call per origin per phase. A failed call is recorded and the
/// remaining origins are still processed.
pub fn migrate_rule_set(
    backend: &mut impl RuleSetBackend,
    id: &str,
    snapshot: &[IngressRule],
    plan: &MigrationPlan,
) -> Vec<OriginOutcome> {
    let mut outcomes = Vec::new();

    for batch in removal_batches(snapshot, plan) {
        if batch.rules.is_empty() {
            outcomes.push(outcome(&batch.origin, "remove", 0, true, "nothing to remove"));
            continue;
        }
        let count = batch.rules.len();
        match backend.remove_rules(id, &batch.rules) {
            Ok(()) => outcomes.push(outcome(
                &batch.origin,
                "remove",
                count,
                true,
                &format!("removed {count} rules"),
            )),
            Err(err) => outcomes.push(outcome(
                &batch.origin,
                "remove",
                count,
                false,
                &err.to_string(),
            )),
        }
    }

    for batch in addition_batches(snapshot, plan) {
        if batch.rules.is_empty() {
            outcomes.push(outcome(&batch.origin, "add", 0, true, "nothing to add"));
            continue;
        }
        let count = batch.rules.len();
        match backend.add_rules(id, &batch.rules) {
            Ok(()) => outcomes.push(outcome(
                &batch.origin,
                "add",
                count,
                true,
                &format!("added {count} rules"),
            )),
            Err(err) => outcomes.push(outcome(
                &batch.origin,
                "add",
                count,
                false,
                &err.to_string(),
            )),
        }
    }

    outcomes
}

/// Reconcile the membership set in one replace call under the snapshot's
/// lock token. No retry on a stale token.
pub fn reconcile_membership(
    backend: &mut impl MembershipBackend,
    id: &str,
    snapshot: &MembershipSnapshot,
    plan: &MigrationPlan,
) -> MembershipOutcome {
    let change = reconcile(snapshot, plan);

    if change.is_noop() {
        return MembershipOutcome {
            ok: true,
            detail: "nothing to remove, nothing to add".to_string(),
            removed: change.removed,
            added: change.added,
            resulting: change.resulting,
        };
    }

    match backend.replace_set(id, &change.resulting, &snapshot.lock_token) {
        Ok(()) => MembershipOutcome {
            ok: true,
            detail: format!(
                "removed {}, added {}",
                change.removed.len(),
                change.added.len()
            ),
            removed: change.removed,
            added: change.added,
            resulting: change.resulting,
        },
        Err(err) => MembershipOutcome {
            ok: false,
            detail: err.to_string(),
            removed: change.removed,
            added: change.added,
            resulting: change.resulting,
        },
    }
}

fn outcome(origin: &str, action: &str, rules: usize, ok: bool, detail: &str) -> OriginOutcome {
    OriginOutcome {
        origin: origin.to_string(),
        action: action.to_string(),
        rules,
        ok,
        detail: detail.to_string(),
    }
}
