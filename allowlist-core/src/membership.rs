use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::plan::MigrationPlan;

/// Point-in-time view of the flat backend: members plus the concurrency
/// token that must be presented unmodified on the next mutating call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipSnapshot {
    pub addresses: Vec<String>,
    pub lock_token: String,
}

impl MembershipSnapshot {
    pub fn contains(&self, cidr: &str) -> bool {
        self.addresses.iter().any(|member| member == cidr)
    }
}

/// Result of reconciling a membership snapshot against a migration plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipChange {
    /// Full resulting member list, sorted.
    pub resulting: Vec<String>,
    pub removed: Vec<String>,
    pub added: Vec<String>,
}

impl MembershipChange {
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Compute the post-migration membership set.
///
/// Retiring origins are removed only when the plan confirmed them present;
/// incoming origins are added unconditionally (set semantics make repeats a
/// no-op). The caller submits `resulting` with the snapshot's token in a
/// single replace call.
pub fn reconcile(snapshot: &MembershipSnapshot, plan: &MigrationPlan) -> MembershipChange {
    let mut members: BTreeSet<String> = snapshot.addresses.iter().cloned().collect();

    let mut removed = Vec::new();
    for origin in &plan.retiring {
        if plan.flat_exists.get(origin).copied().unwrap_or(false) && members.remove(origin) {
            removed.push(origin.clone());
        }
    }

    let mut added = Vec::new();
    for origin in &plan.incoming {
        if members.insert(origin.clone()) {
            added.push(origin.clone());
        }
    }

    MembershipChange {
        resulting: members.into_iter().collect(),
        removed,
        added,
    }
}
