use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::membership::MembershipSnapshot;
use crate::rules::IngressRule;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Neither backend resolved; there is nothing to migrate against.
    #[error("neither backend is available; nothing to do")]
    NothingToDo,
}

/// Everything the run decided before mutating anything.
///
/// Built once from the pre-mutation snapshots, shown to the operator by the
/// confirmation gate, then consumed by the two mutation paths. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationPlan {
    pub retiring: Vec<String>,
    pub incoming: Vec<String>,
    pub stateful_available: bool,
    pub flat_available: bool,
    /// Per retiring origin: does any stateful rule grant it.
    pub stateful_exists: BTreeMap<String, bool>,
    /// Per retiring origin: is it currently a member of the flat set.
    pub flat_exists: BTreeMap<String, bool>,
}

impl MigrationPlan {
    /// Compute per-backend existence of every retiring origin.
    ///
    /// A `None` snapshot marks that backend unavailable; the run proceeds
    /// against the other. Both `None` is an error.
    pub fn build(
        retiring: Vec<String>,
        incoming: Vec<String>,
        rule_snapshot: Option<&[IngressRule]>,
        membership: Option<&MembershipSnapshot>,
    ) -> Result<Self, PlanError> {
        if rule_snapshot.is_none() && membership.is_none() {
            return Err(PlanError::NothingToDo);
        }

        let mut stateful_exists = BTreeMap::new();
        let mut flat_exists = BTreeMap::new();
        for origin in &retiring {
            let in_rules = rule_snapshot
                .map(|rules| rules.iter().any(|rule| rule.matches_origin(origin)))
                .unwrap_or(false);
            let in_set = membership
                .map(|snapshot| snapshot.contains(origin))
                .unwrap_or(false);
            stateful_exists.insert(origin.clone(), in_rules);
            flat_exists.insert(origin.clone(), in_set);
        }

        Ok(MigrationPlan {
            retiring,
            incoming,
            stateful_available: rule_snapshot.is_some(),
            flat_available: membership.is_some(),
            stateful_exists,
            flat_exists,
        })
    }
}
