use allowlist_core::{IngressRule, MembershipSnapshot, MigrationPlan};
use anyhow::{Context, Result};

use crate::backend::{MembershipBackend, RuleSetBackend};

/// Pre-mutation view of both backends.
///
/// `rule_snapshot` is the single read the rule-set migrator works from; it is
/// not refreshed between the removal and addition phases. A `None` id marks
/// that backend unavailable for the whole run.
#[derive(Debug, Clone)]
pub struct Probe {
    pub rule_set_id: Option<String>,
    pub membership_id: Option<String>,
    pub rule_snapshot: Option<Vec<IngressRule>>,
    pub membership: Option<MembershipSnapshot>,
    pub plan: MigrationPlan,
}

/// Resolve both backend names and compute per-origin existence.
///
/// A name that does not resolve degrades that backend to "skipped"; only both
/// missing aborts the run.
pub fn probe_backends<R, M>(
    rules: &R,
    members: &M,
    rule_set_name: &str,
    membership_name: &str,
    retiring: Vec<String>,
    incoming: Vec<String>,
) -> Result<Probe>
where
    R: RuleSetBackend,
    M: MembershipBackend,
{
    let rule_set_id = rules
        .resolve_name(rule_set_name)
        .with_context(|| format!("failed to resolve rule set '{rule_set_name}'"))?;
    let membership_id = members
        .resolve_name(membership_name)
        .with_context(|| format!("failed to resolve membership set '{membership_name}'"))?;

    let rule_snapshot = match &rule_set_id {
        Some(id) => Some(
            rules
                .read_rules(id)
                .with_context(|| format!("failed to read rule set '{rule_set_name}'"))?,
        ),
        None => None,
    };
    let membership = match &membership_id {
        Some(id) => Some(
            members
                .read_set(id)
                .with_context(|| format!("failed to read membership set '{membership_name}'"))?,
        ),
        None => None,
    };

    let plan = MigrationPlan::build(
        retiring,
        incoming,
        rule_snapshot.as_deref(),
        membership.as_ref(),
    )
    .with_context(|| {
        format!("neither '{rule_set_name}' nor '{membership_name}' was found")
    })?;

    Ok(Probe {
        rule_set_id,
        membership_id,
        rule_snapshot,
        membership,
        plan,
    })
}
