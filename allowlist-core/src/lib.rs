//! Origin allow-list primitives used by higher-level rotation tools.
//!
//! This crate holds the parts of origin rotation that are independent of any
//! particular backend: CIDR token parsing and validation, the ingress rule
//! data model, the rule-preserving migration math, and membership-set
//! reconciliation. Everything operates on in-memory snapshots; talking to
//! real backends is the caller's concern.

pub mod membership;
pub mod migrate;
pub mod origin;
pub mod plan;
pub mod rules;

pub use membership::{reconcile, MembershipChange, MembershipSnapshot};
pub use migrate::{addition_batches, removal_batches, rules_matching, AdditionBatch, RemovalBatch};
pub use origin::{
    normalize_origin, parse_origin_list, validate_cidr, validate_origin_lists, OriginError,
};
pub use plan::{MigrationPlan, PlanError};
pub use rules::{IngressRule, OriginGrant};
