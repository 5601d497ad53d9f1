//! Dual-backend allow-list rotation.
//!
//! Replaces a set of retiring origins with a set of incoming origins across
//! two independently addressed access-control backends: a stateful ingress
//! rule set (rules keyed by protocol/port, each carrying origin grants with
//! descriptions) and a flat membership set guarded by an optimistic lock
//! token. Rule metadata attached to a retiring origin is cloned verbatim onto
//! every incoming origin.
//!
//! A run is sequential and deliberately non-transactional:
//!
//! 1. Parse and validate both origin lists ([`allowlist_core::origin`])
//! 2. [`probe`] both backends for availability and per-origin existence
//! 3. [`confirm`] the plan with the operator
//! 4. [`backup`] current state, best effort
//! 5. [`apply`] each backend's half of the change, isolating failures
//! 6. Read back and [`report`] ground truth per backend
//!
//! The two backends are updated as independent sagas. A failure on one side
//! never rolls back the other; partial application is an expected, visible
//! terminal state. The only cross-process guard is the flat backend's lock
//! token, which turns a concurrent external write into a hard failure for
//! that backend's update.
//!
//! Backends are consumed through the [`backend`] traits; [`store`] provides
//! the JSON-file state store the CLI runs against.

pub mod apply;
pub mod backend;
pub mod backup;
pub mod config;
pub mod confirm;
pub mod probe;
pub mod report;
pub mod store;
