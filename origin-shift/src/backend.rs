use allowlist_core::{IngressRule, MembershipSnapshot};
use thiserror::Error;

/// Errors surfaced by backend operations.
///
/// Name resolution misses are not errors; `resolve_name` returns `None` and
/// the run degrades that backend to "skipped". `NotFound` here means a call
/// was made with an id the backend no longer knows.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    /// The presented lock token is stale; another writer changed the set
    /// between read and update.
    #[error("stale lock token: membership set changed since it was read")]
    StaleToken,
    /// The backend refused a rule operation (malformed rule, quota, ...).
    #[error("backend rejected the request: {0}")]
    Rejected(String),
    #[error("state store I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("state store document: {0}")]
    Document(#[from] serde_json::Error),
}

/// Contract for the stateful ingress rule-set backend.
pub trait RuleSetBackend {
    /// Resolve a rule-set name to its id; `None` when absent.
    fn resolve_name(&self, name: &str) -> Result<Option<String>, BackendError>;
    /// Read the full rule set in one call.
    fn read_rules(&self, id: &str) -> Result<Vec<IngressRule>, BackendError>;
    /// Remove the given rules. Rules already gone are ignored.
    fn remove_rules(&mut self, id: &str, rules: &[IngressRule]) -> Result<(), BackendError>;
    /// Add the given rules. Rules already present are ignored.
    fn add_rules(&mut self, id: &str, rules: &[IngressRule]) -> Result<(), BackendError>;
}

/// Contract for the flat membership-set backend.
pub trait MembershipBackend {
    /// Resolve a membership-set name to its id; `None` when absent.
    fn resolve_name(&self, name: &str) -> Result<Option<String>, BackendError>;
    /// Read members and the current lock token.
    fn read_set(&self, id: &str) -> Result<MembershipSnapshot, BackendError>;
    /// Replace the full member list. Fails with [`BackendError::StaleToken`]
    /// when `lock_token` is not the one handed out by the last read.
    fn replace_set(
        &mut self,
        id: &str,
        addresses: &[String],
        lock_token: &str,
    ) -> Result<(), BackendError>;
}
