//! JSON-file state store implementing both backend contracts.
//!
//! One document per region: named rule sets and named membership sets. Each
//! mutating call persists the document before returning, so every call is as
//! durable as the remote request it stands in for.

use std::fs;
use std::path::{Path, PathBuf};

use allowlist_core::{IngressRule, MembershipSnapshot};
use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, MembershipBackend, RuleSetBackend};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateDoc {
    pub region: String,
    #[serde(default)]
    pub rule_sets: Vec<RuleSetEntry>,
    #[serde(default)]
    pub membership_sets: Vec<MembershipSetEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSetEntry {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub rules: Vec<IngressRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipSetEntry {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub addresses: Vec<String>,
    pub lock_token: String,
}

pub struct JsonStateStore {
    path: PathBuf,
    doc: StateDoc,
}

impl JsonStateStore {
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        let raw = fs::read_to_string(path)?;
        let doc: StateDoc = serde_json::from_str(&raw)?;
        Ok(JsonStateStore {
            path: path.to_path_buf(),
            doc,
        })
    }

    pub fn region(&self) -> &str {
        &self.doc.region
    }

    fn persist(&self) -> Result<(), BackendError> {
        let raw = serde_json::to_string_pretty(&self.doc)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    fn rule_set(&self, id: &str) -> Result<&RuleSetEntry, BackendError> {
        self.doc
            .rule_sets
            .iter()
            .find(|entry| entry.id == id)
            .ok_or(BackendError::NotFound {
                kind: "rule set",
                id: id.to_string(),
            })
    }

    fn rule_set_mut(&mut self, id: &str) -> Result<&mut RuleSetEntry, BackendError> {
        self.doc
            .rule_sets
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(BackendError::NotFound {
                kind: "rule set",
                id: id.to_string(),
            })
    }

    fn membership_set(&self, id: &str) -> Result<&MembershipSetEntry, BackendError> {
        self.doc
            .membership_sets
            .iter()
            .find(|entry| entry.id == id)
            .ok_or(BackendError::NotFound {
                kind: "membership set",
                id: id.to_string(),
            })
    }
}

impl RuleSetBackend for JsonStateStore {
    fn resolve_name(&self, name: &str) -> Result<Option<String>, BackendError> {
        Ok(self
            .doc
            .rule_sets
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.id.clone()))
    }

    fn read_rules(&self, id: &str) -> Result<Vec<IngressRule>, BackendError> {
        Ok(self.rule_set(id)?.rules.clone())
    }

    fn remove_rules(&mut self, id: &str, rules: &[IngressRule]) -> Result<(), BackendError> {
        let entry = self.rule_set_mut(id)?;
        entry.rules.retain(|rule| !rules.contains(rule));
        self.persist()
    }

    fn add_rules(&mut self, id: &str, rules: &[IngressRule]) -> Result<(), BackendError> {
        if let Some(rule) = rules.iter().find(|rule| rule.grants.is_empty()) {
            return Err(BackendError::Rejected(format!(
                "rule {} {} has no grants",
                rule.protocol,
                rule.port_label()
            )));
        }
        let entry = self.rule_set_mut(id)?;
        for rule in rules {
            if !entry.rules.contains(rule) {
                entry.rules.push(rule.clone());
            }
        }
        self.persist()
    }
}

impl MembershipBackend for JsonStateStore {
    fn resolve_name(&self, name: &str) -> Result<Option<String>, BackendError> {
        // linear scan, mirroring a list-then-match lookup
        Ok(self
            .doc
            .membership_sets
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.id.clone()))
    }

    fn read_set(&self, id: &str) -> Result<MembershipSnapshot, BackendError> {
        let entry = self.membership_set(id)?;
        Ok(MembershipSnapshot {
            addresses: entry.addresses.clone(),
            lock_token: entry.lock_token.clone(),
        })
    }

    fn replace_set(
        &mut self,
        id: &str,
        addresses: &[String],
        lock_token: &str,
    ) -> Result<(), BackendError> {
        let entry = self
            .doc
            .membership_sets
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(BackendError::NotFound {
                kind: "membership set",
                id: id.to_string(),
            })?;
        if entry.lock_token != lock_token {
            return Err(BackendError::StaleToken);
        }
        entry.addresses = addresses.to_vec();
        entry.lock_token = next_token(lock_token);
        self.persist()
    }
}

fn next_token(current: &str) -> String {
    let n: u64 = current.parse().unwrap_or(0);
    (n + 1).to_string()
}
