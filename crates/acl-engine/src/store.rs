//! In-memory [`AclStore`] with JSON snapshots in the calendar API's
//! ACL list shape:
//!
//! ```json
//! {"items": [{"id": "user:ops@example.com", "role": "writer",
//!             "scope": {"type": "user", "value": "ops@example.com"}}]}
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::acl::{normalize_identity, AclEntry, AclStore, Scope, ScopeType};
use crate::error::{AclSyncError, Result};
use crate::role::Role;

/// Wire shape of an ACL listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclList {
    #[serde(default)]
    pub items: Vec<AclEntry>,
}

/// Calendar ACLs held in memory, keyed by calendar owner.
#[derive(Debug, Clone, Default)]
pub struct MemoryAclStore {
    calendars: BTreeMap<String, Vec<AclEntry>>,
}

impl MemoryAclStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the ACL of `subject`'s calendar.
    pub fn with_calendar(mut self, subject: &str, entries: Vec<AclEntry>) -> Self {
        self.calendars.insert(normalize_identity(subject), entries);
        self
    }

    /// Load `subject`'s calendar from a JSON ACL listing.
    pub fn from_json(subject: &str, json: &str) -> Result<Self> {
        let list: AclList = serde_json::from_str(json)?;
        Ok(Self::new().with_calendar(subject, list.items))
    }

    /// Serialize `subject`'s calendar as a pretty-printed JSON ACL listing.
    pub fn to_json(&self, subject: &str) -> Result<String> {
        let list = AclList {
            items: self.entries(subject)?.to_vec(),
        };
        Ok(serde_json::to_string_pretty(&list)?)
    }

    pub fn entries(&self, subject: &str) -> Result<&[AclEntry]> {
        self.calendars
            .get(&normalize_identity(subject))
            .map(Vec::as_slice)
            .ok_or_else(|| AclSyncError::AclFetch(format!("no calendar for {subject}")))
    }

    fn entries_mut(&mut self, subject: &str) -> Result<&mut Vec<AclEntry>> {
        self.calendars
            .get_mut(&normalize_identity(subject))
            .ok_or_else(|| AclSyncError::AclWrite(format!("no calendar for {subject}")))
    }
}

/// Entry id in the calendar API convention: `"<type>:<value>"`, or `"default"`.
pub fn entry_id(scope_type: ScopeType, scope_value: &str) -> String {
    match scope_type {
        ScopeType::Default => "default".to_string(),
        other => format!("{}:{}", other, scope_value),
    }
}

impl AclStore for MemoryAclStore {
    fn list(&self, subject: &str) -> Result<Vec<AclEntry>> {
        self.entries(subject).map(<[AclEntry]>::to_vec)
    }

    fn add(
        &mut self,
        subject: &str,
        scope_type: ScopeType,
        scope_value: &str,
        role: Role,
    ) -> Result<AclEntry> {
        let entries = self.entries_mut(subject)?;
        let id = entry_id(scope_type, scope_value);
        if entries.iter().any(|e| e.id == id) {
            return Err(AclSyncError::AclWrite(format!("ACL entry {id} already exists")));
        }

        let entry = AclEntry {
            id,
            scope: Scope::new(scope_type, scope_value),
            role,
        };
        entries.push(entry.clone());
        Ok(entry)
    }

    fn update(&mut self, subject: &str, entry_id: &str, role: Role) -> Result<AclEntry> {
        let entry = self
            .entries_mut(subject)?
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| AclSyncError::AclWrite(format!("no ACL entry {entry_id}")))?;
        entry.role = role;
        Ok(entry.clone())
    }

    fn remove(&mut self, subject: &str, entry_id: &str) -> Result<()> {
        let entries = self.entries_mut(subject)?;
        let before = entries.len();
        entries.retain(|e| e.id != entry_id);
        if entries.len() == before {
            return Err(AclSyncError::AclWrite(format!("no ACL entry {entry_id}")));
        }
        Ok(())
    }
}
