//! Live ACL model and the store interface the engine reconciles against.
//!
//! The types mirror the calendar API's ACL rule resource
//! (`{"id", "role", "scope": {"type", "value"}}`) so that snapshots can be
//! deserialized directly. An unknown role or scope type fails deserialization
//! instead of leaking into reconciliation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::role::Role;

/// Who an ACL entry grants access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeType {
    User,
    Group,
    Domain,
    Default,
}

impl ScopeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ScopeType::User => "user",
            ScopeType::Group => "group",
            ScopeType::Domain => "domain",
            ScopeType::Default => "default",
        }
    }

    /// Whether entries of this scope type are subject to reconciliation.
    /// Domain-wide and public (default) grants are never touched.
    pub fn is_manageable(self) -> bool {
        matches!(self, ScopeType::User | ScopeType::Group)
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `(type, value)` pair of an ACL entry. `value` is absent for the
/// `default` scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    #[serde(rename = "type")]
    pub scope_type: ScopeType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

impl Scope {
    pub fn new(scope_type: ScopeType, value: impl Into<String>) -> Self {
        Self {
            scope_type,
            value: value.into(),
        }
    }
}

/// One live permission grant on the target calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    /// Opaque, store-assigned. Only used to address updates and removals.
    pub id: String,
    pub scope: Scope,
    pub role: Role,
}

impl AclEntry {
    /// True when this is a `user` entry naming `subject` (compared normalized).
    pub fn is_self_entry(&self, subject: &str) -> bool {
        self.scope.scope_type == ScopeType::User
            && normalize_identity(&self.scope.value) == normalize_identity(subject)
    }
}

/// Canonical form of an identifier: trimmed and lowercased.
///
/// Email addresses are compared case-insensitively by the directory and
/// calendar services, so every identifier entering the engine goes through here.
pub fn normalize_identity(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Read/write access to the ACL of one subject's primary calendar.
///
/// Implementations own transport concerns (authentication, retries, rate
/// limiting). The engine calls `list` once before diffing, once afterwards for
/// the report, and each mutation at most once per differing entry.
pub trait AclStore {
    /// Current ACL entries. Failures should be reported as
    /// [`crate::AclSyncError::AclFetch`].
    fn list(&self, subject: &str) -> Result<Vec<AclEntry>>;

    /// Grant `role` to `(scope_type, scope_value)` and return the stored entry.
    fn add(
        &mut self,
        subject: &str,
        scope_type: ScopeType,
        scope_value: &str,
        role: Role,
    ) -> Result<AclEntry>;

    /// Change the role of an existing entry.
    fn update(&mut self, subject: &str, entry_id: &str, role: Role) -> Result<AclEntry>;

    /// Delete an existing entry.
    fn remove(&mut self, subject: &str, entry_id: &str) -> Result<()>;
}
