//! The set of groups the subject belongs to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::acl::normalize_identity;

/// A group resource as returned by the directory service. Only the email is
/// used; other fields are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub email: String,
}

impl Group {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// Deduplicated, normalized group identifiers. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MembershipSet {
    groups: BTreeSet<String>,
}

impl MembershipSet {
    pub fn from_external(groups: impl IntoIterator<Item = Group>) -> MembershipSet {
        MembershipSet {
            groups: groups
                .into_iter()
                .map(|g| normalize_identity(&g.email))
                .filter(|email| !email.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, group: &str) -> bool {
        self.groups.contains(&normalize_identity(group))
    }

    /// Groups in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
