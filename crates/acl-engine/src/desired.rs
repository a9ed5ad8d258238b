//! Desired-state derivation: (group memberships × rules) → one grant per target.
//!
//! The result is computed once per run and then only read, by both the diff
//! and the removal audit.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::acl::{normalize_identity, ScopeType};
use crate::membership::MembershipSet;
use crate::role::Role;
use crate::rules::RuleTable;

/// What the live ACL should contain for one target identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesiredGrant {
    pub target_identity: String,
    pub role: Role,
    /// Scope type used if the grant has to be added.
    pub scope_type: ScopeType,
}

/// Desired grants keyed by normalized target identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DesiredSet {
    grants: BTreeMap<String, DesiredGrant>,
}

impl DesiredSet {
    pub fn get(&self, identity: &str) -> Option<&DesiredGrant> {
        self.grants.get(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.grants.contains_key(identity)
    }

    /// Grants in identity order.
    pub fn iter(&self) -> impl Iterator<Item = &DesiredGrant> {
        self.grants.values()
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

/// Derive the desired grants for `subject`.
///
/// Rules targeting the subject are skipped. When several rules name the same
/// target, the most permissive role wins regardless of rule order; on equal
/// roles the first contributing rule (groups in sorted order, rules in table
/// order) keeps its scope type.
pub fn derive(subject: &str, membership: &MembershipSet, rules: &RuleTable) -> DesiredSet {
    let subject = normalize_identity(subject);
    let mut grants: BTreeMap<String, DesiredGrant> = BTreeMap::new();

    for group in membership.iter() {
        for rule in rules.rules_for_group(group) {
            if rule.target_identity == subject {
                tracing::debug!(
                    group,
                    target = %rule.target_identity,
                    "skipping rule that shares the calendar with its owner"
                );
                continue;
            }

            let candidate = DesiredGrant {
                target_identity: rule.target_identity.clone(),
                role: rule.role,
                scope_type: rule.scope_type,
            };

            match grants.get_mut(&rule.target_identity) {
                Some(existing) if candidate.role > existing.role => *existing = candidate,
                Some(_) => {}
                None => {
                    grants.insert(rule.target_identity.clone(), candidate);
                }
            }
        }
    }

    DesiredSet { grants }
}
