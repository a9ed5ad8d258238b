//! Diff between the desired set and the live ACL.
//!
//! Live entries split into *preserved* entries, which reconciliation never
//! touches (the subject's own `user` entry plus `domain`/`default` scopes), and
//! *manageable* `user`/`group` entries. Manageable entries are grouped by
//! scope value and each group is matched to at most one desired grant.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::acl::{normalize_identity, AclEntry, ScopeType};
use crate::desired::{DesiredGrant, DesiredSet};
use crate::role::Role;

/// Kind of change for one identity. Declaration order is plan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Add,
    Update,
    NoOp,
    Remove,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Add => "add",
            ActionKind::Update => "update",
            ActionKind::NoOp => "no-op",
            ActionKind::Remove => "remove",
        }
    }

    /// Whether the action mutates the store.
    pub fn is_change(self) -> bool {
        self != ActionKind::NoOp
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedAction {
    pub kind: ActionKind,
    /// Normalized scope value the action applies to.
    pub identity: String,
    pub scope_type: ScopeType,
    /// Live entry being updated, kept or removed. `None` for adds.
    pub entry_id: Option<String>,
    pub before: Option<Role>,
    pub after: Option<Role>,
}

/// The ordered set of actions that converges live state to desired state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub actions: Vec<PlannedAction>,
    /// Live entries excluded from reconciliation.
    pub preserved: Vec<AclEntry>,
}

impl Plan {
    pub fn of_kind(&self, kind: ActionKind) -> impl Iterator<Item = &PlannedAction> {
        self.actions.iter().filter(move |a| a.kind == kind)
    }

    /// True when applying the plan would not change anything.
    pub fn is_converged(&self) -> bool {
        self.actions.iter().all(|a| !a.kind.is_change())
    }
}

/// Compute the plan for `subject`.
///
/// Actions come out as adds, updates, no-ops, then removes, each group sorted
/// by identity. When several manageable entries carry the same desired value,
/// one is kept and the rest are removed. The kept entry is the first that
/// already has the desired role, else the first with the grant's scope type,
/// else the first in live order.
pub fn diff(subject: &str, desired: &DesiredSet, live: &[AclEntry]) -> Plan {
    let mut preserved = Vec::new();
    let mut by_identity: HashMap<String, Vec<&AclEntry>> = HashMap::new();
    let mut identities: Vec<String> = Vec::new();

    for entry in live {
        if entry.is_self_entry(subject) || !entry.scope.scope_type.is_manageable() {
            preserved.push(entry.clone());
            continue;
        }

        let identity = normalize_identity(&entry.scope.value);
        by_identity
            .entry(identity.clone())
            .or_insert_with(|| {
                identities.push(identity.clone());
                Vec::new()
            })
            .push(entry);
    }

    let mut actions = Vec::new();

    for identity in &identities {
        let entries = &by_identity[identity];
        let kept = desired
            .get(identity)
            .map(|grant| (grant, kept_entry(grant, entries)));

        for (index, entry) in entries.iter().enumerate() {
            let action = match kept {
                Some((grant, kept_index)) if kept_index == index => PlannedAction {
                    kind: if grant.role == entry.role {
                        ActionKind::NoOp
                    } else {
                        ActionKind::Update
                    },
                    identity: identity.clone(),
                    scope_type: entry.scope.scope_type,
                    entry_id: Some(entry.id.clone()),
                    before: Some(entry.role),
                    after: Some(grant.role),
                },
                _ => PlannedAction {
                    kind: ActionKind::Remove,
                    identity: identity.clone(),
                    scope_type: entry.scope.scope_type,
                    entry_id: Some(entry.id.clone()),
                    before: Some(entry.role),
                    after: None,
                },
            };
            actions.push(action);
        }
    }

    for grant in desired.iter() {
        if !by_identity.contains_key(&grant.target_identity) {
            actions.push(PlannedAction {
                kind: ActionKind::Add,
                identity: grant.target_identity.clone(),
                scope_type: grant.scope_type,
                entry_id: None,
                before: None,
                after: Some(grant.role),
            });
        }
    }

    // Stable, so duplicate removals keep live order.
    actions.sort_by(|a, b| (a.kind, &a.identity).cmp(&(b.kind, &b.identity)));

    Plan { actions, preserved }
}

/// Index of the entry that satisfies `grant` with the fewest writes.
fn kept_entry(grant: &DesiredGrant, entries: &[&AclEntry]) -> usize {
    entries
        .iter()
        .position(|e| e.role == grant.role)
        .or_else(|| {
            entries
                .iter()
                .position(|e| e.scope.scope_type == grant.scope_type)
        })
        .unwrap_or(0)
}
