//! The outcome of a reconciliation run, returned as data for a presentation
//! layer to render.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::acl::{AclEntry, ScopeType};
use crate::plan::{ActionKind, PlannedAction};
use crate::role::Role;

/// What happened to a single planned action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum Outcome {
    /// The store accepted the mutation.
    Applied,
    /// No mutation was needed.
    Unchanged,
    /// Dry run: the mutation would have been issued.
    Planned,
    /// The store rejected the mutation; the run carried on.
    Failed(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// A planned action together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRecord {
    pub kind: ActionKind,
    pub identity: String,
    pub scope_type: ScopeType,
    pub before: Option<Role>,
    pub after: Option<Role>,
    pub outcome: Outcome,
}

impl ActionRecord {
    pub(crate) fn new(action: &PlannedAction, outcome: Outcome) -> Self {
        Self {
            kind: action.kind,
            identity: action.identity.clone(),
            scope_type: action.scope_type,
            before: action.before,
            after: action.after,
            outcome,
        }
    }
}

/// Per-kind action counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReport {
    pub subject: String,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Live ACL as read before any mutation.
    pub before: Vec<AclEntry>,
    /// Live ACL as read after the run, if that read succeeded.
    pub after: Option<Vec<AclEntry>>,
    /// Why `after` is missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_error: Option<String>,
    /// Entries reconciliation never touches.
    pub preserved: Vec<AclEntry>,
    /// Actions in the order they were applied.
    pub actions: Vec<ActionRecord>,
}

impl ReconciliationReport {
    /// Counts by kind. Failed actions are counted under `failed` only.
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for record in &self.actions {
            if record.outcome.is_failure() {
                summary.failed += 1;
                continue;
            }
            match record.kind {
                ActionKind::Add => summary.added += 1,
                ActionKind::Update => summary.updated += 1,
                ActionKind::Remove => summary.removed += 1,
                ActionKind::NoOp => summary.unchanged += 1,
            }
        }
        summary
    }

    pub fn has_failures(&self) -> bool {
        self.actions.iter().any(|r| r.outcome.is_failure())
    }

    /// Records for actions that mutate (or would mutate) the store.
    pub fn changes(&self) -> impl Iterator<Item = &ActionRecord> {
        self.actions.iter().filter(|r| r.kind.is_change())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ActionRecord> {
        self.actions.iter().filter(|r| r.outcome.is_failure())
    }
}
