//! The reconciliation engine: derive, fetch, diff, apply, report.

use chrono::Utc;

use crate::acl::{normalize_identity, AclStore};
use crate::desired;
use crate::error::{AclSyncError, Result};
use crate::membership::MembershipSet;
use crate::plan::{self, ActionKind, PlannedAction};
use crate::report::{ActionRecord, Outcome, ReconciliationReport};
use crate::rules::RuleTable;
use crate::source::{MembershipSource, RuleSource};

/// Converges one subject's calendar ACL to the state implied by the rules.
///
/// Holds no state between runs; one `Reconciler` can serve any number of
/// subjects, sequentially or from several threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    dry_run: bool,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute and report the plan without mutating the store.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Reconcile `subject`'s calendar ACL against `membership` × `rules`.
    ///
    /// Writes happen in plan order: adds, then updates, then removes. A failed
    /// write is recorded on its action and the run continues. The subject's
    /// own `user` entry is never modified or removed.
    ///
    /// # Errors
    /// Returns `AclSyncError::AclFetch` if the live ACL cannot be read before
    /// diffing. Failures of the post-run read only end up in the report.
    pub fn reconcile<S>(
        &self,
        subject: &str,
        membership: &MembershipSet,
        rules: &RuleTable,
        store: &mut S,
    ) -> Result<ReconciliationReport>
    where
        S: AclStore + ?Sized,
    {
        let subject = normalize_identity(subject);
        let started_at = Utc::now();

        let desired = desired::derive(&subject, membership, rules);
        let before = store.list(&subject).map_err(as_fetch_error)?;
        let plan = plan::diff(&subject, &desired, &before);

        tracing::debug!(
            subject = %subject,
            desired = desired.len(),
            live = before.len(),
            actions = plan.actions.len(),
            "computed reconciliation plan"
        );

        let actions: Vec<ActionRecord> = plan
            .actions
            .iter()
            .map(|action| {
                let outcome = self.apply(&subject, action, store);
                ActionRecord::new(action, outcome)
            })
            .collect();

        let (after, after_error) = match store.list(&subject) {
            Ok(entries) => (Some(entries), None),
            Err(e) => {
                tracing::warn!(subject = %subject, error = %e, "could not read ACL after reconciliation");
                (None, Some(e.to_string()))
            }
        };

        Ok(ReconciliationReport {
            subject,
            dry_run: self.dry_run,
            started_at,
            finished_at: Utc::now(),
            before,
            after,
            after_error,
            preserved: plan.preserved,
            actions,
        })
    }

    /// Read membership and rules from their sources, then [`reconcile`](Self::reconcile).
    ///
    /// Each source is read exactly once. A malformed rule table fails the run
    /// before the store is touched.
    pub fn run<M, R, S>(
        &self,
        subject: &str,
        membership_source: &M,
        rule_source: &R,
        rules_locator: &str,
        store: &mut S,
    ) -> Result<ReconciliationReport>
    where
        M: MembershipSource + ?Sized,
        R: RuleSource + ?Sized,
        S: AclStore + ?Sized,
    {
        let groups = membership_source.list_groups(subject).map_err(|e| match e {
            AclSyncError::MembershipFetch(_) => e,
            other => AclSyncError::MembershipFetch(other.to_string()),
        })?;
        let rows = rule_source.list_rules(rules_locator).map_err(|e| match e {
            AclSyncError::RuleFetch(_) => e,
            other => AclSyncError::RuleFetch(other.to_string()),
        })?;

        let rules = RuleTable::load(rows)?;
        let membership = MembershipSet::from_external(groups);

        tracing::info!(
            subject,
            groups = membership.len(),
            rules = rules.len(),
            "loaded membership and rules"
        );

        self.reconcile(subject, &membership, &rules, store)
    }

    fn apply<S>(&self, subject: &str, action: &PlannedAction, store: &mut S) -> Outcome
    where
        S: AclStore + ?Sized,
    {
        if !action.kind.is_change() {
            return Outcome::Unchanged;
        }
        if self.dry_run {
            return Outcome::Planned;
        }

        let result = match (action.kind, action.entry_id.as_deref(), action.after) {
            (ActionKind::Add, _, Some(role)) => store
                .add(subject, action.scope_type, &action.identity, role)
                .map(|_| ()),
            (ActionKind::Update, Some(id), Some(role)) => {
                store.update(subject, id, role).map(|_| ())
            }
            (ActionKind::Remove, Some(id), _) => store.remove(subject, id),
            _ => Err(AclSyncError::AclWrite(format!(
                "incomplete {} action for {}",
                action.kind, action.identity
            ))),
        };

        match result {
            Ok(()) => {
                tracing::info!(
                    subject,
                    action = %action.kind,
                    identity = %action.identity,
                    role = ?action.after,
                    "applied ACL change"
                );
                Outcome::Applied
            }
            Err(e) => {
                tracing::warn!(
                    subject,
                    action = %action.kind,
                    identity = %action.identity,
                    error = %e,
                    "ACL change failed"
                );
                Outcome::Failed(e.to_string())
            }
        }
    }
}

fn as_fetch_error(e: AclSyncError) -> AclSyncError {
    match e {
        AclSyncError::AclFetch(_) => e,
        other => AclSyncError::AclFetch(other.to_string()),
    }
}
