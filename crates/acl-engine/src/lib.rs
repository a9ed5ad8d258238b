//! # acl-engine
//!
//! Rule-driven reconciliation of calendar sharing permissions.
//!
//! Group membership and a table of sharing rules determine which identities
//! should have which role on a user's primary calendar. The engine derives
//! that desired state, diffs it against the live ACL, and applies the minimal
//! set of adds, updates and removals, recording every outcome in a report.
//! Re-running with unchanged inputs is a no-op, and the calendar owner's own
//! entry is never touched.
//!
//! ## Modules
//!
//! - [`role`] — `Role` and its permissiveness order
//! - [`rules`] — `RuleTable`: rule rows → validated rules indexed by group
//! - [`membership`] — `MembershipSet`: the subject's groups
//! - [`acl`] — live ACL model and the `AclStore` trait
//! - [`source`] — `MembershipSource` / `RuleSource` collaborator traits
//! - [`desired`] — desired-state derivation
//! - [`plan`] — desired vs live diff
//! - [`reconcile`] — `Reconciler`: fetch, diff, apply
//! - [`report`] — `ReconciliationReport`
//! - [`store`] — `MemoryAclStore` with JSON snapshots
//! - [`error`] — Error types

pub mod acl;
pub mod desired;
pub mod error;
pub mod membership;
pub mod plan;
pub mod reconcile;
pub mod report;
pub mod role;
pub mod rules;
pub mod source;
pub mod store;

pub use acl::{normalize_identity, AclEntry, AclStore, Scope, ScopeType};
pub use desired::{derive, DesiredGrant, DesiredSet};
pub use error::{AclSyncError, Result};
pub use membership::{Group, MembershipSet};
pub use plan::{diff, ActionKind, Plan, PlannedAction};
pub use reconcile::Reconciler;
pub use report::{ActionRecord, Outcome, ReconciliationReport, Summary};
pub use role::Role;
pub use rules::{Rule, RuleTable};
pub use source::{MembershipSource, RuleSource};
pub use store::{AclList, MemoryAclStore};
