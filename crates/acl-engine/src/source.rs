//! Read-only collaborators that feed a reconciliation run.

use crate::error::Result;
use crate::membership::Group;

/// Looks up the groups a subject belongs to (directory service).
///
/// Failures should be reported as [`crate::AclSyncError::MembershipFetch`].
pub trait MembershipSource {
    fn list_groups(&self, subject: &str) -> Result<Vec<Group>>;
}

/// Fetches raw rule rows from wherever the rule table lives (a spreadsheet,
/// a file). `locator` is opaque to the engine.
///
/// Failures should be reported as [`crate::AclSyncError::RuleFetch`].
pub trait RuleSource {
    fn list_rules(&self, locator: &str) -> Result<Vec<Vec<String>>>;
}
