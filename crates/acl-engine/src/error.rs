//! Error types for acl-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AclSyncError {
    /// A rule row could not be turned into a [`crate::rules::Rule`].
    /// `row` is 1-based, matching spreadsheet row numbers.
    #[error("Malformed rule at row {row}: {reason}")]
    MalformedRule { row: usize, reason: String },

    #[error("Failed to fetch calendar ACL: {0}")]
    AclFetch(String),

    #[error("Failed to write calendar ACL: {0}")]
    AclWrite(String),

    #[error("Failed to fetch group membership: {0}")]
    MembershipFetch(String),

    #[error("Failed to fetch sharing rules: {0}")]
    RuleFetch(String),

    #[error("Invalid ACL snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AclSyncError>;
