//! Sharing rules: which target identity gets which role when the subject
//! belongs to a given source group.
//!
//! Rows arrive as loose string tuples (one spreadsheet row each):
//!
//! ```text
//! source group | target identity | role | [scope type]
//! ```
//!
//! The optional fourth column is `user` or `group` and decides how a new grant
//! is scoped; it defaults to `user`. Extra columns are ignored, blank rows are
//! skipped, and anything else that does not validate rejects the whole table.

use serde::Serialize;
use std::collections::HashMap;

use crate::acl::{normalize_identity, ScopeType};
use crate::error::{AclSyncError, Result};
use crate::role::Role;

/// A single validated sharing rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub source_group: String,
    pub target_identity: String,
    pub role: Role,
    pub scope_type: ScopeType,
}

/// Rules indexed by source group, insertion order preserved within a group.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    by_group: HashMap<String, Vec<Rule>>,
    group_order: Vec<String>,
    len: usize,
}

impl RuleTable {
    /// Validate and index rule rows.
    ///
    /// # Errors
    /// Returns `AclSyncError::MalformedRule` for the first row that has fewer
    /// than three fields, an empty group or target, an unknown role, or a
    /// scope type other than `user`/`group`.
    pub fn load<R, S>(rows: impl IntoIterator<Item = R>) -> Result<RuleTable>
    where
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = RuleTable::default();

        for (index, row) in rows.into_iter().enumerate() {
            let fields: Vec<String> = row
                .into_iter()
                .map(|field| field.as_ref().trim().to_string())
                .collect();

            if fields.iter().all(|f| f.is_empty()) {
                continue;
            }

            let rule = parse_row(&fields).map_err(|reason| AclSyncError::MalformedRule {
                row: index + 1,
                reason,
            })?;
            table.insert(rule);
        }

        Ok(table)
    }

    fn insert(&mut self, rule: Rule) {
        let group = rule.source_group.clone();
        match self.by_group.get_mut(&group) {
            Some(rules) => rules.push(rule),
            None => {
                self.group_order.push(group.clone());
                self.by_group.insert(group, vec![rule]);
            }
        }
        self.len += 1;
    }

    /// Rules whose source group is `group`, in insertion order.
    pub fn rules_for_group(&self, group: &str) -> &[Rule] {
        self.by_group
            .get(&normalize_identity(group))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Source groups in first-seen order.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.group_order.iter().map(String::as_str)
    }

    /// Every rule, grouped by source group in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.group_order
            .iter()
            .flat_map(|group| self.by_group[group].iter())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn parse_row(fields: &[String]) -> std::result::Result<Rule, String> {
    if fields.len() < 3 {
        return Err(format!("expected at least 3 fields, found {}", fields.len()));
    }
    if fields[0].is_empty() {
        return Err("source group is empty".to_string());
    }
    if fields[1].is_empty() {
        return Err("target identity is empty".to_string());
    }

    let role = fields[2].parse::<Role>().map_err(|e| e.to_string())?;

    let scope_type = match fields.get(3).map(|s| s.to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("user") => ScopeType::User,
        Some("group") => ScopeType::Group,
        Some(other) => {
            return Err(format!(
                "unsupported scope type '{other}' (expected user or group)"
            ))
        }
    };

    Ok(Rule {
        source_group: normalize_identity(&fields[0]),
        target_identity: normalize_identity(&fields[1]),
        role,
        scope_type,
    })
}
