//! File-backed collaborators. Each file holds the JSON payload the matching
//! remote API would return, so exports can be fed straight in.

use std::path::{Path, PathBuf};

use acl_engine::{AclSyncError, Group, MembershipSource, Result, RuleSource};
use serde::Deserialize;

/// Directory API `groups.list` response.
#[derive(Debug, Deserialize)]
struct GroupsResponse {
    #[serde(default)]
    groups: Vec<Group>,
}

/// Sheets API `values.get` response.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Group membership read from a `{"groups": [...]}` file.
pub struct GroupsFile {
    path: PathBuf,
}

impl GroupsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MembershipSource for GroupsFile {
    fn list_groups(&self, _subject: &str) -> Result<Vec<Group>> {
        let response: GroupsResponse = read_json(&self.path)
            .map_err(AclSyncError::MembershipFetch)?;
        Ok(response.groups)
    }
}

/// Rule rows read from a `{"values": [[...]]}` file named by the locator.
pub struct RulesFile;

impl RuleSource for RulesFile {
    fn list_rules(&self, locator: &str) -> Result<Vec<Vec<String>>> {
        let range: ValueRange =
            read_json(Path::new(locator)).map_err(AclSyncError::RuleFetch)?;
        Ok(range.values)
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> std::result::Result<T, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {}", path.display(), e))
}
