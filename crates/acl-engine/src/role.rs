//! Calendar access roles and their permissiveness order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Permission level granted on a calendar.
///
/// Variants are declared from least to most permissive, so the derived
/// `Ord` is the permissiveness order: `FreeBusyReader < Reader < Writer < Owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    FreeBusyReader,
    Reader,
    Writer,
    Owner,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::FreeBusyReader, Role::Reader, Role::Writer, Role::Owner];

    /// Calendar API spelling of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::FreeBusyReader => "freeBusyReader",
            Role::Reader => "reader",
            Role::Writer => "writer",
            Role::Owner => "owner",
        }
    }

    /// The more permissive of two roles.
    pub fn most_permissive(self, other: Role) -> Role {
        self.max(other)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names none of the four roles.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role '{0}' (expected one of: freeBusyReader, reader, writer, owner)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownRole(trimmed.to_string()))
    }
}
