//! Users and the directory used to resolve display names.
//!
//! Groups and expenses only ever store a [`UserId`]; names and avatars are
//! looked up here so they never go stale inside other records.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

/// Name shown for an id the directory does not know.
pub const UNKNOWN_USER: &str = "Unknown";

/// Stable, opaque user identifier (the document id in the store).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A user. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            avatar: None,
        }
    }
}

/// Read-only lookup of users by id.
#[derive(Debug, Default, Clone)]
pub struct UserDirectory {
    users: HashMap<UserId, User>,
}

impl UserDirectory {
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
        }
    }

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.get(id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Display name for `id`, or [`UNKNOWN_USER`].
    pub fn display_name(&self, id: &UserId) -> &str {
        self.user(id).map_or(UNKNOWN_USER, |u| u.name.as_str())
    }

    /// Known names joined with `", "`; unknown ids are skipped.
    pub fn member_names<'a>(&self, ids: impl IntoIterator<Item = &'a UserId>) -> String {
        ids.into_iter()
            .filter_map(|id| self.user(id).map(|u| u.name.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Upper-cased first letter of every word (`"John Doe"` -> `"JD"`).
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
