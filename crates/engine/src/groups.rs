//! The module contains the `Group` struct and its implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents, ResultEngine, UserId, split::ensure_unique,
    util::normalize_optional_text,
};

/// A group of users sharing expenses.
///
/// Members are fixed at creation. `total_expenses` is a denormalized copy of
/// the sum of the group's expense amounts; it is only ever refreshed from
/// [`aggregate`](crate::aggregate), never incremented by hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub members: Vec<UserId>,
    #[serde(default)]
    pub total_expenses: MoneyCents,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Builds a new, empty group after validating its fields.
    ///
    /// - `name` is trimmed and must not be empty.
    /// - `members` must contain at least one id and no duplicates.
    pub fn new(
        name: &str,
        description: Option<&str>,
        members: Vec<UserId>,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidExpense(
                "group name must not be empty".to_string(),
            ));
        }
        if members.is_empty() {
            return Err(EngineError::InvalidExpense(
                "a group needs at least one member".to_string(),
            ));
        }
        ensure_unique(&members, "member")?;

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: normalize_optional_text(description),
            members,
            total_expenses: MoneyCents::ZERO,
            created_at,
        })
    }

    pub fn is_member(&self, user: &UserId) -> bool {
        self.members.contains(user)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
