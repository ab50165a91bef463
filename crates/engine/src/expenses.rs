//! Expenses and the draft used to create them.
//!
//! An expense is created together with its derived per-person share and is
//! immutable afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Group, MoneyCents, ResultEngine, UserId,
    split::{compute_split, ensure_unique, split_between},
};

/// A shared expense paid by one member and split evenly between
/// `split_between`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub group_id: Uuid,
    pub description: String,
    pub amount: MoneyCents,
    pub paid_by: UserId,
    pub split_between: Vec<UserId>,
    /// Floor share of `amount`. Some participants may owe one cent more, see
    /// [`Expense::shares`].
    pub amount_per_person: MoneyCents,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Exact share owed by each participant, in `split_between` order.
    pub fn shares(&self) -> ResultEngine<Vec<(UserId, MoneyCents)>> {
        split_between(self.amount, &self.split_between)
    }
}

/// User input for a new expense, not validated yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: MoneyCents,
    pub paid_by: UserId,
    pub split_between: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl ExpenseDraft {
    /// A draft split between every member of `group`, which is what the
    /// expense form preselects.
    pub fn split_with_all(
        group: &Group,
        description: &str,
        amount: MoneyCents,
        paid_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            description: description.to_string(),
            amount,
            paid_by,
            split_between: group.members.clone(),
            created_at,
        }
    }

    /// A draft from the amount as typed in the expense form, e.g. `"150,75"`
    /// or `"$89.50"`.
    ///
    /// Fails with [`EngineError::InvalidAmount`] when the text is not a
    /// money amount. The rest is validated by [`ExpenseDraft::into_expense`].
    pub fn from_form(
        description: &str,
        amount_text: &str,
        paid_by: UserId,
        split_between: Vec<UserId>,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        Ok(Self {
            description: description.to_string(),
            amount: amount_text.parse()?,
            paid_by,
            split_between,
            created_at,
        })
    }

    /// Validates the draft against `group` and builds the expense.
    ///
    /// Errors are user-correctable: [`EngineError::InvalidExpense`] for an
    /// empty description, a non-positive amount, an empty split set or a
    /// payer/participant outside the group, and
    /// [`EngineError::DuplicateParticipant`] for a repeated participant.
    pub fn into_expense(self, group: &Group) -> ResultEngine<Expense> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(EngineError::InvalidExpense(
                "description must not be empty".to_string(),
            ));
        }
        if self.split_between.is_empty() {
            return Err(EngineError::InvalidExpense(
                "select at least one participant".to_string(),
            ));
        }
        ensure_unique(&self.split_between, "participant")?;
        if !group.is_member(&self.paid_by) {
            return Err(EngineError::InvalidExpense(format!(
                "payer {} is not a member of group {}",
                self.paid_by, group.name
            )));
        }
        if let Some(outsider) = self.split_between.iter().find(|id| !group.is_member(id)) {
            return Err(EngineError::InvalidExpense(format!(
                "participant {outsider} is not a member of group {}",
                group.name
            )));
        }

        let split = compute_split(self.amount, self.split_between.len())?;

        Ok(Expense {
            id: Uuid::new_v4(),
            group_id: group.id,
            description: description.to_string(),
            amount: self.amount,
            paid_by: self.paid_by,
            split_between: self.split_between,
            amount_per_person: split.floor_share(),
            created_at: self.created_at,
        })
    }
}
