//! Local cache of one group and its derived balances.
//!
//! The cache is refreshed from whole snapshots only: each delivery replaces
//! the expense list and recomputes the balance through
//! [`aggregate`](crate::aggregate). Nothing is merged incrementally.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::{EngineError, Expense, Group, GroupBalance, ResultEngine, aggregate};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupCache {
    group: Group,
    /// Ordered by `(created_at, id)`.
    expenses: Vec<Expense>,
    balance: GroupBalance,
}

impl GroupCache {
    pub fn new(group: Group) -> Self {
        let balance = GroupBalance::empty(&group);
        Self {
            group,
            expenses: Vec::new(),
            balance,
        }
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn balance(&self) -> &GroupBalance {
        &self.balance
    }

    /// `true` when the group's stored total agrees with the expenses.
    pub fn total_matches_group(&self) -> bool {
        self.group.total_expenses == self.balance.total_expenses
    }

    /// Replaces the cached expenses with `snapshot`.
    ///
    /// Records repeated by the feed collapse into one; two different records
    /// sharing an id fail with [`EngineError::InconsistentData`]. On any
    /// error the previous state is kept.
    pub fn apply_snapshot(&mut self, snapshot: Vec<Expense>) -> ResultEngine<&GroupBalance> {
        let expenses = dedupe(snapshot)?;
        let balance = aggregate(&self.group, &expenses)?;
        tracing::debug!(
            group_id = %self.group.id,
            expenses = expenses.len(),
            total = %balance.total_expenses,
            "group cache refreshed"
        );
        self.expenses = expenses;
        self.balance = balance;
        Ok(&self.balance)
    }

    /// Replaces the group record (for instance after its total was
    /// refreshed) and recomputes the balance against it.
    pub fn refresh_group(&mut self, group: Group) -> ResultEngine<&GroupBalance> {
        if group.id != self.group.id {
            return Err(EngineError::InconsistentData(format!(
                "cache holds group {}, got {}",
                self.group.id, group.id
            )));
        }
        self.balance = aggregate(&group, &self.expenses)?;
        self.group = group;
        Ok(&self.balance)
    }
}

fn dedupe(snapshot: Vec<Expense>) -> ResultEngine<Vec<Expense>> {
    let mut by_id: BTreeMap<Uuid, Expense> = BTreeMap::new();
    for expense in snapshot {
        match by_id.get(&expense.id) {
            Some(existing) if *existing != expense => {
                return Err(EngineError::InconsistentData(format!(
                    "feed delivered two different records for expense {}",
                    expense.id
                )));
            }
            Some(_) => {}
            None => {
                by_id.insert(expense.id, expense);
            }
        }
    }

    let mut expenses: Vec<Expense> = by_id.into_values().collect();
    expenses.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    Ok(expenses)
}
