//! Per-member balances of a group.
//!
//! [`aggregate`] is the single source of truth for a group's total and for
//! who owes what. Every derived number (the denormalized group total, the
//! cache shown to users) is recomputed from it.
//!
//! Sign convention for nets:
//! - positive = the member paid more than their shares, the group owes them
//! - negative = the member owes the group

use std::collections::{BTreeMap, BTreeSet};

use crate::{EngineError, Expense, Group, MoneyCents, ResultEngine, UserId, compute_split};

/// Result of folding a group's expenses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupBalance {
    pub total_expenses: MoneyCents,
    /// Net per member. Every group member has an entry.
    pub per_member_net: BTreeMap<UserId, MoneyCents>,
}

impl GroupBalance {
    /// A zero balance for every member of `group`.
    pub fn empty(group: &Group) -> Self {
        Self {
            total_expenses: MoneyCents::ZERO,
            per_member_net: group
                .members
                .iter()
                .map(|id| (id.clone(), MoneyCents::ZERO))
                .collect(),
        }
    }

    pub fn net_for(&self, user: &UserId) -> MoneyCents {
        self.per_member_net
            .get(user)
            .copied()
            .unwrap_or(MoneyCents::ZERO)
    }

    /// Sum of every net. Zero for any balance built by [`aggregate`].
    pub fn net_sum(&self) -> MoneyCents {
        // Partial sums may leave the i64 range even though the result fits.
        let cents = self
            .per_member_net
            .values()
            .fold(0i64, |acc, net| acc.wrapping_add(net.cents()));
        MoneyCents::new(cents)
    }
}

/// Folds `expenses` into per-member nets and the group total.
///
/// Each expense credits the payer with the full amount and debits every
/// participant (payer included) with their share from
/// [`compute_split`]. Addition is commutative, so the input order does not
/// matter.
///
/// Fails with [`EngineError::InconsistentData`] when an expense belongs to
/// another group, names someone outside `group.members`, or when a net or
/// the total leaves the `i64` range.
pub fn aggregate(group: &Group, expenses: &[Expense]) -> ResultEngine<GroupBalance> {
    let mut balance = GroupBalance::empty(group);

    for expense in expenses {
        ensure_consistent(group, expense)?;

        let overflow = || {
            EngineError::InconsistentData(format!(
                "balances of group {} overflow at expense {}",
                group.id, expense.id
            ))
        };

        let shares = expense.shares()?;
        let payer = balance.per_member_net.entry(expense.paid_by.clone()).or_default();
        *payer = payer.checked_add(expense.amount).ok_or_else(overflow)?;
        for (participant, share) in shares {
            let net = balance.per_member_net.entry(participant).or_default();
            *net = net.checked_sub(share).ok_or_else(overflow)?;
        }

        balance.total_expenses = balance
            .total_expenses
            .checked_add(expense.amount)
            .ok_or_else(overflow)?;
    }

    Ok(balance)
}

fn ensure_consistent(group: &Group, expense: &Expense) -> ResultEngine<()> {
    let problem = if expense.group_id != group.id {
        Some(format!(
            "expense {} belongs to group {}, not {}",
            expense.id, expense.group_id, group.id
        ))
    } else if !group.is_member(&expense.paid_by) {
        Some(format!(
            "expense {} paid by {} who is not a member of group {}",
            expense.id, expense.paid_by, group.id
        ))
    } else {
        expense
            .split_between
            .iter()
            .find(|id| !group.is_member(id))
            .map(|outsider| {
                format!(
                    "expense {} split with {} who is not a member of group {}",
                    expense.id, outsider, group.id
                )
            })
    };

    match problem {
        Some(message) => {
            tracing::warn!(group_id = %group.id, expense_id = %expense.id, "{message}");
            Err(EngineError::InconsistentData(message))
        }
        None => Ok(()),
    }
}

/// Even share of the group's cached total for each member, in member order.
///
/// This is the "per person" figure shown next to a group. A group without
/// expenses yields a zero share for everybody.
pub fn member_shares(group: &Group) -> ResultEngine<Vec<(UserId, MoneyCents)>> {
    if group.total_expenses.is_zero() {
        return Ok(group
            .members
            .iter()
            .map(|id| (id.clone(), MoneyCents::ZERO))
            .collect());
    }
    let split = compute_split(group.total_expenses, group.member_count())?;
    Ok(group
        .members
        .iter()
        .cloned()
        .zip(split.into_shares())
        .collect())
}

/// Figures across every group a user can see.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupsOverview {
    pub group_count: usize,
    pub total_expenses: MoneyCents,
    pub distinct_members: usize,
}

/// Sums the cached totals of `groups` and counts distinct members.
///
/// Fails with [`EngineError::InconsistentData`] when the stored totals
/// overflow.
pub fn overview<'a>(groups: impl IntoIterator<Item = &'a Group>) -> ResultEngine<GroupsOverview> {
    let mut members = BTreeSet::new();
    let mut overview = GroupsOverview::default();
    for group in groups {
        overview.group_count += 1;
        overview.total_expenses = overview
            .total_expenses
            .checked_add(group.total_expenses)
            .ok_or_else(|| {
                EngineError::InconsistentData(format!(
                    "total across groups overflows at group {}",
                    group.id
                ))
            })?;
        members.extend(group.members.iter());
    }
    overview.distinct_members = members.len();
    Ok(overview)
}
