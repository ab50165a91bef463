//! Equal splits of an amount across participants.
//!
//! Division happens in integer cents: everybody gets the floor share and the
//! leftover cents (at most `n - 1`) go one each to the first participants in
//! list order. The shares always add back up to the original amount.

use std::collections::HashSet;

use crate::{EngineError, MoneyCents, ResultEngine, UserId};

/// The result of splitting an amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Split {
    shares: Vec<MoneyCents>,
}

impl Split {
    /// Shares in participant order.
    pub fn shares(&self) -> &[MoneyCents] {
        &self.shares
    }

    /// Smallest share (what every participant owes at least).
    pub fn floor_share(&self) -> MoneyCents {
        self.shares.last().copied().unwrap_or(MoneyCents::ZERO)
    }

    pub fn total(&self) -> MoneyCents {
        self.shares.iter().sum()
    }

    pub fn into_shares(self) -> Vec<MoneyCents> {
        self.shares
    }
}

/// Splits `amount` into `participant_count` shares.
///
/// ```rust
/// use engine::{MoneyCents, compute_split};
///
/// let split = compute_split(MoneyCents::new(100_00), 3).unwrap();
/// assert_eq!(
///     split.shares(),
///     &[MoneyCents::new(33_34), MoneyCents::new(33_33), MoneyCents::new(33_33)]
/// );
/// ```
pub fn compute_split(amount: MoneyCents, participant_count: usize) -> ResultEngine<Split> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidExpense(format!(
            "amount must be > 0, got {amount}"
        )));
    }
    if participant_count == 0 {
        return Err(EngineError::InvalidExpense(
            "at least one participant is required".to_string(),
        ));
    }

    let count = i64::try_from(participant_count).map_err(|_| {
        EngineError::InvalidExpense(format!("too many participants: {participant_count}"))
    })?;
    let base = amount.cents() / count;
    // `remainder < count`, so the cast back to usize cannot truncate.
    let remainder = (amount.cents() % count) as usize;

    let shares = (0..participant_count)
        .map(|idx| {
            if idx < remainder {
                MoneyCents::new(base + 1)
            } else {
                MoneyCents::new(base)
            }
        })
        .collect();

    Ok(Split { shares })
}

/// Splits `amount` across `participants`, pairing each id with its share.
///
/// Fails with [`EngineError::DuplicateParticipant`] when an id repeats.
pub fn split_between(
    amount: MoneyCents,
    participants: &[UserId],
) -> ResultEngine<Vec<(UserId, MoneyCents)>> {
    ensure_unique(participants, "participant")?;
    let split = compute_split(amount, participants.len())?;
    Ok(participants
        .iter()
        .cloned()
        .zip(split.into_shares())
        .collect())
}

/// Rejects lists that mention the same user twice.
pub(crate) fn ensure_unique(ids: &[UserId], label: &str) -> ResultEngine<()> {
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id) {
            return Err(EngineError::DuplicateParticipant(format!(
                "{label} {id} listed more than once"
            )));
        }
    }
    Ok(())
}
