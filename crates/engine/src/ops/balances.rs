use uuid::Uuid;

use crate::{GroupBalance, MoneyCents, Repository, ResultEngine, aggregate};

use super::Engine;

impl<R: Repository> Engine<R> {
    /// Aggregates the stored expenses of a group on demand.
    pub async fn group_balance(&self, group_id: Uuid) -> ResultEngine<GroupBalance> {
        let group = self.repository.group(group_id).await?;
        let expenses = self.repository.expenses(group_id).await?;
        aggregate(&group, &expenses)
    }

    /// Recomputes the denormalized total of a group from its stored expenses
    /// and writes it back when it drifted.
    ///
    /// The total is never incremented from an in-memory value, so concurrent
    /// writers cannot lose each other's updates.
    pub async fn refresh_total(&self, group_id: Uuid) -> ResultEngine<MoneyCents> {
        let group = self.repository.group(group_id).await?;
        let expenses = self.repository.expenses(group_id).await?;
        let balance = aggregate(&group, &expenses)?;

        if balance.total_expenses != group.total_expenses {
            self.repository
                .update_group_total(group_id, balance.total_expenses)
                .await?;
            tracing::debug!(
                group_id = %group_id,
                previous = %group.total_expenses,
                total = %balance.total_expenses,
                "group total refreshed"
            );
        }

        Ok(balance.total_expenses)
    }
}
