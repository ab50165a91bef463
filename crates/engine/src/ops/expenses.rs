use uuid::Uuid;

use crate::{Expense, ExpenseDraft, Repository, ResultEngine};

use super::Engine;

impl<R: Repository> Engine<R> {
    /// Validates, splits and stores a new expense, then refreshes the group
    /// total from the stored expense set.
    ///
    /// - Validation errors are returned before anything is written.
    /// - If the expense write fails nothing is committed.
    /// - If only the total refresh fails the expense stays stored; the error
    ///   is logged and the total is fixed by the next
    ///   [`refresh_total`](Engine::refresh_total).
    pub async fn add_expense(&self, group_id: Uuid, draft: ExpenseDraft) -> ResultEngine<Expense> {
        let group = self.repository.group(group_id).await?;
        let expense = draft.into_expense(&group)?;

        self.repository.create_expense(&expense).await?;
        tracing::debug!(
            group_id = %group_id,
            expense_id = %expense.id,
            amount = %expense.amount,
            participants = expense.split_between.len(),
            "expense stored"
        );

        if let Err(err) = self.refresh_total(group_id).await {
            tracing::warn!(group_id = %group_id, "group total not refreshed: {err}");
        }

        Ok(expense)
    }

    pub async fn expenses(&self, group_id: Uuid) -> ResultEngine<Vec<Expense>> {
        self.repository.expenses(group_id).await
    }
}
