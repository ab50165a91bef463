//! Storage contract the engine consumes.
//!
//! The engine never talks to a concrete store. Anything that can create and
//! read groups and expenses, patch a group's cached total and push the full
//! expense set of a group whenever it changes can back an [`Engine`].
//!
//! Transient failures must surface as
//! [`EngineError::RepositoryUnavailable`](crate::EngineError::RepositoryUnavailable)
//! with nothing committed.
//!
//! [`Engine`]: crate::Engine

use std::{future::Future, sync::Arc};

use tokio::sync::watch;
use uuid::Uuid;

use crate::{Expense, Group, MoneyCents, ResultEngine};

pub trait Repository: Send + Sync {
    /// Stores a new group and returns its id.
    fn create_group(&self, group: &Group) -> impl Future<Output = ResultEngine<Uuid>> + Send;

    /// Loads a group, failing with `KeyNotFound` when it does not exist.
    fn group(&self, group_id: Uuid) -> impl Future<Output = ResultEngine<Group>> + Send;

    /// Every stored group.
    fn groups(&self) -> impl Future<Output = ResultEngine<Vec<Group>>> + Send;

    /// Stores an expense and returns its id. Storing the same id twice
    /// overwrites the first record.
    fn create_expense(&self, expense: &Expense) -> impl Future<Output = ResultEngine<Uuid>> + Send;

    /// The current full set of expenses of a group.
    fn expenses(&self, group_id: Uuid) -> impl Future<Output = ResultEngine<Vec<Expense>>> + Send;

    /// Overwrites the denormalized total of a group.
    fn update_group_total(
        &self,
        group_id: Uuid,
        total: MoneyCents,
    ) -> impl Future<Output = ResultEngine<()>> + Send;

    /// Live feed of the full expense set of a group.
    fn subscribe_expenses(
        &self,
        group_id: Uuid,
    ) -> impl Future<Output = ResultEngine<Subscription>> + Send;
}

impl<T: Repository> Repository for Arc<T> {
    fn create_group(&self, group: &Group) -> impl Future<Output = ResultEngine<Uuid>> + Send {
        (**self).create_group(group)
    }

    fn group(&self, group_id: Uuid) -> impl Future<Output = ResultEngine<Group>> + Send {
        (**self).group(group_id)
    }

    fn groups(&self) -> impl Future<Output = ResultEngine<Vec<Group>>> + Send {
        (**self).groups()
    }

    fn create_expense(&self, expense: &Expense) -> impl Future<Output = ResultEngine<Uuid>> + Send {
        (**self).create_expense(expense)
    }

    fn expenses(&self, group_id: Uuid) -> impl Future<Output = ResultEngine<Vec<Expense>>> + Send {
        (**self).expenses(group_id)
    }

    fn update_group_total(
        &self,
        group_id: Uuid,
        total: MoneyCents,
    ) -> impl Future<Output = ResultEngine<()>> + Send {
        (**self).update_group_total(group_id, total)
    }

    fn subscribe_expenses(
        &self,
        group_id: Uuid,
    ) -> impl Future<Output = ResultEngine<Subscription>> + Send {
        (**self).subscribe_expenses(group_id)
    }
}

/// Handle to a live expense feed.
///
/// Each delivery is the complete, authoritative expense set of the group.
/// Dropping the handle (or calling [`Subscription::unsubscribe`]) tears the
/// feed down.
#[derive(Debug)]
pub struct Subscription {
    receiver: watch::Receiver<Vec<Expense>>,
}

impl Subscription {
    pub fn new(receiver: watch::Receiver<Vec<Expense>>) -> Self {
        Self { receiver }
    }

    /// The last delivered snapshot.
    pub fn current(&self) -> Vec<Expense> {
        self.receiver.borrow().clone()
    }

    /// Waits for the next snapshot. Returns `None` once the store closed the
    /// feed.
    pub async fn changed(&mut self) -> Option<Vec<Expense>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    pub fn unsubscribe(self) {}
}
