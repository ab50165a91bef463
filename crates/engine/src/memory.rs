//! In-memory [`Repository`] with a live change feed.
//!
//! Mirrors how the remote document store behaves: records are keyed by id,
//! writes replace the stored document, and every change to a group's
//! expenses pushes the full set to its subscribers.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
};

use tokio::sync::{RwLock, watch};
use uuid::Uuid;

use crate::{EngineError, Expense, Group, MoneyCents, Repository, ResultEngine, Subscription};

#[derive(Debug, Default)]
struct State {
    groups: HashMap<Uuid, Group>,
    /// Expenses per group, in write order.
    expenses: HashMap<Uuid, Vec<Expense>>,
    feeds: HashMap<Uuid, watch::Sender<Vec<Expense>>>,
}

impl State {
    fn publish(&mut self, group_id: Uuid) {
        let snapshot = self.expenses.get(&group_id).cloned().unwrap_or_default();
        if let Some(feed) = self.feeds.get(&group_id) {
            feed.send_replace(snapshot);
        }
    }
}

#[derive(Debug)]
pub struct MemoryRepository {
    state: RwLock<State>,
    available: AtomicBool,
    total_updates_fail: AtomicBool,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
            available: AtomicBool::new(true),
            total_updates_fail: AtomicBool::new(false),
        }
    }

    /// Loads existing records without validating them, the way a store
    /// hands back whatever documents it holds.
    pub async fn seed(&self, groups: Vec<Group>, expenses: Vec<Expense>) {
        let mut state = self.state.write().await;
        for group in groups {
            state.groups.insert(group.id, group);
        }
        for expense in expenses {
            let group_id = expense.group_id;
            state.expenses.entry(group_id).or_default().push(expense);
            state.publish(group_id);
        }
    }

    /// Replaces the stored expense set of a group and notifies subscribers
    /// with `snapshot` exactly as given (possibly unordered or repeating
    /// records).
    pub async fn deliver(&self, group_id: Uuid, snapshot: Vec<Expense>) {
        let mut state = self.state.write().await;
        state.expenses.insert(group_id, snapshot);
        state.publish(group_id);
    }

    /// Toggles simulated availability. While unavailable every call fails
    /// with [`EngineError::RepositoryUnavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Makes only [`Repository::update_group_total`] fail with
    /// [`EngineError::RepositoryUnavailable`], leaving every other call
    /// working.
    pub fn set_total_updates_fail(&self, fail: bool) {
        self.total_updates_fail.store(fail, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> ResultEngine<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(EngineError::RepositoryUnavailable(
                "memory store is offline".to_string(),
            ))
        }
    }
}

impl Repository for MemoryRepository {
    async fn create_group(&self, group: &Group) -> ResultEngine<Uuid> {
        self.ensure_available()?;
        let mut state = self.state.write().await;
        state.groups.insert(group.id, group.clone());
        Ok(group.id)
    }

    async fn group(&self, group_id: Uuid) -> ResultEngine<Group> {
        self.ensure_available()?;
        let state = self.state.read().await;
        state
            .groups
            .get(&group_id)
            .cloned()
            .ok_or_else(|| EngineError::KeyNotFound(group_id.to_string()))
    }

    async fn groups(&self) -> ResultEngine<Vec<Group>> {
        self.ensure_available()?;
        let state = self.state.read().await;
        let mut groups: Vec<Group> = state.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(groups)
    }

    async fn create_expense(&self, expense: &Expense) -> ResultEngine<Uuid> {
        self.ensure_available()?;
        let mut state = self.state.write().await;
        if !state.groups.contains_key(&expense.group_id) {
            return Err(EngineError::KeyNotFound(expense.group_id.to_string()));
        }

        let stored = state.expenses.entry(expense.group_id).or_default();
        match stored.iter_mut().find(|e| e.id == expense.id) {
            Some(existing) => *existing = expense.clone(),
            None => stored.push(expense.clone()),
        }
        state.publish(expense.group_id);
        Ok(expense.id)
    }

    async fn expenses(&self, group_id: Uuid) -> ResultEngine<Vec<Expense>> {
        self.ensure_available()?;
        let state = self.state.read().await;
        Ok(state.expenses.get(&group_id).cloned().unwrap_or_default())
    }

    async fn update_group_total(&self, group_id: Uuid, total: MoneyCents) -> ResultEngine<()> {
        self.ensure_available()?;
        if self.total_updates_fail.load(Ordering::SeqCst) {
            return Err(EngineError::RepositoryUnavailable(
                "group total write rejected".to_string(),
            ));
        }
        let mut state = self.state.write().await;
        let group = state
            .groups
            .get_mut(&group_id)
            .ok_or_else(|| EngineError::KeyNotFound(group_id.to_string()))?;
        group.total_expenses = total;
        Ok(())
    }

    async fn subscribe_expenses(&self, group_id: Uuid) -> ResultEngine<Subscription> {
        self.ensure_available()?;
        let mut state = self.state.write().await;
        if !state.groups.contains_key(&group_id) {
            return Err(EngineError::KeyNotFound(group_id.to_string()));
        }
        let current = state.expenses.get(&group_id).cloned().unwrap_or_default();
        let feed = state
            .feeds
            .entry(group_id)
            .or_insert_with(|| watch::channel(current).0);
        Ok(Subscription::new(feed.subscribe()))
    }
}
