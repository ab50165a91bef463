use uuid::Uuid;

use crate::{GroupCache, Repository, ResultEngine, Subscription};

use super::Engine;

/// A live view of one group: a subscription plus the cache it refreshes.
#[derive(Debug)]
pub struct GroupWatch<'a, R> {
    repository: &'a R,
    subscription: Subscription,
    cache: GroupCache,
}

impl<R: Repository> GroupWatch<'_, R> {
    pub fn cache(&self) -> &GroupCache {
        &self.cache
    }

    /// Waits for the next snapshot, refreshes the cache with it and reloads
    /// the group record so its stored total can be checked against the
    /// expenses.
    ///
    /// Returns `None` once the feed is closed. A snapshot that fails
    /// validation is returned as an error and leaves the cache untouched.
    /// If only the group reload fails, the expenses stay applied and the
    /// error is returned. The watch keeps running in both cases.
    pub async fn next(&mut self) -> Option<ResultEngine<&GroupCache>> {
        let snapshot = self.subscription.changed().await?;
        let group_id = self.cache.group().id;

        let applied = self.cache.apply_snapshot(snapshot).map(|_| ());
        if let Err(err) = applied {
            tracing::warn!(group_id = %group_id, "snapshot rejected: {err}");
            return Some(Err(err));
        }

        let refreshed = match self.repository.group(group_id).await {
            Ok(group) => self.cache.refresh_group(group).map(|_| ()),
            Err(err) => Err(err),
        };
        if let Err(err) = refreshed {
            tracing::warn!(group_id = %group_id, "group record not reloaded: {err}");
            return Some(Err(err));
        }

        Some(Ok(&self.cache))
    }

    /// Tears the subscription down.
    pub fn close(self) -> GroupCache {
        self.subscription.unsubscribe();
        self.cache
    }
}

impl<R: Repository> Engine<R> {
    /// Subscribes to a group's expenses and seeds the cache with the
    /// current snapshot.
    pub async fn watch_group(&self, group_id: Uuid) -> ResultEngine<GroupWatch<'_, R>> {
        let group = self.repository.group(group_id).await?;
        let subscription = self.repository.subscribe_expenses(group_id).await?;

        let mut cache = GroupCache::new(group);
        cache.apply_snapshot(subscription.current())?;

        Ok(GroupWatch {
            repository: &self.repository,
            subscription,
            cache,
        })
    }
}
