use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Group, GroupsOverview, Repository, ResultEngine, UserId, overview};

use super::Engine;

impl<R: Repository> Engine<R> {
    /// Creates a group with a fixed member list and a zero total.
    pub async fn create_group(
        &self,
        name: &str,
        description: Option<&str>,
        members: Vec<UserId>,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Group> {
        let group = Group::new(name, description, members, created_at)?;
        self.repository.create_group(&group).await?;
        tracing::debug!(group_id = %group.id, members = group.member_count(), "group created");
        Ok(group)
    }

    pub async fn group(&self, group_id: Uuid) -> ResultEngine<Group> {
        self.repository.group(group_id).await
    }

    pub async fn groups(&self) -> ResultEngine<Vec<Group>> {
        self.repository.groups().await
    }

    /// Totals across every stored group, from their cached totals.
    pub async fn overview(&self) -> ResultEngine<GroupsOverview> {
        let groups = self.repository.groups().await?;
        overview(&groups)
    }
}
