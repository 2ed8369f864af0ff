//! ContentStore port - Story の保存先
//!
//! 純粋な永続化だけを担当します。期限切れのフィルタは
//! VisibilityEngine の責務で、ここでは行いません。

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{StoreError, Story, StoryId, UserRef};

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// All-or-nothing insert. Fails with `DuplicateStory` if the id is taken.
    async fn put(&self, story: Story) -> Result<(), StoreError>;

    async fn get(&self, id: StoryId) -> Result<Option<Story>, StoreError>;

    /// Every stored story by any of `authors`, expired or not, in no particular order.
    async fn list_by_authors(&self, authors: &BTreeSet<UserRef>) -> Result<Vec<Story>, StoreError>;

    /// Physically remove stories with `expires_at <= now`. Returns how many were removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;
}
