//! InMemoryContentStore - 開発用・テスト用の ContentStore
//!
//! - stories: StoryId -> Story（正本）
//! - by_author: 作者ごとの StoryId（list_by_authors 用のインデックス）

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::{StoreError, Story, StoryId, UserRef};
use crate::ports::ContentStore;

#[derive(Debug, Default)]
struct ContentTables {
    stories: HashMap<StoryId, Story>,
    by_author: HashMap<UserRef, BTreeSet<StoryId>>,
}

#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    tables: RwLock<ContentTables>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn put(&self, story: Story) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.stories.contains_key(&story.id) {
            return Err(StoreError::DuplicateStory);
        }
        tables
            .by_author
            .entry(story.author.clone())
            .or_default()
            .insert(story.id);
        tables.stories.insert(story.id, story);
        Ok(())
    }

    async fn get(&self, id: StoryId) -> Result<Option<Story>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.stories.get(&id).cloned())
    }

    async fn list_by_authors(&self, authors: &BTreeSet<UserRef>) -> Result<Vec<Story>, StoreError> {
        let tables = self.tables.read().await;
        let stories = authors
            .iter()
            .filter_map(|author| tables.by_author.get(author))
            .flatten()
            .filter_map(|id| tables.stories.get(id))
            .cloned()
            .collect();
        Ok(stories)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut tables = self.tables.write().await;
        let expired: Vec<Story> = tables
            .stories
            .values()
            .filter(|story| !story.is_live_at(now))
            .cloned()
            .collect();

        for story in &expired {
            tables.stories.remove(&story.id);
            if let Some(ids) = tables.by_author.get_mut(&story.author) {
                ids.remove(&story.id);
                if ids.is_empty() {
                    tables.by_author.remove(&story.author);
                }
            }
        }
        Ok(expired.len())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.stories.len())
    }
}
