//! IngestionCoordinator - 新しい Story を記録する
//!
//! 返した `Story` がそのまま正本のレコードです。クライアント側の
//! 楽観的なプレースホルダーは、このレコードで置き換えてもらいます。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::emit_event;
use crate::domain::{CircleError, DomainEvent, MediaRef, Story, UserRef};
use crate::ports::{ContentStore, EventSink, IdGenerator};

pub struct IngestionCoordinator {
    content: Arc<dyn ContentStore>,
    ids: Arc<dyn IdGenerator>,
    events: Arc<dyn EventSink>,
}

impl IngestionCoordinator {
    pub fn new(content: Arc<dyn ContentStore>, ids: Arc<dyn IdGenerator>, events: Arc<dyn EventSink>) -> Self {
        Self { content, ids, events }
    }

    /// Persist a story created at `now` and return the stored record.
    ///
    /// The put is all-or-nothing: on error nothing is stored.
    pub async fn publish(&self, author: &UserRef, media_ref: MediaRef, now: DateTime<Utc>) -> Result<Story, CircleError> {
        let story = Story::new(self.ids.generate_story_id(), author.clone(), media_ref, now);
        self.content.put(story.clone()).await?;

        info!(story_id = %story.id, %author, expires_at = %story.expires_at, "story published");
        emit_event(
            self.events.as_ref(),
            DomainEvent::StoryPublished {
                story_id: story.id,
                author: author.clone(),
                expires_at: story.expires_at,
            },
        )
        .await;
        Ok(story)
    }
}
