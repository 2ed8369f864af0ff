//! Story record and the visibility predicate.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{MediaRef, StoryId, UserRef};

/// Lifetime of a story, fixed at creation.
pub const STORY_TTL: Duration = Duration::hours(24);

/// Ephemeral content item. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    pub author: UserRef,
    pub media_ref: MediaRef,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Story {
    /// Build a story created at `now`, expiring `STORY_TTL` later.
    pub fn new(id: StoryId, author: UserRef, media_ref: MediaRef, now: DateTime<Utc>) -> Self {
        Self {
            id,
            author,
            media_ref,
            created_at: now,
            expires_at: now + STORY_TTL,
        }
    }

    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// The single visibility rule.
    ///
    /// `viewer` sees this story at `now` iff it has not expired and the viewer is
    /// the author or follows the author. `follows_author` must be the answer to
    /// "does `FollowEdge(viewer, author)` exist".
    pub fn is_visible_to(&self, viewer: &UserRef, follows_author: bool, now: DateTime<Utc>) -> bool {
        self.is_live_at(now) && (viewer == &self.author || follows_author)
    }
}

/// Feed order: newest first, ties by id ascending.
pub fn feed_order(a: &Story, b: &Story) -> std::cmp::Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.id.cmp(&b.id))
}
