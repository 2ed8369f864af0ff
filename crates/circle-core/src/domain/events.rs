//! Events - ドメインイベント
//!
//! 状態遷移が成功した後に EventSink へ送られます。
//! イベント送信の失敗は遷移を取り消しません。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{StoryId, UserRef};

/// DomainEvent はドメインで発生したイベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainEvent {
    FollowRequested {
        sender: UserRef,
        receiver: UserRef,
    },
    FollowAccepted {
        follower: UserRef,
        followee: UserRef,
    },
    FollowRejected {
        sender: UserRef,
        receiver: UserRef,
    },
    FollowRequestCancelled {
        sender: UserRef,
        receiver: UserRef,
    },
    Unfollowed {
        follower: UserRef,
        followee: UserRef,
    },
    StoryPublished {
        story_id: StoryId,
        author: UserRef,
        expires_at: DateTime<Utc>,
    },
    StoriesPurged {
        count: usize,
        at: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Stable name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::FollowRequested { .. } => "follow_requested",
            DomainEvent::FollowAccepted { .. } => "follow_accepted",
            DomainEvent::FollowRejected { .. } => "follow_rejected",
            DomainEvent::FollowRequestCancelled { .. } => "follow_request_cancelled",
            DomainEvent::Unfollowed { .. } => "unfollowed",
            DomainEvent::StoryPublished { .. } => "story_published",
            DomainEvent::StoriesPurged { .. } => "stories_purged",
        }
    }
}
