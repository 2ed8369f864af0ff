//! Domain model (IDs, relationships, stories, errors, events, config).

pub mod config;
pub mod errors;
pub mod events;
pub mod ids;
pub mod relationship;
pub mod story;

pub use self::config::{CircleConfig, ConfigError, FeedConfig, ReaperConfig};
pub use self::errors::{CircleError, ErrorKind, StoreError};
pub use self::events::DomainEvent;
pub use self::ids::{Id, IdMarker, MediaRef, StoryId, UserRef};
pub use self::relationship::{FollowEdge, FollowRequest, RelationshipState, RequestStatus};
pub use self::story::{STORY_TTL, Story, feed_order};
