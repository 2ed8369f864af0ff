//! CircleBuilder - アプリケーションの構築とワイヤリング
//!
//! # Fail-fast 設計
//! - build() 時に設定を検証し、不正なら BuildError を返す
//! - 差し替えなかった port は in-memory 実装と SystemClock で埋める

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::follow::FollowStateMachine;
use super::ingest::IngestionCoordinator;
use super::reaper::{ExpiryReaper, ReaperHandle};
use super::session::Session;
use super::visibility::VisibilityEngine;
use crate::domain::{CircleConfig, CircleError, ConfigError, Story, StoryId};
use crate::impls::{InMemoryContentStore, InMemoryRelationshipStore, NoopEventSink};
use crate::ports::{
    Clock, ContentStore, EventSink, IdGenerator, Identity, RelationshipStore, SystemClock,
    UlidGenerator,
};

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// # 使用例
/// ```ignore
/// let circle = CircleBuilder::new()
///     .with_config(config)
///     .with_event_sink(Arc::new(TracingEventSink))
///     .build()?;
/// let session = circle.session(&StaticIdentity(alice));
/// session.publish(media).await?;
/// ```
#[derive(Default)]
pub struct CircleBuilder {
    config: CircleConfig,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    relationships: Option<Arc<dyn RelationshipStore>>,
    content: Option<Arc<dyn ContentStore>>,
    events: Option<Arc<dyn EventSink>>,
}

impl CircleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: CircleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn with_relationship_store(mut self, store: Arc<dyn RelationshipStore>) -> Self {
        self.relationships = Some(store);
        self
    }

    pub fn with_content_store(mut self, store: Arc<dyn ContentStore>) -> Self {
        self.content = Some(store);
        self
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = Some(sink);
        self
    }

    pub fn build(self) -> Result<Circle, BuildError> {
        self.config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(Arc::clone(&clock))));
        let relationships = self
            .relationships
            .unwrap_or_else(|| Arc::new(InMemoryRelationshipStore::new()));
        let content = self
            .content
            .unwrap_or_else(|| Arc::new(InMemoryContentStore::new()));
        let events = self.events.unwrap_or_else(|| Arc::new(NoopEventSink));

        debug!(config = ?self.config, "building circle");
        Ok(Circle {
            follows: FollowStateMachine::new(Arc::clone(&relationships), Arc::clone(&events)),
            visibility: VisibilityEngine::new(
                Arc::clone(&relationships),
                Arc::clone(&content),
                self.config.feed.max_items,
            ),
            ingest: IngestionCoordinator::new(Arc::clone(&content), ids, Arc::clone(&events)),
            relationships,
            content,
            clock,
            events,
            config: self.config,
        })
    }
}

/// Wired application: the complete surface exposed to a presentation layer.
pub struct Circle {
    follows: FollowStateMachine,
    visibility: VisibilityEngine,
    ingest: IngestionCoordinator,
    relationships: Arc<dyn RelationshipStore>,
    content: Arc<dyn ContentStore>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
    config: CircleConfig,
}

impl Circle {
    /// Bind a session to whoever `identity` says is making this request.
    pub fn session(&self, identity: &dyn Identity) -> Session<'_> {
        Session::new(self, identity.current_user())
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn follows(&self) -> &FollowStateMachine {
        &self.follows
    }

    pub fn visibility(&self) -> &VisibilityEngine {
        &self.visibility
    }

    pub fn ingest(&self) -> &IngestionCoordinator {
        &self.ingest
    }

    pub fn relationships(&self) -> &Arc<dyn RelationshipStore> {
        &self.relationships
    }

    pub fn config(&self) -> &CircleConfig {
        &self.config
    }

    /// Raw lookup by id, ignoring visibility and expiry.
    pub async fn story(&self, id: StoryId) -> Result<Story, CircleError> {
        self.content.get(id).await?.ok_or(CircleError::NotFound(id))
    }

    /// Start the expiry reaper if the config enables it.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn spawn_reaper(&self) -> Option<ReaperHandle> {
        if !self.config.reaper.enabled {
            info!("expiry reaper disabled");
            return None;
        }
        let reaper = ExpiryReaper::new(
            Arc::clone(&self.content),
            Arc::clone(&self.clock),
            Arc::clone(&self.events),
            self.config.reaper.interval(),
        );
        info!(interval_secs = self.config.reaper.interval_secs, "expiry reaper started");
        Some(reaper.spawn())
    }
}
