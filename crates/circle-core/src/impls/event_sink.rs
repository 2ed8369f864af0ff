//! EventSink の実装
//!
//! - NoopEventSink: 何もしない（デフォルト）
//! - TracingEventSink: イベントを info ログとして出す

use async_trait::async_trait;
use tracing::info;

use crate::domain::DomainEvent;
use crate::ports::{EventSink, EventSinkError};

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

#[async_trait]
impl EventSink for NoopEventSink {
    async fn emit(&self, _event: DomainEvent) -> Result<(), EventSinkError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: DomainEvent) -> Result<(), EventSinkError> {
        let payload =
            serde_json::to_string(&event).map_err(|e| EventSinkError(format!("encode: {e}")))?;
        info!(event = event.name(), %payload, "domain event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRef;

    #[tokio::test]
    async fn sinks_accept_events() {
        let event = DomainEvent::Unfollowed {
            follower: UserRef::new("alice").unwrap(),
            followee: UserRef::new("bob").unwrap(),
        };

        NoopEventSink.emit(event.clone()).await.unwrap();
        TracingEventSink.emit(event).await.unwrap();
    }
}
