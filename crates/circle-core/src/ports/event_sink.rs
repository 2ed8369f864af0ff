//! EventSink port - イベント記録の抽象化
//!
//! # 実装
//! - NoopEventSink: 何もしない
//! - TracingEventSink: tracing でログに出す
//!
//! # 将来の拡張
//! - 通知サービスや Kafka へのイベント送信

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::DomainEvent;

#[derive(Debug, Error)]
#[error("event sink failed: {0}")]
pub struct EventSinkError(pub String);

/// EventSink はドメインイベントを記録
///
/// 呼び出し側は失敗をログに残すだけで、状態遷移は取り消しません。
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: DomainEvent) -> Result<(), EventSinkError>;
}
