//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **CircleBuilder / Circle**: 構築とワイヤリング
//! - **FollowStateMachine**: follow request の状態遷移（関係の唯一の書き手）
//! - **VisibilityEngine**: feed の計算（可視性の唯一の判定場所）
//! - **IngestionCoordinator**: Story の公開
//! - **ExpiryReaper**: 期限切れ Story の物理削除
//! - **Session**: 認証済みユーザーに束縛された操作面

pub mod builder;
pub mod follow;
pub mod ingest;
pub mod reaper;
pub mod session;
pub mod visibility;

// 主要な型を再エクスポート
pub use self::builder::{Circle, CircleBuilder};
pub use self::follow::FollowStateMachine;
pub use self::ingest::IngestionCoordinator;
pub use self::reaper::{ExpiryReaper, ReaperHandle};
pub use self::session::Session;
pub use self::visibility::VisibilityEngine;

use tracing::warn;

use crate::domain::DomainEvent;
use crate::ports::EventSink;

/// Emit after a successful mutation. Sink failures are logged, never propagated.
pub(crate) async fn emit_event(sink: &dyn EventSink, event: DomainEvent) {
    let name = event.name();
    if let Err(err) = sink.emit(event).await {
        warn!(event = name, error = %err, "event sink failed");
    }
}
