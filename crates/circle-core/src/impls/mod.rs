//! Impls - ports の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryRelationshipStore**: follow edge / request の in-memory 正本
//! - **InMemoryContentStore**: Story の in-memory 保存先
//! - **NoopEventSink / TracingEventSink**: EventSink
//!
//! 本番用の実装（PostgreSQL など）は別クレートに配置する想定です。

pub mod event_sink;
pub mod inmem_content;
pub mod inmem_relationship;

// 主要な型を再エクスポート
pub use self::event_sink::{NoopEventSink, TracingEventSink};
pub use self::inmem_content::InMemoryContentStore;
pub use self::inmem_relationship::InMemoryRelationshipStore;
