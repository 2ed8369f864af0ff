//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（DB、認証、通知など）へのインターフェースを提供し、
//! 実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - RelationshipStore が follow 関係の正本（source of truth）
//! - ContentStore は Story をそのまま保存するだけ（可視性の判定はしない）
//! - Clock / IdGenerator は差し替え可能にしてテストを決定的にする

pub mod clock;
pub mod content_store;
pub mod event_sink;
pub mod id_generator;
pub mod identity;
pub mod relationship_store;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::content_store::ContentStore;
pub use self::event_sink::{EventSink, EventSinkError};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::identity::{Anonymous, Identity, StaticIdentity};
pub use self::relationship_store::RelationshipStore;
