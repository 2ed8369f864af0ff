//! circle-core
//!
//! Follow-request state machine and story visibility engine for a small social graph.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, relationship, story, errors, events, config）
//! - **ports**: 抽象化レイヤー（RelationshipStore, ContentStore, Clock, IdGenerator, Identity, EventSink）
//! - **impls**: 実装（InMemoryRelationshipStore, InMemoryContentStore など開発用）
//! - **app**: アプリケーションロジック（builder, follow, visibility, ingest, reaper, session）
//!
//! # 可視性のルール
//! 作者 A の Story は、時刻 T に閲覧者 V から見える
//! ⇔ `T < expires_at` かつ（`V == A` または `FollowEdge(V, A)` が存在する）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{Circle, CircleBuilder, Session};
pub use domain::{CircleConfig, CircleError, MediaRef, Story, StoryId, UserRef};
