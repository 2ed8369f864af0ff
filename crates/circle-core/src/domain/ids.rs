//! Domain identifiers (strongly-typed IDs).
//!
//! # ULID ベースの ID + Phantom type
//! Story の ID は ULID (Universally Unique Lexicographically Sortable Identifier) です。
//! `Id<T>` というジェネリック型で共通実装を提供し、`T` はコンパイル時だけ使う
//! マーカー型（PhantomData）として型安全性を提供します。
//!
//! ## ULID の特性
//! - **時刻でソート可能**: timestamp が先頭にあるため、生成順序でソートできる
//! - **分散生成可能**: 調整なしで複数ノードで生成できる
//!
//! `UserRef` は外部の Identity から渡される不透明な文字列で、ここでは生成しません。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

use super::errors::CircleError;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"story-" など）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    /// ULID から Id を作成
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    /// 内部の ULID を取得
    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Story のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoryMarker {}

impl IdMarker for StoryMarker {
    fn prefix() -> &'static str {
        "story-"
    }
}

/// Identifier of a published story.
pub type StoryId = Id<StoryMarker>;

/// Opaque user identifier supplied by the identity collaborator.
///
/// Equality is the only operation the core relies on. The ordering impl exists
/// so that sets of users iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRef(String);

impl UserRef {
    /// Wrap an externally supplied identifier. Blank identifiers are rejected.
    pub fn new(value: impl Into<String>) -> Result<Self, CircleError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(CircleError::InvalidInput("user ref must not be blank".into()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Handle to media that the upload collaborator has already stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
    pub fn new(value: impl Into<String>) -> Result<Self, CircleError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(CircleError::InvalidInput("media ref must not be blank".into()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn story_id_display_has_prefix() {
        let ulid = Ulid::new();
        let id = StoryId::from_ulid(ulid);

        assert_eq!(id.as_ulid(), ulid);
        assert!(id.to_string().starts_with("story-"));
    }

    #[test]
    fn ulid_ids_are_sortable() {
        // ULID は時刻ベースなので、生成順序でソート可能
        let id1 = StoryId::from_ulid(Ulid::new());
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = StoryId::from_ulid(Ulid::new());

        assert!(id1 < id2);
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;

        assert_eq!(size_of::<StoryId>(), size_of::<Ulid>());
    }

    #[test]
    fn blank_user_ref_is_rejected() {
        assert!(UserRef::new("alice").is_ok());
        assert!(matches!(UserRef::new("   "), Err(CircleError::InvalidInput(_))));
        assert!(matches!(MediaRef::new(""), Err(CircleError::InvalidInput(_))));
    }

    #[test]
    fn user_ref_serializes_transparently() {
        let user = UserRef::new("user_2abc").unwrap();
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, "\"user_2abc\"");
    }
}
