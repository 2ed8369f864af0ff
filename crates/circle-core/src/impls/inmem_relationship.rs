//! InMemoryRelationshipStore - 開発用・テスト用の RelationshipStore
//!
//! # 実装詳細
//! - forward / reverse の両方向インデックスを持つ（常に同期させる）
//! - 書き込みは write lock の中で check-and-set を完結させる
//! - lock を保持したまま await しない

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{FollowRequest, StoreError, UserRef};
use crate::ports::RelationshipStore;

/// Two-way adjacency index: `forward[a]` contains `b` iff `reverse[b]` contains `a`.
#[derive(Debug, Default)]
struct PairIndex {
    forward: HashMap<UserRef, BTreeSet<UserRef>>,
    reverse: HashMap<UserRef, BTreeSet<UserRef>>,
}

impl PairIndex {
    fn contains(&self, from: &UserRef, to: &UserRef) -> bool {
        self.forward.get(from).is_some_and(|set| set.contains(to))
    }

    /// Returns false if the pair was already present.
    fn insert(&mut self, from: &UserRef, to: &UserRef) -> bool {
        let inserted = self.forward.entry(from.clone()).or_default().insert(to.clone());
        if inserted {
            self.reverse.entry(to.clone()).or_default().insert(from.clone());
        }
        inserted
    }

    /// Returns false if the pair was absent.
    fn remove(&mut self, from: &UserRef, to: &UserRef) -> bool {
        let removed = Self::remove_from(&mut self.forward, from, to);
        if removed {
            Self::remove_from(&mut self.reverse, to, from);
        }
        removed
    }

    fn remove_from(map: &mut HashMap<UserRef, BTreeSet<UserRef>>, key: &UserRef, value: &UserRef) -> bool {
        let Some(set) = map.get_mut(key) else {
            return false;
        };
        let removed = set.remove(value);
        // 空の set は残さない
        if set.is_empty() {
            map.remove(key);
        }
        removed
    }

    fn outgoing(&self, from: &UserRef) -> BTreeSet<UserRef> {
        self.forward.get(from).cloned().unwrap_or_default()
    }

    fn incoming(&self, to: &UserRef) -> BTreeSet<UserRef> {
        self.reverse.get(to).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Default)]
struct RelationshipTables {
    /// follower -> followee
    edges: PairIndex,
    /// sender -> receiver (pending only)
    requests: PairIndex,
}

/// In-memory relationship store.
///
/// Every mutation performs its check and its write under one write guard, so
/// the check-and-set is atomic and no intermediate state is observable.
#[derive(Debug, Default)]
pub struct InMemoryRelationshipStore {
    tables: RwLock<RelationshipTables>,
}

impl InMemoryRelationshipStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RelationshipStore for InMemoryRelationshipStore {
    async fn edge_exists(&self, follower: &UserRef, followee: &UserRef) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.edges.contains(follower, followee))
    }

    async fn create_edge(&self, follower: &UserRef, followee: &UserRef) -> Result<(), StoreError> {
        if follower == followee {
            return Err(StoreError::SelfEdge);
        }
        let mut tables = self.tables.write().await;
        // pending request がある間は edge を作らない（request と edge は排他）
        if tables.requests.contains(follower, followee) {
            return Err(StoreError::DuplicateRequest);
        }
        if !tables.edges.insert(follower, followee) {
            return Err(StoreError::DuplicateEdge);
        }
        Ok(())
    }

    async fn delete_edge(&self, follower: &UserRef, followee: &UserRef) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.edges.remove(follower, followee))
    }

    async fn find_pending_request(
        &self,
        sender: &UserRef,
        receiver: &UserRef,
    ) -> Result<Option<FollowRequest>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .requests
            .contains(sender, receiver)
            .then(|| FollowRequest::pending(sender.clone(), receiver.clone())))
    }

    async fn create_request(&self, sender: &UserRef, receiver: &UserRef) -> Result<FollowRequest, StoreError> {
        if sender == receiver {
            return Err(StoreError::SelfRequest);
        }
        let mut tables = self.tables.write().await;
        if tables.edges.contains(sender, receiver) || !tables.requests.insert(sender, receiver) {
            return Err(StoreError::DuplicateRequest);
        }
        Ok(FollowRequest::pending(sender.clone(), receiver.clone()))
    }

    async fn resolve_request(
        &self,
        sender: &UserRef,
        receiver: &UserRef,
        accept: bool,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.requests.contains(sender, receiver) {
            return Err(StoreError::RequestNotFound);
        }
        // request と edge は排他なので、accept 時に edge が既にあることはない
        if accept && tables.edges.contains(sender, receiver) {
            return Err(StoreError::DuplicateEdge);
        }
        tables.requests.remove(sender, receiver);
        if accept {
            tables.edges.insert(sender, receiver);
        }
        Ok(())
    }

    async fn list_followees(&self, user: &UserRef) -> Result<BTreeSet<UserRef>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.edges.outgoing(user))
    }

    async fn list_followers(&self, user: &UserRef) -> Result<BTreeSet<UserRef>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.edges.incoming(user))
    }

    async fn list_incoming_requests(&self, receiver: &UserRef) -> Result<Vec<FollowRequest>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .requests
            .incoming(receiver)
            .into_iter()
            .map(|sender| FollowRequest::pending(sender, receiver.clone()))
            .collect())
    }

    async fn list_outgoing_requests(&self, sender: &UserRef) -> Result<Vec<FollowRequest>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .requests
            .outgoing(sender)
            .into_iter()
            .map(|receiver| FollowRequest::pending(sender.clone(), receiver))
            .collect())
    }
}
