//! RelationshipStore port - follow edge と follow request の正本
//!
//! # 設計原則
//! - 書き込みは check-and-set で原子的に行う（途中状態は外から見えない）
//! - 同じ ordered pair に対する request と edge は排他
//! - 書き込みは FollowStateMachine だけが行う

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::{FollowRequest, RelationshipState, StoreError, UserRef};

/// Durable storage for follow edges and pending follow requests.
///
/// Implementations must make `create_request` and `resolve_request` atomic
/// check-and-set operations: for one ordered pair, of two concurrent
/// `resolve_request` calls exactly one observes the pending request.
#[async_trait]
pub trait RelationshipStore: Send + Sync {
    async fn edge_exists(&self, follower: &UserRef, followee: &UserRef) -> Result<bool, StoreError>;

    /// Fails with `SelfEdge` or `DuplicateEdge`, or `DuplicateRequest` while a
    /// request for the same pair is pending.
    async fn create_edge(&self, follower: &UserRef, followee: &UserRef) -> Result<(), StoreError>;

    /// Idempotent. Returns whether an edge was removed.
    async fn delete_edge(&self, follower: &UserRef, followee: &UserRef) -> Result<bool, StoreError>;

    async fn find_pending_request(
        &self,
        sender: &UserRef,
        receiver: &UserRef,
    ) -> Result<Option<FollowRequest>, StoreError>;

    /// Fails with `SelfRequest`, or `DuplicateRequest` when a pending request or
    /// an edge already exists for `(sender, receiver)`.
    async fn create_request(&self, sender: &UserRef, receiver: &UserRef) -> Result<FollowRequest, StoreError>;

    /// Delete the pending request and, when `accept` is set, create the edge in
    /// the same step. Fails with `RequestNotFound` if nothing is pending.
    async fn resolve_request(
        &self,
        sender: &UserRef,
        receiver: &UserRef,
        accept: bool,
    ) -> Result<(), StoreError>;

    /// Users that `user` follows.
    async fn list_followees(&self, user: &UserRef) -> Result<BTreeSet<UserRef>, StoreError>;

    // ---- derived read-only views ----

    /// Users that follow `user`.
    async fn list_followers(&self, user: &UserRef) -> Result<BTreeSet<UserRef>, StoreError>;

    /// Requests waiting on `receiver`.
    async fn list_incoming_requests(&self, receiver: &UserRef) -> Result<Vec<FollowRequest>, StoreError>;

    /// Requests `sender` is waiting on.
    async fn list_outgoing_requests(&self, sender: &UserRef) -> Result<Vec<FollowRequest>, StoreError>;

    /// State of the ordered pair `(a, b)`.
    async fn relationship_state(&self, a: &UserRef, b: &UserRef) -> Result<RelationshipState, StoreError> {
        if self.edge_exists(a, b).await? {
            return Ok(RelationshipState::Accepted);
        }
        if self.find_pending_request(a, b).await?.is_some() {
            return Ok(RelationshipState::Pending);
        }
        Ok(RelationshipState::None)
    }
}
