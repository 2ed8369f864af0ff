//! FollowStateMachine - follow request の状態遷移
//!
//! ordered pair `(A, B)` ごとの状態:
//! - None -> Pending: `request_follow` (A)
//! - Pending -> Accepted: `accept_request` (B のみ)
//! - Pending -> None: `reject_request` (B のみ), `cancel_request` (A のみ)
//! - Accepted -> None: `unfollow` (A のみ)
//!
//! 権限チェックは store に触る前に行います。原子性は RelationshipStore の
//! check-and-set に任せ、ここではグローバルなロックを取りません。

use std::sync::Arc;

use tracing::{debug, info};

use super::emit_event;
use crate::domain::{CircleError, DomainEvent, FollowRequest, RelationshipState, UserRef};
use crate::ports::{EventSink, RelationshipStore};

/// The only writer of relationship state.
pub struct FollowStateMachine {
    store: Arc<dyn RelationshipStore>,
    events: Arc<dyn EventSink>,
}

impl FollowStateMachine {
    pub fn new(store: Arc<dyn RelationshipStore>, events: Arc<dyn EventSink>) -> Self {
        Self { store, events }
    }

    pub fn store(&self) -> &Arc<dyn RelationshipStore> {
        &self.store
    }

    /// `None -> Pending`, invoked by `sender`.
    pub async fn request_follow(&self, sender: &UserRef, receiver: &UserRef) -> Result<FollowRequest, CircleError> {
        let request = self.store.create_request(sender, receiver).await?;
        info!(%sender, %receiver, "follow requested");
        emit_event(
            self.events.as_ref(),
            DomainEvent::FollowRequested {
                sender: sender.clone(),
                receiver: receiver.clone(),
            },
        )
        .await;
        Ok(request)
    }

    /// `Pending -> Accepted`. Only the receiver may accept.
    pub async fn accept_request(
        &self,
        invoker: &UserRef,
        sender: &UserRef,
        receiver: &UserRef,
    ) -> Result<(), CircleError> {
        if invoker != receiver {
            debug!(%invoker, %sender, %receiver, "accept refused: invoker is not the receiver");
            return Err(CircleError::NotAuthorized);
        }
        self.store.resolve_request(sender, receiver, true).await?;
        info!(%sender, %receiver, "follow request accepted");
        emit_event(
            self.events.as_ref(),
            DomainEvent::FollowAccepted {
                follower: sender.clone(),
                followee: receiver.clone(),
            },
        )
        .await;
        Ok(())
    }

    /// `Pending -> None`. Only the receiver may reject.
    pub async fn reject_request(
        &self,
        invoker: &UserRef,
        sender: &UserRef,
        receiver: &UserRef,
    ) -> Result<(), CircleError> {
        if invoker != receiver {
            debug!(%invoker, %sender, %receiver, "reject refused: invoker is not the receiver");
            return Err(CircleError::NotAuthorized);
        }
        self.store.resolve_request(sender, receiver, false).await?;
        info!(%sender, %receiver, "follow request rejected");
        emit_event(
            self.events.as_ref(),
            DomainEvent::FollowRejected {
                sender: sender.clone(),
                receiver: receiver.clone(),
            },
        )
        .await;
        Ok(())
    }

    /// `Pending -> None`. Only the sender may cancel.
    pub async fn cancel_request(
        &self,
        invoker: &UserRef,
        sender: &UserRef,
        receiver: &UserRef,
    ) -> Result<(), CircleError> {
        if invoker != sender {
            debug!(%invoker, %sender, %receiver, "cancel refused: invoker is not the sender");
            return Err(CircleError::NotAuthorized);
        }
        self.store.resolve_request(sender, receiver, false).await?;
        info!(%sender, %receiver, "follow request cancelled");
        emit_event(
            self.events.as_ref(),
            DomainEvent::FollowRequestCancelled {
                sender: sender.clone(),
                receiver: receiver.clone(),
            },
        )
        .await;
        Ok(())
    }

    /// `Accepted -> None`. Only the follower may unfollow.
    ///
    /// Unfollowing a user that is not followed is a no-op and returns `false`.
    pub async fn unfollow(
        &self,
        invoker: &UserRef,
        follower: &UserRef,
        followee: &UserRef,
    ) -> Result<bool, CircleError> {
        if invoker != follower {
            debug!(%invoker, %follower, %followee, "unfollow refused: invoker is not the follower");
            return Err(CircleError::NotAuthorized);
        }
        let removed = self.store.delete_edge(follower, followee).await?;
        if removed {
            info!(%follower, %followee, "unfollowed");
            emit_event(
                self.events.as_ref(),
                DomainEvent::Unfollowed {
                    follower: follower.clone(),
                    followee: followee.clone(),
                },
            )
            .await;
        }
        Ok(removed)
    }

    pub async fn state(&self, a: &UserRef, b: &UserRef) -> Result<RelationshipState, CircleError> {
        Ok(self.store.relationship_state(a, b).await?)
    }
}
