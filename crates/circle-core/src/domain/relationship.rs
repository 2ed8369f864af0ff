//! Follow edges, follow requests and the per-pair relationship state.

use serde::{Deserialize, Serialize};

use super::ids::UserRef;

/// Accepted, directed relationship: `follower` sees `followee`'s stories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FollowEdge {
    pub follower: UserRef,
    pub followee: UserRef,
}

impl FollowEdge {
    pub fn new(follower: UserRef, followee: UserRef) -> Self {
        Self { follower, followee }
    }
}

/// Status of a stored follow request.
///
/// Only `Pending` is ever stored. Acceptance and rejection consume the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
}

/// A proposal from `sender` to follow `receiver`, awaiting the receiver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FollowRequest {
    pub sender: UserRef,
    pub receiver: UserRef,
    pub status: RequestStatus,
}

impl FollowRequest {
    pub fn pending(sender: UserRef, receiver: UserRef) -> Self {
        Self {
            sender,
            receiver,
            status: RequestStatus::Pending,
        }
    }
}

/// State of the ordered pair `(a, b)` as seen from `a`.
///
/// State transitions:
/// - None -> Pending (request_follow)
/// - Pending -> Accepted (accept_request, receiver only)
/// - Pending -> None (reject_request by receiver, cancel_request by sender)
/// - Accepted -> None (unfollow, follower only)
///
/// `Accepted` is never stored as a status; it is the existence of a `FollowEdge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipState {
    None,
    Pending,
    Accepted,
}

impl RelationshipState {
    /// Can `request_follow` start from this state?
    pub fn can_request(self) -> bool {
        matches!(self, RelationshipState::None)
    }
}
