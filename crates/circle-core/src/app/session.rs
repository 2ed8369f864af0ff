//! Session - リクエスト単位の操作面
//!
//! `Identity::current_user()` をリクエストごとに一度だけ解決し、
//! ユーザーが必要な操作はすべてここで `Unauthenticated` をチェックします。
//! 現在時刻は Clock port から取ります。

use std::collections::BTreeSet;

use crate::domain::{CircleError, FollowRequest, MediaRef, RelationshipState, Story, StoryId, UserRef};

use super::builder::Circle;

pub struct Session<'a> {
    circle: &'a Circle,
    user: Option<UserRef>,
}

impl<'a> Session<'a> {
    pub(crate) fn new(circle: &'a Circle, user: Option<UserRef>) -> Self {
        Self { circle, user }
    }

    pub fn user(&self) -> Option<&UserRef> {
        self.user.as_ref()
    }

    fn viewer(&self) -> Result<&UserRef, CircleError> {
        self.user.as_ref().ok_or(CircleError::Unauthenticated)
    }

    pub async fn request_follow(&self, target: &UserRef) -> Result<FollowRequest, CircleError> {
        let me = self.viewer()?;
        self.circle.follows().request_follow(me, target).await
    }

    pub async fn accept_request(&self, sender: &UserRef) -> Result<(), CircleError> {
        let me = self.viewer()?;
        self.circle.follows().accept_request(me, sender, me).await
    }

    pub async fn reject_request(&self, sender: &UserRef) -> Result<(), CircleError> {
        let me = self.viewer()?;
        self.circle.follows().reject_request(me, sender, me).await
    }

    pub async fn cancel_request(&self, receiver: &UserRef) -> Result<(), CircleError> {
        let me = self.viewer()?;
        self.circle.follows().cancel_request(me, me, receiver).await
    }

    pub async fn unfollow(&self, followee: &UserRef) -> Result<bool, CircleError> {
        let me = self.viewer()?;
        self.circle.follows().unfollow(me, me, followee).await
    }

    pub async fn feed(&self) -> Result<Vec<Story>, CircleError> {
        let me = self.viewer()?;
        self.circle.visibility().feed(me, self.circle.now()).await
    }

    pub async fn publish(&self, media_ref: MediaRef) -> Result<Story, CircleError> {
        let me = self.viewer()?;
        self.circle.ingest().publish(me, media_ref, self.circle.now()).await
    }

    /// Look up one story. Stories this user cannot see are `NotFound`.
    pub async fn story(&self, id: StoryId) -> Result<Story, CircleError> {
        let me = self.viewer()?;
        self.circle.visibility().story_for(me, id, self.circle.now()).await
    }

    pub async fn incoming_requests(&self) -> Result<Vec<FollowRequest>, CircleError> {
        let me = self.viewer()?;
        Ok(self.circle.relationships().list_incoming_requests(me).await?)
    }

    pub async fn outgoing_requests(&self) -> Result<Vec<FollowRequest>, CircleError> {
        let me = self.viewer()?;
        Ok(self.circle.relationships().list_outgoing_requests(me).await?)
    }

    pub async fn followers(&self) -> Result<BTreeSet<UserRef>, CircleError> {
        let me = self.viewer()?;
        Ok(self.circle.relationships().list_followers(me).await?)
    }

    pub async fn followees(&self) -> Result<BTreeSet<UserRef>, CircleError> {
        let me = self.viewer()?;
        Ok(self.circle.relationships().list_followees(me).await?)
    }

    /// State of `(me, other)`: do I follow them, or am I waiting on them?
    pub async fn relationship_with(&self, other: &UserRef) -> Result<RelationshipState, CircleError> {
        let me = self.viewer()?;
        self.circle.follows().state(me, other).await
    }
}
