//! VisibilityEngine - "誰が何を見られるか" の唯一の判定場所
//!
//! feed 用の読み取りはすべてここを通ります。期限切れのフィルタも
//! `Story::is_visible_to` 一箇所に集約しています。
//!
//! 結果はキャッシュしません。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{CircleError, Story, StoryId, UserRef, feed_order};
use crate::ports::{ContentStore, RelationshipStore};

pub struct VisibilityEngine {
    relationships: Arc<dyn RelationshipStore>,
    content: Arc<dyn ContentStore>,
    max_items: Option<usize>,
}

impl VisibilityEngine {
    pub fn new(
        relationships: Arc<dyn RelationshipStore>,
        content: Arc<dyn ContentStore>,
        max_items: Option<usize>,
    ) -> Self {
        Self {
            relationships,
            content,
            max_items,
        }
    }

    /// Live stories by `viewer` and everyone `viewer` follows, newest first.
    ///
    /// The followee set is read once, before the stories, and that one set
    /// decides visibility for the whole call.
    pub async fn feed(&self, viewer: &UserRef, now: DateTime<Utc>) -> Result<Vec<Story>, CircleError> {
        let followees = self.relationships.list_followees(viewer).await?;

        let mut authors = followees.clone();
        authors.insert(viewer.clone());

        let mut stories: Vec<Story> = self
            .content
            .list_by_authors(&authors)
            .await?
            .into_iter()
            .filter(|story| story.is_visible_to(viewer, followees.contains(&story.author), now))
            .collect();
        stories.sort_by(feed_order);
        if let Some(max) = self.max_items {
            stories.truncate(max);
        }

        debug!(%viewer, authors = authors.len(), visible = stories.len(), "feed computed");
        Ok(stories)
    }

    /// Fetch one story for `viewer`.
    ///
    /// Missing, expired and not-visible stories all come back as `NotFound`.
    pub async fn story_for(
        &self,
        viewer: &UserRef,
        id: StoryId,
        now: DateTime<Utc>,
    ) -> Result<Story, CircleError> {
        let story = self.content.get(id).await?.ok_or(CircleError::NotFound(id))?;
        let follows_author = viewer != &story.author
            && self.relationships.edge_exists(viewer, &story.author).await?;
        if story.is_visible_to(viewer, follows_author, now) {
            Ok(story)
        } else {
            Err(CircleError::NotFound(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FollowStateMachine;
    use crate::domain::MediaRef;
    use crate::impls::{InMemoryContentStore, InMemoryRelationshipStore, NoopEventSink};
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use ulid::Ulid;

    struct Fixture {
        follows: FollowStateMachine,
        content: Arc<InMemoryContentStore>,
        engine: VisibilityEngine,
    }

    fn fixture(max_items: Option<usize>) -> Fixture {
        let relationships: Arc<dyn RelationshipStore> = Arc::new(InMemoryRelationshipStore::new());
        let content = Arc::new(InMemoryContentStore::new());
        Fixture {
            follows: FollowStateMachine::new(Arc::clone(&relationships), Arc::new(NoopEventSink)),
            engine: VisibilityEngine::new(relationships, content.clone(), max_items),
            content,
        }
    }

    fn user(name: &str) -> UserRef {
        UserRef::new(name).unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    async fn put_story(content: &InMemoryContentStore, author: &UserRef, at: DateTime<Utc>) -> Story {
        let story = Story::new(
            StoryId::from_ulid(Ulid::new()),
            author.clone(),
            MediaRef::new(format!("https://cdn.example/{}.jpg", Ulid::new())).unwrap(),
            at,
        );
        content.put(story.clone()).await.unwrap();
        story
    }

    async fn follow(f: &Fixture, follower: &UserRef, followee: &UserRef) {
        f.follows.request_follow(follower, followee).await.unwrap();
        f.follows.accept_request(followee, follower, followee).await.unwrap();
    }

    #[tokio::test]
    async fn feed_contains_own_and_followed_stories_only() {
        let f = fixture(None);
        let (a, b, c) = (user("alice"), user("bob"), user("carol"));
        follow(&f, &a, &b).await;

        let own = put_story(&f.content, &a, t0()).await;
        let followed = put_story(&f.content, &b, t0() + Duration::minutes(1)).await;
        put_story(&f.content, &c, t0()).await;

        let feed = f.engine.feed(&a, t0() + Duration::minutes(2)).await.unwrap();
        assert_eq!(feed, vec![followed, own]);
    }

    #[tokio::test]
    async fn pending_request_grants_nothing() {
        let f = fixture(None);
        let (a, b) = (user("alice"), user("bob"));
        f.follows.request_follow(&a, &b).await.unwrap();
        put_story(&f.content, &b, t0()).await;

        assert!(f.engine.feed(&a, t0()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn follows_are_not_transitive() {
        let f = fixture(None);
        let (a, b, c) = (user("alice"), user("bob"), user("carol"));
        follow(&f, &a, &b).await;
        follow(&f, &b, &c).await;
        put_story(&f.content, &c, t0()).await;

        assert!(f.engine.feed(&a, t0()).await.unwrap().is_empty());
        assert_eq!(f.engine.feed(&b, t0()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn story_expires_after_24_hours() {
        let f = fixture(None);
        let (a, b) = (user("alice"), user("bob"));
        follow(&f, &a, &b).await;
        let story = put_story(&f.content, &b, t0()).await;

        let before = t0() + Duration::hours(23) + Duration::minutes(59);
        let after = t0() + Duration::hours(24) + Duration::minutes(1);

        for viewer in [&a, &b] {
            assert_eq!(f.engine.feed(viewer, before).await.unwrap(), vec![story.clone()]);
            assert!(f.engine.feed(viewer, after).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn unfollow_removes_stories_from_feed() {
        let f = fixture(None);
        let (a, b) = (user("alice"), user("bob"));
        follow(&f, &a, &b).await;
        put_story(&f.content, &b, t0()).await;
        assert_eq!(f.engine.feed(&a, t0()).await.unwrap().len(), 1);

        f.follows.unfollow(&a, &a, &b).await.unwrap();

        assert!(f.engine.feed(&a, t0()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn feed_is_truncated_after_sorting() {
        let f = fixture(Some(2));
        let a = user("alice");
        put_story(&f.content, &a, t0()).await;
        let second = put_story(&f.content, &a, t0() + Duration::minutes(1)).await;
        let newest = put_story(&f.content, &a, t0() + Duration::minutes(2)).await;

        let feed = f.engine.feed(&a, t0() + Duration::minutes(3)).await.unwrap();
        assert_eq!(feed, vec![newest, second]);
    }

    #[tokio::test]
    async fn story_for_hides_invisible_stories() {
        let f = fixture(None);
        let (a, b, c) = (user("alice"), user("bob"), user("carol"));
        follow(&f, &a, &b).await;
        let story = put_story(&f.content, &b, t0()).await;

        assert_eq!(f.engine.story_for(&a, story.id, t0()).await.unwrap(), story);
        assert_eq!(f.engine.story_for(&b, story.id, t0()).await.unwrap(), story);
        assert_eq!(
            f.engine.story_for(&c, story.id, t0()).await.unwrap_err(),
            CircleError::NotFound(story.id)
        );
        assert_eq!(
            f.engine.story_for(&a, story.id, t0() + Duration::days(1)).await.unwrap_err(),
            CircleError::NotFound(story.id)
        );
    }

    // ---- property: feed == brute-force predicate ----

    const USERS: [&str; 4] = ["u0", "u1", "u2", "u3"];

    #[derive(Debug, Clone)]
    enum Op {
        Request(usize, usize),
        Accept(usize, usize),
        Reject(usize, usize),
        Cancel(usize, usize),
        Unfollow(usize, usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        let pair = (0..USERS.len(), 0..USERS.len());
        prop_oneof![
            3 => pair.clone().prop_map(|(a, b)| Op::Request(a, b)),
            3 => pair.clone().prop_map(|(a, b)| Op::Accept(a, b)),
            1 => pair.clone().prop_map(|(a, b)| Op::Reject(a, b)),
            1 => pair.clone().prop_map(|(a, b)| Op::Cancel(a, b)),
            1 => pair.prop_map(|(a, b)| Op::Unfollow(a, b)),
        ]
    }

    /// (author index, minutes offset from t0)
    fn story_strategy() -> impl Strategy<Value = (usize, i64)> {
        (0..USERS.len(), 0i64..(3 * 24 * 60))
    }

    async fn check_feed_matches_predicate(
        ops: Vec<Op>,
        stories: Vec<(usize, i64)>,
        viewer: usize,
        now_minutes: i64,
    ) {
        let f = fixture(None);
        let users: Vec<UserRef> = USERS.iter().map(|u| user(u)).collect();

        // store とは独立したモデル: (follower, followee) / (sender, receiver)
        let mut edges: BTreeSet<(usize, usize)> = BTreeSet::new();
        let mut pending: BTreeSet<(usize, usize)> = BTreeSet::new();

        // 失敗する遷移も含めて適用し、結果がモデルの予測と一致することを確認する
        for op in ops {
            match op {
                Op::Request(a, b) => {
                    let result = f.follows.request_follow(&users[a], &users[b]).await;
                    let allowed = a != b && !edges.contains(&(a, b)) && !pending.contains(&(a, b));
                    assert_eq!(result.is_ok(), allowed, "request {a}->{b}");
                    if allowed {
                        pending.insert((a, b));
                    }
                }
                Op::Accept(a, b) => {
                    let result = f.follows.accept_request(&users[b], &users[a], &users[b]).await;
                    assert_eq!(result.is_ok(), pending.remove(&(a, b)), "accept {a}->{b}");
                    if result.is_ok() {
                        edges.insert((a, b));
                    }
                }
                Op::Reject(a, b) => {
                    let result = f.follows.reject_request(&users[b], &users[a], &users[b]).await;
                    assert_eq!(result.is_ok(), pending.remove(&(a, b)), "reject {a}->{b}");
                }
                Op::Cancel(a, b) => {
                    let result = f.follows.cancel_request(&users[a], &users[a], &users[b]).await;
                    assert_eq!(result.is_ok(), pending.remove(&(a, b)), "cancel {a}->{b}");
                }
                Op::Unfollow(a, b) => {
                    let removed = f.follows.unfollow(&users[a], &users[a], &users[b]).await.unwrap();
                    assert_eq!(removed, edges.remove(&(a, b)), "unfollow {a}->{b}");
                }
            }
        }

        // store の edge / pending request がモデルと一致する
        for (i, a) in users.iter().enumerate() {
            let followees: BTreeSet<usize> = f
                .follows
                .store()
                .list_followees(a)
                .await
                .unwrap()
                .iter()
                .filter_map(|u| users.iter().position(|x| x == u))
                .collect();
            let modeled: BTreeSet<usize> = edges.iter().filter(|(x, _)| *x == i).map(|(_, y)| *y).collect();
            assert_eq!(followees, modeled);

            let outgoing: BTreeSet<usize> = f
                .follows
                .store()
                .list_outgoing_requests(a)
                .await
                .unwrap()
                .iter()
                .filter_map(|r| users.iter().position(|x| x == &r.receiver))
                .collect();
            let modeled: BTreeSet<usize> = pending.iter().filter(|(x, _)| *x == i).map(|(_, y)| *y).collect();
            assert_eq!(outgoing, modeled);
        }

        let mut all = Vec::new();
        let mut story_authors = Vec::new();
        for (author, offset) in stories {
            all.push(put_story(&f.content, &users[author], t0() + Duration::minutes(offset)).await);
            story_authors.push(author);
        }

        let now = t0() + Duration::minutes(now_minutes);

        let mut expected: Vec<Story> = all
            .iter()
            .zip(&story_authors)
            .filter(|(story, author)| {
                now < story.expires_at && (**author == viewer || edges.contains(&(viewer, **author)))
            })
            .map(|(story, _)| story.clone())
            .collect();
        expected.sort_by(feed_order);

        let feed = f.engine.feed(&users[viewer], now).await.unwrap();
        assert_eq!(feed, expected);

        // 自分自身への edge は決して作られない
        assert!(edges.iter().all(|(a, b)| a != b));
        let ids: BTreeSet<_> = feed.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), feed.len());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn feed_matches_visibility_predicate(
            ops in proptest::collection::vec(op_strategy(), 0..40),
            stories in proptest::collection::vec(story_strategy(), 0..20),
            viewer in 0..USERS.len(),
            now_minutes in 0i64..(5 * 24 * 60),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(check_feed_matches_predicate(ops, stories, viewer, now_minutes));
        }
    }
}
