use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use circle_core::domain::{DomainEvent, RelationshipState};
use circle_core::ports::{Anonymous, EventSink, EventSinkError, StaticIdentity};
use circle_core::{CircleBuilder, CircleConfig, CircleError, MediaRef, Story, UserRef};

/// Prints each domain event as one JSON line on stdout.
struct JsonLinesSink;

#[async_trait]
impl EventSink for JsonLinesSink {
    async fn emit(&self, event: DomainEvent) -> Result<(), EventSinkError> {
        let line = serde_json::to_string(&event).map_err(|e| EventSinkError(e.to_string()))?;
        println!("event: {line}");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct FeedSummary<'a> {
    viewer: &'a UserRef,
    stories: Vec<&'a Story>,
}

fn load_config() -> Result<CircleConfig, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "loading config");
            Ok(CircleConfig::from_json_file(path)?)
        }
        None => Ok(CircleConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // (A) 設定を読んで Circle を組み立てる
    let config = load_config()?;
    let circle = CircleBuilder::new()
        .with_config(config)
        .with_event_sink(Arc::new(JsonLinesSink))
        .build()?;
    let reaper = circle.spawn_reaper();

    let alice = UserRef::new("alice")?;
    let bob = UserRef::new("bob")?;
    let carol = UserRef::new("carol")?;
    let as_alice = circle.session(&StaticIdentity(alice.clone()));
    let as_bob = circle.session(&StaticIdentity(bob.clone()));
    let as_carol = circle.session(&StaticIdentity(carol.clone()));

    // (B) follow request: alice -> bob は承認、carol -> bob は拒否
    as_alice.request_follow(&bob).await?;
    as_carol.request_follow(&bob).await?;
    for request in as_bob.incoming_requests().await? {
        info!(sender = %request.sender, "pending on bob");
    }
    as_bob.accept_request(&alice).await?;
    as_bob.reject_request(&carol).await?;

    if let Err(err) = as_alice.request_follow(&bob).await {
        warn!(error = %err, status = err.status_code(), "second request refused");
    }

    // (C) story を公開して feed を確認
    as_bob.publish(MediaRef::new("https://cdn.example/bob/sunrise.jpg")?).await?;
    as_alice.publish(MediaRef::new("https://cdn.example/alice/coffee.jpg")?).await?;

    for (viewer, session) in [(&alice, &as_alice), (&bob, &as_bob), (&carol, &as_carol)] {
        let feed = session.feed().await?;
        let summary = FeedSummary {
            viewer,
            stories: feed.iter().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    // 拒否された後は None に戻り、もう一度 request できる
    if as_carol.relationship_with(&bob).await? == RelationshipState::None {
        as_carol.request_follow(&bob).await?;
    }

    // (D) 未ログインでは何もできない
    match circle.session(&Anonymous).feed().await {
        Err(CircleError::Unauthenticated) => info!("anonymous feed refused"),
        other => warn!(?other, "anonymous feed unexpectedly answered"),
    }

    // (E) reaper を止めて終了
    if let Some(reaper) = reaper {
        reaper.shutdown_and_join().await;
    }
    Ok(())
}
