//! ExpiryReaper - 期限切れ Story の物理削除
//!
//! # フロー
//! 1. 一定間隔で `ContentStore::purge_expired(clock.now())` を呼ぶ
//! 2. 何か削除したら `StoriesPurged` を送る
//!
//! 可視性の正しさはこのループに依存しません（feed 側で常にフィルタする）。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::emit_event;
use crate::domain::{CircleError, DomainEvent};
use crate::ports::{Clock, ContentStore, EventSink};

pub struct ExpiryReaper {
    content: Arc<dyn ContentStore>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
    interval: Duration,
}

/// Handle to a running reaper.
/// - `shutdown_tx` を drop するとループが止まる
/// - `shutdown_and_join()` で終了を待てる
pub struct ReaperHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl ReaperHandle {
    pub fn request_shutdown(&self) {
        // receiver がもういなくても無視してよい
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        let _ = self.join.await;
    }
}

impl ExpiryReaper {
    pub fn new(
        content: Arc<dyn ContentStore>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
        interval: Duration,
    ) -> Self {
        Self {
            content,
            clock,
            events,
            interval,
        }
    }

    /// One purge pass. Returns how many stories were removed.
    pub async fn run_once(&self) -> Result<usize, CircleError> {
        let now = self.clock.now();
        let count = self.content.purge_expired(now).await?;
        if count > 0 {
            info!(count, %now, "purged expired stories");
            emit_event(self.events.as_ref(), DomainEvent::StoriesPurged { count, at: now }).await;
        } else {
            debug!(%now, "no expired stories");
        }
        Ok(count)
    }

    /// Run `run_once` every `interval` until shutdown is requested.
    pub fn spawn(self) -> ReaperHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                if *shutdown_rx.borrow() {
                    break;
                }
                tokio::select! {
                    changed = shutdown_rx.changed() => {
                        // sender が drop されたら終了
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        if let Err(err) = self.run_once().await {
                            warn!(error = %err, "expiry reaper pass failed");
                        }
                    }
                }
            }
            debug!("expiry reaper stopped");
        });
        ReaperHandle { shutdown_tx, join }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MediaRef, Story, StoryId, UserRef};
    use crate::impls::{InMemoryContentStore, NoopEventSink};
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};
    use ulid::Ulid;

    async fn seeded(clock: &FixedClock) -> Arc<InMemoryContentStore> {
        let content = Arc::new(InMemoryContentStore::new());
        let story = Story::new(
            StoryId::from_ulid(Ulid::new()),
            UserRef::new("alice").unwrap(),
            MediaRef::new("m").unwrap(),
            clock.now(),
        );
        content.put(story).await.unwrap();
        content
    }

    #[tokio::test]
    async fn run_once_purges_after_expiry() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
        let content = seeded(&clock).await;
        let reaper = ExpiryReaper::new(
            content.clone(),
            Arc::new(clock.clone()),
            Arc::new(NoopEventSink),
            Duration::from_secs(60),
        );

        assert_eq!(reaper.run_once().await.unwrap(), 0);

        clock.advance(chrono::Duration::hours(24));
        assert_eq!(reaper.run_once().await.unwrap(), 1);
        assert_eq!(content.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn spawned_reaper_stops_on_shutdown() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
        let content = seeded(&clock).await;
        clock.advance(chrono::Duration::days(2));

        let handle = ExpiryReaper::new(
            content.clone(),
            Arc::new(clock.clone()),
            Arc::new(NoopEventSink),
            Duration::from_millis(10),
        )
        .spawn();

        // 最初の tick は即座に発火する
        tokio::time::timeout(Duration::from_secs(5), async {
            while content.count().await.unwrap() > 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle.shutdown_and_join())
            .await
            .unwrap();
    }
}
