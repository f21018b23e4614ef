// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the delivery pipeline.
//!
//! Each test wires an in-memory store and mock senders through the real
//! processor, scheduler, and presence layers. Tests are independent and
//! order-insensitive.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use unibox_core::{keys, EventType, KvStore, Platform, PlatformSender, QueueMessage};
use unibox_presence::{Broadcaster, PresenceCache};
use unibox_queue::DeliveryProcessor;
use unibox_test_utils::{MemoryStore, MockSender, SendOutcome};

fn queue_config() -> unibox_config::model::QueueConfig {
    unibox_config::model::QueueConfig {
        max_retries: 3,
        base_delay_ms: 100,
        poll_interval_ms: 20,
        error_backoff_secs: 5,
    }
}

fn pipeline(
    store: Arc<MemoryStore>,
    sender: Arc<MockSender>,
    platform: Platform,
) -> Arc<DeliveryProcessor> {
    let mut senders: HashMap<Platform, Arc<dyn PlatformSender>> = HashMap::new();
    senders.insert(platform, sender);
    Arc::new(DeliveryProcessor::new(store, senders, &queue_config()))
}

async fn wait_until<F, Fut>(mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    tokio::time::timeout(Duration::from_secs(120), async {
        loop {
            if condition().await {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

// ---- Scenario 1: healthy delivery ----

#[tokio::test(start_paused = true)]
async fn hundred_messages_deliver_in_order_with_accurate_counters() {
    let store = Arc::new(MemoryStore::new());
    let sender = Arc::new(MockSender::succeeding("telegram"));
    let processor = pipeline(store.clone(), sender.clone(), Platform::Telegram);

    for i in 1..=100 {
        let msg = QueueMessage::new(
            Platform::Telegram,
            "app",
            Some(format!("r{i}")),
            format!("message {i}"),
        );
        assert!(processor.queue().enqueue(&msg).await);
    }

    let token = CancellationToken::new();
    let handles = processor.spawn_all(&token);

    let sender_done = sender.clone();
    wait_until(|| {
        let sender = sender_done.clone();
        async move { sender.dispatch_count().await == 100 }
    })
    .await;

    let recipients: Vec<String> = sender
        .dispatches()
        .await
        .into_iter()
        .map(|(r, _)| r)
        .collect();
    let expected: Vec<String> = (1..=100).map(|i| format!("r{i}")).collect();
    assert_eq!(recipients, expected);

    let snapshot = processor.stats().snapshot().await;
    assert_eq!(snapshot.count(Platform::Telegram, EventType::Queued), 100);
    assert_eq!(snapshot.count(Platform::Telegram, EventType::Sent), 100);
    assert_eq!(snapshot.count(Platform::Telegram, EventType::Failed), 0);

    token.cancel();
    for handle in handles {
        handle.await.unwrap();
    }
}

// ---- Scenario 2: transient failure recovers through retries ----

#[tokio::test(start_paused = true)]
async fn flaky_platform_recovers_and_cleans_up_retry_records() {
    let store = Arc::new(MemoryStore::new());
    let sender = Arc::new(MockSender::succeeding("sms"));
    sender.script(SendOutcome::Rejected).await;
    sender.script(SendOutcome::Rejected).await;
    let processor = pipeline(store.clone(), sender.clone(), Platform::Sms);

    let msg = QueueMessage::new(Platform::Sms, "app", Some("r1".to_string()), "eventually");
    let record_key = keys::message(&msg.id);
    processor.queue().enqueue(&msg).await;

    let token = CancellationToken::new();
    let handles = processor.spawn_all(&token);

    let sender_done = sender.clone();
    wait_until(|| {
        let sender = sender_done.clone();
        async move { sender.dispatch_count().await == 3 }
    })
    .await;

    // The deferred resubmission removes its record after re-queueing.
    let store_done = store.clone();
    let key = record_key.clone();
    wait_until(|| {
        let store = store_done.clone();
        let key = key.clone();
        async move { store.get(&key).await.is_none() }
    })
    .await;

    let snapshot = processor.stats().snapshot().await;
    assert_eq!(snapshot.count(Platform::Sms, EventType::Sent), 1);
    assert_eq!(snapshot.count(Platform::Sms, EventType::Failed), 0);
    assert_eq!(store.list_len("sms_failed").await, 0);

    token.cancel();
    for handle in handles {
        handle.await.unwrap();
    }
}

// ---- Scenario 3: a failing platform does not stall the others ----

#[tokio::test(start_paused = true)]
async fn failing_telegram_does_not_stall_messenger() {
    let store = Arc::new(MemoryStore::new());
    let telegram = Arc::new(MockSender::failing("telegram"));
    let messenger = Arc::new(MockSender::succeeding("messenger"));

    let mut senders: HashMap<Platform, Arc<dyn PlatformSender>> = HashMap::new();
    senders.insert(Platform::Telegram, telegram.clone());
    senders.insert(Platform::Messenger, messenger.clone());
    let processor = Arc::new(DeliveryProcessor::new(
        store.clone(),
        senders,
        &queue_config(),
    ));

    for i in 1..=10 {
        let tg = QueueMessage::new(
            Platform::Telegram,
            "app",
            Some("r1".to_string()),
            format!("stuck {i}"),
        );
        let fb = QueueMessage::new(
            Platform::Messenger,
            "app",
            Some("r2".to_string()),
            format!("flows {i}"),
        );
        processor.queue().enqueue(&tg).await;
        processor.queue().enqueue(&fb).await;
    }

    let token = CancellationToken::new();
    let handles = processor.spawn_all(&token);
    assert_eq!(handles.len(), 2);

    let messenger_done = messenger.clone();
    wait_until(|| {
        let sender = messenger_done.clone();
        async move { sender.dispatch_count().await == 10 }
    })
    .await;

    let snapshot = processor.stats().snapshot().await;
    assert_eq!(snapshot.count(Platform::Messenger, EventType::Sent), 10);
    assert_eq!(snapshot.count(Platform::Messenger, EventType::Failed), 0);

    token.cancel();
    for handle in handles {
        handle.await.unwrap();
    }
}

// ---- Scenario 4: typing indicators expire on their own ----

#[tokio::test(start_paused = true)]
async fn typing_indicator_appears_then_expires() {
    let store = Arc::new(MemoryStore::new());
    let presence = PresenceCache::new(store.clone());

    presence.set_typing("u1", "c1", true).await;
    assert_eq!(presence.get_typing_users("c1").await, vec!["u1".to_string()]);

    tokio::time::advance(Duration::from_secs(11)).await;
    assert!(presence.get_typing_users("c1").await.is_empty());
}

// ---- Scenario 5: broadcast fans out alongside delivery ----

#[tokio::test(start_paused = true)]
async fn delivery_and_broadcast_share_one_store() {
    let store = Arc::new(MemoryStore::new());
    let sender = Arc::new(MockSender::succeeding("messenger"));
    let processor = pipeline(store.clone(), sender.clone(), Platform::Messenger);
    let broadcaster = Broadcaster::new(store.clone());

    let msg = QueueMessage::new(
        Platform::Messenger,
        "app",
        Some("r1".to_string()),
        "fanned out",
    );
    processor.queue().enqueue(&msg).await;
    broadcaster.broadcast_message(&msg).await;

    let token = CancellationToken::new();
    let handles = processor.spawn_all(&token);

    let sender_done = sender.clone();
    wait_until(|| {
        let sender = sender_done.clone();
        async move { sender.dispatch_count().await == 1 }
    })
    .await;

    let published = store.published().await;
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, "messages");

    token.cancel();
    for handle in handles {
        handle.await.unwrap();
    }
}
