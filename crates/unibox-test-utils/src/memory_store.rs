// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`KvStore`] implementation for deterministic testing.
//!
//! Semantics mirror the remote store: store-enforced TTL expiry, FIFO
//! lists, atomic counters, and fire-and-forget publish. TTLs are measured
//! with `tokio::time::Instant`, so tests using tokio's paused time can
//! advance the clock past expiry without wall-clock waits.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use unibox_core::KvStore;

#[derive(Default)]
struct Inner {
    values: HashMap<String, ValueEntry>,
    lists: HashMap<String, VecDeque<String>>,
    published: Vec<(String, String)>,
    pop_calls: HashMap<String, u64>,
}

struct ValueEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl ValueEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// An in-memory store for tests.
///
/// Beyond the `KvStore` operations it records pub/sub traffic
/// ([`published`](Self::published)), counts `list_pop` calls per key
/// ([`pop_calls`](Self::pop_calls)) for idle-poll assertions, and can
/// simulate an unreachable store ([`set_unavailable`](Self::set_unavailable)):
/// while unavailable every operation returns its sentinel, exactly as the
/// HTTP client does on transport failure.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the store being unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn is_unavailable(&self) -> bool {
        self.unavailable.load(Ordering::SeqCst)
    }

    /// All `(channel, message)` pairs published so far, in order.
    pub async fn published(&self) -> Vec<(String, String)> {
        self.inner.lock().await.published.clone()
    }

    /// Number of `list_pop` calls made against one key.
    pub async fn pop_calls(&self, key: &str) -> u64 {
        self.inner
            .lock()
            .await
            .pop_calls
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    /// Current length of a list, 0 when absent.
    pub async fn list_len(&self, key: &str) -> usize {
        self.inner
            .lock()
            .await
            .lists
            .get(key)
            .map(VecDeque::len)
            .unwrap_or(0)
    }

    /// Full contents of a list, head first.
    pub async fn list_contents(&self, key: &str) -> Vec<String> {
        self.inner
            .lock()
            .await
            .lists
            .get(key)
            .map(|l| l.iter().cloned().collect())
            .unwrap_or_default()
    }
}

/// Glob match supporting `*` as "any run of characters".
///
/// The store only ever receives low-cardinality patterns like
/// `typing:<chat>:*` and `stats:<platform>:*`.
fn glob_match(pattern: &str, key: &str) -> bool {
    fn inner(p: &[u8], k: &[u8]) -> bool {
        match (p.first(), k.first()) {
            (None, None) => true,
            (Some(b'*'), _) => inner(&p[1..], k) || (!k.is_empty() && inner(p, &k[1..])),
            (Some(pc), Some(kc)) if pc == kc => inner(&p[1..], &k[1..]),
            _ => false,
        }
    }
    inner(pattern.as_bytes(), key.as_bytes())
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn set(&self, key: &str, value: &str) -> bool {
        if self.is_unavailable() {
            return false;
        }
        self.inner.lock().await.values.insert(
            key.to_string(),
            ValueEntry {
                value: value.to_string(),
                expires_at: None,
            },
        );
        true
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> bool {
        if self.is_unavailable() {
            return false;
        }
        self.inner.lock().await.values.insert(
            key.to_string(),
            ValueEntry {
                value: value.to_string(),
                expires_at: Some(Instant::now() + std::time::Duration::from_secs(ttl_seconds)),
            },
        );
        true
    }

    async fn get(&self, key: &str) -> Option<String> {
        if self.is_unavailable() {
            return None;
        }
        let mut inner = self.inner.lock().await;
        if inner.values.get(key).is_some_and(ValueEntry::is_expired) {
            inner.values.remove(key);
            return None;
        }
        inner.values.get(key).map(|e| e.value.clone())
    }

    async fn delete(&self, key: &str) -> bool {
        if self.is_unavailable() {
            return false;
        }
        self.inner.lock().await.values.remove(key).is_some()
    }

    async fn list_push(&self, key: &str, value: &str) -> bool {
        if self.is_unavailable() {
            return false;
        }
        self.inner
            .lock()
            .await
            .lists
            .entry(key.to_string())
            .or_default()
            .push_back(value.to_string());
        true
    }

    async fn list_pop(&self, key: &str) -> Option<String> {
        let mut inner = self.inner.lock().await;
        *inner.pop_calls.entry(key.to_string()).or_default() += 1;
        if self.is_unavailable() {
            return None;
        }
        inner.lists.get_mut(key).and_then(VecDeque::pop_front)
    }

    async fn increment(&self, key: &str) -> i64 {
        if self.is_unavailable() {
            return 0;
        }
        let mut inner = self.inner.lock().await;
        let current = inner
            .values
            .get(key)
            .and_then(|e| e.value.parse::<i64>().ok())
            .unwrap_or(0);
        let next = current + 1;
        inner.values.insert(
            key.to_string(),
            ValueEntry {
                value: next.to_string(),
                expires_at: None,
            },
        );
        next
    }

    async fn scan_keys(&self, pattern: &str) -> Vec<String> {
        if self.is_unavailable() {
            return Vec::new();
        }
        let mut inner = self.inner.lock().await;
        inner.values.retain(|_, e| !e.is_expired());
        let mut keys: Vec<String> = inner
            .values
            .keys()
            .filter(|k| glob_match(pattern, k))
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    async fn publish(&self, channel: &str, message: &str) -> bool {
        if self.is_unavailable() {
            return false;
        }
        self.inner
            .lock()
            .await
            .published
            .push((channel.to_string(), message.to_string()));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn glob_match_basics() {
        assert!(glob_match("typing:c1:*", "typing:c1:u1"));
        assert!(!glob_match("typing:c1:*", "typing:c2:u1"));
        assert!(glob_match("*", "anything"));
        assert!(glob_match("stats:sms:*", "stats:sms:sent"));
        assert!(!glob_match("stats:sms:*", "stats:telegram:sent"));
    }

    #[tokio::test]
    async fn set_get_delete_lifecycle() {
        let store = MemoryStore::new();
        assert!(store.set("k", "v").await);
        assert_eq!(store.get("k").await.as_deref(), Some("v"));
        assert!(store.delete("k").await);
        assert_eq!(store.get("k").await, None);
        assert!(!store.delete("k").await);
    }

    #[tokio::test(start_paused = true)]
    async fn ttl_expiry_boundaries() {
        let store = MemoryStore::new();
        store.set_with_expiry("typing:c1:u1", "typing", 10).await;

        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(store.get("typing:c1:u1").await.as_deref(), Some("typing"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(store.get("typing:c1:u1").await, None);
        assert!(store.scan_keys("typing:c1:*").await.is_empty());
    }

    #[tokio::test]
    async fn list_is_fifo() {
        let store = MemoryStore::new();
        store.list_push("q", "a").await;
        store.list_push("q", "b").await;
        assert_eq!(store.list_pop("q").await.as_deref(), Some("a"));
        assert_eq!(store.list_pop("q").await.as_deref(), Some("b"));
        assert_eq!(store.list_pop("q").await, None);
        assert_eq!(store.pop_calls("q").await, 3);
    }

    #[tokio::test]
    async fn increment_is_monotonic() {
        let store = MemoryStore::new();
        assert_eq!(store.increment("c").await, 1);
        assert_eq!(store.increment("c").await, 2);
        assert_eq!(store.get("c").await.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn unavailable_store_returns_sentinels() {
        let store = MemoryStore::new();
        store.set("k", "v").await;
        store.set_unavailable(true);

        assert!(!store.set("k2", "v").await);
        assert_eq!(store.get("k").await, None);
        assert!(!store.list_push("q", "x").await);
        assert_eq!(store.increment("c").await, 0);
        assert!(store.scan_keys("*").await.is_empty());
        assert!(!store.publish("ch", "m").await);

        store.set_unavailable(false);
        assert_eq!(store.get("k").await.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn publish_records_in_order() {
        let store = MemoryStore::new();
        store.publish("messages", "one").await;
        store.publish("typing", "two").await;
        let published = store.published().await;
        assert_eq!(
            published,
            vec![
                ("messages".to_string(), "one".to_string()),
                ("typing".to_string(), "two".to_string()),
            ]
        );
    }
}
