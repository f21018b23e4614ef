// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value store trait backing queues, counters, presence, and pub/sub.

use async_trait::async_trait;

/// The narrow store surface every other component is built on.
///
/// Contract: operations never fail visibly. Transport and command errors
/// are absorbed into the sentinel value for each return type (`false`,
/// `None`, `0`, empty vec), so callers must treat a store failure as
/// logically equivalent to "key absent / operation had no effect" and rely
/// on the retry layer above for resilience. The trade-off is deliberate:
/// callers cannot distinguish "not found" from "could not reach the store".
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Unconditional overwrite, no TTL.
    async fn set(&self, key: &str, value: &str) -> bool;

    /// Overwrite with a store-enforced TTL; after `ttl_seconds` the key
    /// reads as absent. The client never re-checks expiry itself.
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> bool;

    /// Returns `None` on an absent key or on any transport error.
    async fn get(&self, key: &str) -> Option<String>;

    async fn delete(&self, key: &str) -> bool;

    /// Appends to the tail of an ordered list, creating it if absent.
    async fn list_push(&self, key: &str, value: &str) -> bool;

    /// Removes and returns the head element, `None` when empty or absent.
    /// Together with [`list_push`](Self::list_push) this defines per-key
    /// FIFO order; pop atomicity is the store's responsibility.
    async fn list_pop(&self, key: &str) -> Option<String>;

    /// Atomic-at-the-store counter increment; returns the new value, or 0
    /// on failure (ambiguous with a value legitimately becoming 0).
    async fn increment(&self, key: &str) -> i64;

    /// Glob-style key enumeration, empty on error. Only used for
    /// low-cardinality scans (typing users in one chat, stats for one
    /// platform), never for unbounded enumeration.
    async fn scan_keys(&self, pattern: &str) -> Vec<String>;

    /// Fire-and-forget broadcast; no delivery guarantee if nobody is
    /// listening on the channel.
    async fn publish(&self, channel: &str, message: &str) -> bool;
}
