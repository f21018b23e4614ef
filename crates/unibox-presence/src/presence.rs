// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typing indicators and user sessions.

use std::sync::Arc;

use tracing::{debug, warn};

use unibox_core::{keys, KvStore};

/// Store-enforced lifetime of a typing indicator, in seconds.
pub const DEFAULT_TYPING_TTL_SECS: u64 = 10;

/// Reads and writes `typing:<chat>:<user>` and `user:<userId>` keys.
///
/// Typing state lives entirely in the store's TTL: a key that expired is
/// "not typing", and no staleness check is layered on top. A user who
/// stopped typing without an explicit clear stays visible for up to the
/// TTL, which callers must tolerate.
#[derive(Clone)]
pub struct PresenceCache {
    store: Arc<dyn KvStore>,
    typing_ttl_secs: u64,
}

impl PresenceCache {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_ttl(store, DEFAULT_TYPING_TTL_SECS)
    }

    pub fn with_ttl(store: Arc<dyn KvStore>, typing_ttl_secs: u64) -> Self {
        Self {
            store,
            typing_ttl_secs,
        }
    }

    /// Mark or clear a user's typing indicator in a chat.
    ///
    /// Marking refreshes the TTL, so a client that keeps typing holds the
    /// indicator alive by re-calling this. Returns whether the store
    /// accepted the write.
    pub async fn set_typing(&self, user_id: &str, chat_id: &str, is_typing: bool) -> bool {
        let key = keys::typing(chat_id, user_id);
        let ok = if is_typing {
            self.store
                .set_with_expiry(&key, "typing", self.typing_ttl_secs)
                .await
        } else {
            self.store.delete(&key).await
        };
        if !ok {
            warn!(chat = chat_id, user = user_id, is_typing, "typing indicator write failed");
        }
        ok
    }

    /// Users currently typing in a chat, per the store's unexpired keys.
    pub async fn get_typing_users(&self, chat_id: &str) -> Vec<String> {
        self.store
            .scan_keys(&keys::typing_pattern(chat_id))
            .await
            .iter()
            .filter_map(|key| keys::typing_user_from_key(key))
            .map(str::to_string)
            .collect()
    }

    /// Overwrite a user's session blob. No TTL: presence transitions are
    /// pushed explicitly rather than inferred from expiry.
    pub async fn set_user_session(&self, user_id: &str, data: &str) -> bool {
        let ok = self.store.set(&keys::user(user_id), data).await;
        if ok {
            debug!(user = user_id, "session updated");
        } else {
            warn!(user = user_id, "session write failed");
        }
        ok
    }

    pub async fn get_user_session(&self, user_id: &str) -> Option<String> {
        self.store.get(&keys::user(user_id)).await
    }

    pub async fn delete_user_session(&self, user_id: &str) -> bool {
        self.store.delete(&keys::user(user_id)).await
    }
}
