// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store key naming conventions.
//!
//! These formats are part of the external contract: anything inspecting the
//! remote store directly (operators, the UI layer) depends on them. The
//! dead-letter list in particular is `<platform>_failed`, NOT prefixed with
//! `queue:`.

use crate::types::{EventType, Platform};

/// Live delivery queue for a platform: `queue:<platform>`.
pub fn queue(platform: Platform) -> String {
    format!("queue:{platform}")
}

/// Dead-letter list for a platform: `<platform>_failed`.
pub fn dead_letter(platform: Platform) -> String {
    format!("{platform}_failed")
}

/// Stats counter key: `stats:<platform>:<event>`.
pub fn stats(platform: Platform, event: EventType) -> String {
    format!("stats:{platform}:{event}")
}

/// Glob pattern matching all stats counters for one platform.
pub fn stats_pattern(platform: Platform) -> String {
    format!("stats:{platform}:*")
}

/// Persisted retry record for a message awaiting resubmission: `msg:<id>`.
pub fn message(id: &str) -> String {
    format!("msg:{id}")
}

/// Typing indicator key: `typing:<chatId>:<userId>`.
pub fn typing(chat_id: &str, user_id: &str) -> String {
    format!("typing:{chat_id}:{user_id}")
}

/// Glob pattern matching all typing indicators in one chat.
pub fn typing_pattern(chat_id: &str) -> String {
    format!("typing:{chat_id}:*")
}

/// User session blob key: `user:<userId>`.
pub fn user(user_id: &str) -> String {
    format!("user:{user_id}")
}

/// Extracts the trailing `userId` segment from a `typing:<chatId>:<userId>` key.
///
/// Returns `None` for keys that do not have at least three `:`-separated
/// segments.
pub fn typing_user_from_key(key: &str) -> Option<&str> {
    let mut parts = key.splitn(3, ':');
    let prefix = parts.next()?;
    let _chat = parts.next()?;
    let user = parts.next()?;
    if prefix != "typing" || user.is_empty() {
        return None;
    }
    Some(user)
}

/// Extracts the trailing `<event>` segment of a `stats:<platform>:<event>` key.
pub fn stats_event_from_key(key: &str) -> Option<EventType> {
    let event = key.rsplit(':').next()?;
    event.parse().ok()
}
