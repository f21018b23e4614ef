// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ephemeral presence state and event fan-out.
//!
//! Everything here is best-effort by contract: typing indicators expire in
//! the store rather than being tracked in-process, sessions are plain
//! overwrite-on-write blobs, and broadcast publishes are fire-and-forget.
//! Nothing in this crate retries or caches.

pub mod broadcast;
pub mod presence;

pub use broadcast::Broadcaster;
pub use presence::PresenceCache;
