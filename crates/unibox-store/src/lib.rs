// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP command-protocol client for the remote key-value store.
//!
//! The remote store exposes a single endpoint, `POST <base-url>/redis`,
//! accepting a `{"command", "args"}` JSON body and returning a string
//! payload on 200. [`HttpStore`] translates the [`KvStore`] operations into
//! that protocol. No other component talks to the store directly.

pub mod client;

pub use client::HttpStore;
