// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./unibox.toml` > `~/.config/unibox/unibox.toml`
//! > `/etc/unibox/unibox.toml` with environment variable overrides via the
//! `UNIBOX_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::UniboxConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/unibox/unibox.toml` (system-wide)
/// 3. `~/.config/unibox/unibox.toml` (user XDG config)
/// 4. `./unibox.toml` (local directory)
/// 5. `UNIBOX_*` environment variables
pub fn load_config() -> Result<UniboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(UniboxConfig::default()))
        .merge(Toml::file("/etc/unibox/unibox.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("unibox/unibox.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("unibox.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<UniboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(UniboxConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<UniboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(UniboxConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `UNIBOX_STORE_BASE_URL` must map to
/// `store.base_url`, not `store.base.url`.
fn env_provider() -> Env {
    Env::prefixed("UNIBOX_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: UNIBOX_QUEUE_MAX_RETRIES -> "queue_max_retries"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("store_", "store.", 1)
            .replacen("queue_", "queue.", 1)
            .replacen("presence_", "presence.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("messenger_", "messenger.", 1)
            .replacen("twitter_", "twitter.", 1)
            .replacen("sms_", "sms.", 1);
        mapped.into()
    })
}
