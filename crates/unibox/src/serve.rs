// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `unibox serve` command implementation.
//!
//! Builds the store client and the per-platform sender table, spawns one
//! delivery processor per configured platform, and runs until SIGINT or
//! SIGTERM cancels the shared token.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use unibox_config::model::{SenderEndpointConfig, UniboxConfig};
use unibox_core::{KvStore, Platform, PlatformSender, UniboxError};
use unibox_queue::DeliveryProcessor;
use unibox_store::HttpStore;

use crate::sender::WebhookSender;
use crate::shutdown;

fn endpoint_for(config: &UniboxConfig, platform: Platform) -> &SenderEndpointConfig {
    match platform {
        Platform::Telegram => &config.telegram,
        Platform::Messenger => &config.messenger,
        Platform::Twitter => &config.twitter,
        Platform::Sms => &config.sms,
    }
}

/// One sender per platform with a configured webhook URL. Platforms left
/// unconfigured simply get no processor.
fn build_sender_table(
    config: &UniboxConfig,
) -> Result<HashMap<Platform, Arc<dyn PlatformSender>>, UniboxError> {
    let mut senders: HashMap<Platform, Arc<dyn PlatformSender>> = HashMap::new();

    for platform in Platform::ALL {
        match &endpoint_for(config, platform).webhook_url {
            Some(url) => {
                let sender = WebhookSender::new(platform.to_string(), url.clone())?;
                info!(platform = %platform, url, "sender configured");
                senders.insert(platform, Arc::new(sender));
            }
            None => {
                info!(platform = %platform, "no webhook configured, platform disabled");
            }
        }
    }

    Ok(senders)
}

/// Runs the `unibox serve` command.
pub async fn run_serve(config: UniboxConfig) -> Result<(), UniboxError> {
    init_tracing(&config.service.log_level);

    info!("starting unibox serve");

    let store: Arc<dyn KvStore> = Arc::new(HttpStore::new(&config.store)?);
    info!(base_url = %config.store.base_url, "store client ready");

    let senders = build_sender_table(&config)?;
    if senders.is_empty() {
        warn!("no platform webhooks configured, nothing will be delivered");
    }

    let processor = Arc::new(DeliveryProcessor::new(store, senders, &config.queue));

    let cancel = shutdown::install_signal_handler();
    let handles = processor.spawn_all(&cancel);
    info!(processors = handles.len(), "delivery processors running");

    cancel.cancelled().await;

    // Each loop finishes its current message before observing the token.
    for handle in handles {
        if let Err(e) = handle.await {
            warn!(error = %e, "processor task did not shut down cleanly");
        }
    }

    info!("unibox serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("unibox={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
