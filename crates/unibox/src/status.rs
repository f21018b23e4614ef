// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `unibox status` command implementation.
//!
//! Reads the per-platform delivery counters straight from the remote store
//! and prints a table or JSON. An unreachable store shows as all-zero
//! counters, matching the sentinel contract of the store client; the
//! counters themselves cannot distinguish "no traffic" from "no store".

use std::io::IsTerminal;
use std::sync::Arc;

use unibox_config::model::UniboxConfig;
use unibox_core::{EventType, KvStore, Platform, QueueStats, UniboxError};
use unibox_queue::StatsRecorder;
use unibox_store::HttpStore;

/// Run the `unibox status` command.
///
/// If `--json` is passed, outputs the full snapshot as JSON for scripting.
/// If `--plain` is passed or stdout is not a TTY, disables colors.
pub async fn run_status(config: &UniboxConfig, json: bool, plain: bool) -> Result<(), UniboxError> {
    let store: Arc<dyn KvStore> = Arc::new(HttpStore::new(&config.store)?);
    let snapshot = StatsRecorder::new(store).snapshot().await;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_table(&snapshot, use_color);
    }

    Ok(())
}

fn print_table(snapshot: &QueueStats, use_color: bool) {
    println!();
    println!("  unibox delivery counters");
    println!("  {}", "-".repeat(44));
    println!("    {:<12} {:>8} {:>8} {:>8}", "platform", "queued", "sent", "failed");

    for platform in Platform::ALL {
        let queued = snapshot.count(platform, EventType::Queued);
        let sent = snapshot.count(platform, EventType::Sent);
        let failed = snapshot.count(platform, EventType::Failed);

        // Pad before coloring so the ANSI codes do not skew the columns.
        let failed_cell = if use_color && failed > 0 {
            use colored::Colorize;
            format!("{failed:>8}").red().to_string()
        } else {
            format!("{failed:>8}")
        };

        println!("    {:<12} {queued:>8} {sent:>8} {failed_cell}", platform.to_string());
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with(platform: Platform, event: EventType, value: u64) -> QueueStats {
        let mut snapshot = QueueStats::default();
        snapshot
            .platforms
            .entry(platform)
            .or_default()
            .set(event, value);
        snapshot
    }

    #[test]
    fn snapshot_serializes_per_platform() {
        let snapshot = snapshot_with(Platform::Telegram, EventType::Sent, 7);

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"telegram\""));
        assert!(json.contains("\"sent\":7"));
    }

    #[test]
    fn table_renders_all_platforms_without_panicking() {
        let snapshot = snapshot_with(Platform::Sms, EventType::Failed, 2);
        print_table(&snapshot, false);
    }
}
