// SPDX-FileCopyrightText: 2026 Unibox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unibox - multi-platform message delivery daemon.
//!
//! This is the binary entry point for the Unibox delivery core.

use clap::{Parser, Subcommand};

mod sender;
mod serve;
mod shutdown;
mod status;

/// Unibox - multi-platform message delivery daemon.
#[derive(Parser, Debug)]
#[command(name = "unibox", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the delivery processors.
    Serve,
    /// Show per-platform delivery counters.
    Status {
        /// Output structured JSON for scripting.
        #[arg(long)]
        json: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match unibox_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            unibox_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Status { json, plain }) => status::run_status(&config, json, plain).await,
        None => {
            println!("unibox: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
