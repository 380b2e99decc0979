//! # Trivia - Question Bank Server
//!
//! The main binary for the trivia question bank.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for bank operations
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │            apps/trivia (THE BINARY)           │
//! │                                               │
//! │  ┌─────────────┐        ┌─────────────┐       │
//! │  │   CLI       │        │   HTTP API  │       │
//! │  │  (clap)     │        │   (axum)    │       │
//! │  └──────┬──────┘        └──────┬──────┘       │
//! │         └───────────┬──────────┘              │
//! │                     ▼                         │
//! │             ┌───────────────┐                 │
//! │             │  trivia-core  │                 │
//! │             │  (THE LOGIC)  │                 │
//! │             └───────────────┘                 │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! trivia server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! trivia seed -f catalog.json
//! trivia list --page 2
//! trivia quiz --category 3 --exclude 2,5
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trivia::cli;
use trivia::config::LogFormat;

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Resolve configuration before logging so log_format can be honored.
    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    // Initialize tracing. log_format = "json" (or TRIVIA_LOG_FORMAT=json)
    // enables machine-parseable output.
    let default_filter = if cli.verbose {
        "trivia=debug,trivia_core=debug,tower_http=debug"
    } else {
        "trivia=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match config.log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli, config).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  ████████╗██████╗ ██╗██╗   ██╗██╗ █████╗
  ╚══██╔══╝██╔══██╗██║██║   ██║██║██╔══██╗
     ██║   ██████╔╝██║██║   ██║██║███████║
     ██║   ██╔══██╗██║╚██╗ ██╔╝██║██╔══██║
     ██║   ██║  ██║██║ ╚████╔╝ ██║██║  ██║
     ╚═╝   ╚═╝  ╚═╝╚═╝  ╚═══╝  ╚═╝╚═╝  ╚═╝

  Question Bank Server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
