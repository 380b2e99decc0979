//! # Trivia CLI Module
//!
//! This module implements the CLI interface for the trivia server.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `status` - Show question bank status
//! - `init` - Initialize a new database
//! - `seed` - Import a JSON catalog of categories and questions
//! - `export` - Export the bank as a JSON catalog
//! - `list` - Show one page of questions
//! - `search` - Search question text
//! - `category` - List the questions of one category
//! - `categories` - List all categories
//! - `quiz` - Draw the next quiz question
//! - `add` - Add a question
//! - `delete` - Delete a question

mod commands;

use crate::config::{ConfigError, ServerConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trivia_core::TriviaError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Trivia - question bank server
///
/// Stores trivia questions and serves listings, search and quiz rounds.
#[derive(Parser, Debug)]
#[command(name = "trivia")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the question database (overrides config)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Storage backend: "redb" (ACID database) or "memory" (volatile)
    #[arg(short = 'B', long, global = true)]
    pub backend: Option<String>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Catalog to import before serving
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Show question bank status
    Status,

    /// Initialize a new empty database
    Init {
        /// Force initialization even if database exists
        #[arg(short, long)]
        force: bool,
    },

    /// Import a JSON catalog
    Seed {
        /// Path to the catalog file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Export the bank as a JSON catalog
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show one page of questions
    List {
        /// Page number (1-based)
        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        page: i64,
    },

    /// Search question text (case-insensitive)
    Search {
        /// Term to look for; empty lists everything
        #[arg(default_value = "")]
        term: String,
    },

    /// List the questions of one category
    Category {
        /// Category id
        id: u64,
    },

    /// List all categories
    Categories,

    /// Draw the next quiz question
    Quiz {
        /// Restrict to one category (0 or absent = all)
        #[arg(short = 'C', long, allow_negative_numbers = true)]
        category: Option<i64>,

        /// Ids already served this round (comma-separated)
        #[arg(short, long)]
        exclude: Option<String>,

        /// Seed for a reproducible draw
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Add a question
    Add {
        /// Question text
        #[arg(long)]
        question: String,

        /// Answer text
        #[arg(long)]
        answer: String,

        /// Category id
        #[arg(short = 'C', long)]
        category: u64,

        /// Difficulty (1-5)
        #[arg(short, long, default_value = "1")]
        difficulty: i64,
    },

    /// Delete a question
    Delete {
        /// Question id
        id: u64,
    },
}

impl Cli {
    /// Resolve the effective configuration: file, then environment, then flags.
    pub fn load_config(&self) -> Result<ServerConfig, ConfigError> {
        let mut config = ServerConfig::load(self.config.as_deref())?;

        if let Some(database) = &self.database {
            config.database = database.clone();
        }
        if let Some(backend) = &self.backend {
            config.backend = backend.parse()?;
        }
        if let Some(Commands::Server { host, port, .. }) = &self.command {
            if let Some(host) = host {
                config.host = host.clone();
            }
            if let Some(port) = port {
                config.port = *port;
            }
        }

        Ok(config)
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli, config: ServerConfig) -> Result<(), TriviaError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { catalog, .. }) => cmd_server(&config, catalog.as_deref()).await,
        Some(Commands::Status) => cmd_status(&config, json_mode),
        Some(Commands::Init { force }) => cmd_init(&config, force),
        Some(Commands::Seed { file }) => cmd_seed(&config, json_mode, &file),
        Some(Commands::Export { output }) => cmd_export(&config, &output),
        Some(Commands::List { page }) => cmd_list(&config, json_mode, page),
        Some(Commands::Search { term }) => cmd_search(&config, json_mode, &term),
        Some(Commands::Category { id }) => cmd_category(&config, json_mode, id),
        Some(Commands::Categories) => cmd_categories(&config, json_mode),
        Some(Commands::Quiz {
            category,
            exclude,
            seed,
        }) => cmd_quiz(&config, json_mode, category, exclude.as_deref(), seed),
        Some(Commands::Add {
            question,
            answer,
            category,
            difficulty,
        }) => cmd_add(&config, json_mode, &question, &answer, category, difficulty),
        Some(Commands::Delete { id }) => cmd_delete(&config, json_mode, id),
        None => {
            // No subcommand - show status by default
            cmd_status(&config, json_mode)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
