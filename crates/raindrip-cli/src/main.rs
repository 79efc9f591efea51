//! `raindrip` — an AI-native command-line client for Raindrop.io.
//!
//! Output defaults to TOON, a compact tabular format that costs far fewer
//! tokens than JSON when the consumer is a language model. `--format json`
//! switches to pretty-printed JSON; `search --pretty` renders a human
//! table instead.
//!
//! ## Usage
//!
//! ```sh
//! # One-time setup: verify and store the API token
//! raindrip login --token <TOKEN>
//!
//! # Orient a new session
//! raindrip context
//! raindrip structure
//!
//! # Find and reshape bookmarks
//! raindrip search "rust tag:cli"
//! raindrip batch update --ids 101,102 '{"tags": ["research"]}'
//!
//! # Rehearse a destructive change first
//! raindrip --dry-run batch delete --ids 101,102
//! ```
//!
//! Every error is emitted as a structured payload with `error`, `status`,
//! and `hint` fields, and exits non-zero.

mod commands;
mod credentials;
mod error;
mod output;
mod render;

use clap::{Parser, Subcommand};
use commands::batch::BatchCommands;
use commands::collections::CollectionCommands;
use commands::tags::TagCommands;
use commands::CommandContext;
use error::CliError;
use output::OutputFormat;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "raindrip",
    version,
    about = "raindrip: an AI-native CLI for Raindrop.io"
)]
struct Cli {
    /// Report mutating actions instead of issuing real API requests
    #[arg(long, global = true)]
    dry_run: bool,

    /// Output format: toon (default, highest token efficiency) or json
    #[arg(short = 'f', long, global = true, value_enum, default_value = "toon")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with your Raindrop.io API token (verifies before saving)
    Login {
        /// API token; prompted for when omitted
        #[arg(long)]
        token: Option<String>,
    },
    /// Remove your stored credentials
    Logout,
    /// Show current user details
    Whoami,
    /// Show high-level account context (user, stats, recent activity)
    Context,
    /// Show collections and tags
    Structure,
    /// Dump the JSON schemas and usage examples (for AI context)
    Schema,
    /// Search for bookmarks (paginated)
    Search {
        /// Search query
        #[arg(default_value = "")]
        query: String,
        /// Collection ID to search within (0 for all)
        #[arg(long, default_value_t = 0)]
        collection: i64,
        /// Display results in a formatted table for humans
        #[arg(short, long)]
        pretty: bool,
    },
    /// Get full details for a specific bookmark
    Get { raindrop_id: i64 },
    /// Add a new bookmark
    Add {
        url: String,
        #[arg(long)]
        title: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// Target collection ID
        #[arg(long)]
        collection: Option<i64>,
    },
    /// Update a bookmark with a JSON patch
    Patch { raindrop_id: i64, data: String },
    /// Delete a bookmark
    Delete { raindrop_id: i64 },
    /// Get tag/collection suggestions for a bookmark
    Suggest { raindrop_id: i64 },
    /// Suggest the best collection for a bookmark based on its title
    Sort { raindrop_id: i64 },
    /// Check if a URL is available in the Wayback Machine
    Wayback { url: String },
    /// Manage collections
    #[command(subcommand)]
    Collection(CollectionCommands),
    /// Manage tags
    #[command(subcommand)]
    Tag(TagCommands),
    /// Batch operations on bookmarks
    #[command(subcommand)]
    Batch(BatchCommands),
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let format = cli.format;
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::emit_error(&err, format);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = CommandContext {
        dry_run: cli.dry_run,
        format: cli.format,
    };
    match cli.command {
        Commands::Login { token } => commands::auth::login(&ctx, token),
        Commands::Logout => commands::auth::logout(&ctx),
        Commands::Whoami => commands::auth::whoami(&ctx),
        Commands::Context => commands::account::context(&ctx),
        Commands::Structure => commands::account::structure(&ctx),
        Commands::Schema => commands::account::schema(),
        Commands::Search {
            query,
            collection,
            pretty,
        } => commands::bookmarks::search(&ctx, &query, collection, pretty),
        Commands::Get { raindrop_id } => commands::bookmarks::get(&ctx, raindrop_id),
        Commands::Add {
            url,
            title,
            tags,
            collection,
        } => commands::bookmarks::add(&ctx, &url, title, tags, collection),
        Commands::Patch { raindrop_id, data } => {
            commands::bookmarks::patch(&ctx, raindrop_id, &data)
        }
        Commands::Delete { raindrop_id } => commands::bookmarks::delete(&ctx, raindrop_id),
        Commands::Suggest { raindrop_id } => commands::bookmarks::suggest(&ctx, raindrop_id),
        Commands::Sort { raindrop_id } => commands::bookmarks::sort(&ctx, raindrop_id),
        Commands::Wayback { url } => commands::bookmarks::wayback(&ctx, &url),
        Commands::Collection(command) => commands::collections::run(&ctx, command),
        Commands::Tag(command) => commands::tags::run(&ctx, command),
        Commands::Batch(command) => commands::batch::run(&ctx, command),
    }
}
