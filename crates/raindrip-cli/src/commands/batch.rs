//! `batch` subcommands: bulk updates and deletes over explicit ID lists.
//!
//! IDs are validated before any request is issued, so a malformed list
//! never reaches the API.

use super::{parse_id_list, CommandContext};
use crate::error::CliError;
use clap::Subcommand;
use raindrip_api::RaindropUpdate;
use serde_json::json;

#[derive(Subcommand)]
pub enum BatchCommands {
    /// Update multiple bookmarks at once
    Update {
        /// JSON patch applied to every bookmark
        data: String,
        /// Comma-separated list of bookmark IDs
        #[arg(long)]
        ids: String,
        /// Collection ID
        #[arg(long, default_value_t = 0)]
        collection: i64,
    },
    /// Delete multiple bookmarks at once
    Delete {
        /// Comma-separated list of bookmark IDs
        #[arg(long)]
        ids: String,
        /// Collection ID (use -99 for permanent delete)
        #[arg(long, default_value_t = 0)]
        collection: i64,
    },
}

pub fn run(ctx: &CommandContext, command: BatchCommands) -> Result<(), CliError> {
    match command {
        BatchCommands::Update {
            data,
            ids,
            collection,
        } => {
            let ids = parse_id_list(&ids)?;
            let update: RaindropUpdate =
                serde_json::from_str(&data).map_err(CliError::InvalidJson)?;
            let success = ctx
                .client()?
                .batch_update_raindrops(collection, &ids, &update)?;
            ctx.emit_action(json!({"success": success}))
        }
        BatchCommands::Delete { ids, collection } => {
            let ids = parse_id_list(&ids)?;
            let success = ctx.client()?.batch_delete_raindrops(collection, &ids)?;
            ctx.emit_action(json!({"success": success}))
        }
    }
}
