//! `tag` subcommands.

use super::CommandContext;
use crate::error::CliError;
use clap::Subcommand;
use serde_json::json;

#[derive(Subcommand)]
pub enum TagCommands {
    /// Rename a tag; merges with an existing tag if the new name exists
    Rename {
        old_name: String,
        new_name: String,
        /// Collection ID (0 for global)
        #[arg(long, default_value_t = 0)]
        collection: i64,
    },
    /// Delete tags from all bookmarks (global) or a specific collection
    Delete {
        /// Tags to delete
        #[arg(required = true)]
        tags: Vec<String>,
        /// Collection ID (0 for global)
        #[arg(long, default_value_t = 0)]
        collection: i64,
    },
}

pub fn run(ctx: &CommandContext, command: TagCommands) -> Result<(), CliError> {
    match command {
        TagCommands::Rename {
            old_name,
            new_name,
            collection,
        } => {
            let success = ctx.client()?.rename_tag(&old_name, &new_name, collection)?;
            ctx.emit_action(json!({"success": success}))
        }
        TagCommands::Delete { tags, collection } => {
            let success = ctx.client()?.delete_tags(&tags, collection)?;
            ctx.emit_action(json!({"success": success}))
        }
    }
}
