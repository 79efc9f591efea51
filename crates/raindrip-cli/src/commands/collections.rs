//! `collection` subcommands.

use super::{parse_id_list, CommandContext};
use crate::error::CliError;
use clap::Subcommand;
use raindrip_api::{CollectionCreate, CollectionUpdate, ParentRef};
use serde_json::json;
use tracing::info;

#[derive(Subcommand)]
pub enum CollectionCommands {
    /// Create a new collection
    Create {
        title: String,
        /// Parent collection ID
        #[arg(long)]
        parent: Option<i64>,
        /// Make the collection public
        #[arg(long)]
        public: Option<bool>,
        /// View style (list, simple, grid, masonry)
        #[arg(long)]
        view: Option<String>,
    },
    /// Get details of a specific collection
    Get { collection_id: i64 },
    /// Update a collection with a JSON patch
    Update { collection_id: i64, data: String },
    /// Delete a collection
    Delete { collection_id: i64 },
    /// Delete multiple collections at once
    DeleteMultiple {
        /// Comma-separated list of collection IDs
        ids: String,
    },
    /// Reorder all collections
    Reorder {
        /// Sort order: title, -title, -count
        sort: String,
    },
    /// Expand or collapse all collections
    ExpandAll { expanded: bool },
    /// Merge multiple collections into one
    Merge {
        /// Comma-separated list of collection IDs to merge
        ids: String,
        /// Target collection ID
        target_id: i64,
    },
    /// Remove all empty collections
    Clean,
    /// Empty the trash collection
    EmptyTrash,
    /// Upload a cover image from a file path or URL
    Cover { collection_id: i64, source: String },
    /// Search Raindrop's icon library and set the best match as the cover
    SetIcon { collection_id: i64, query: String },
}

pub fn run(ctx: &CommandContext, command: CollectionCommands) -> Result<(), CliError> {
    match command {
        CollectionCommands::Create {
            title,
            parent,
            public,
            view,
        } => {
            let create = CollectionCreate {
                title,
                view,
                public,
                parent: parent.map(|id| ParentRef { id }),
            };
            let collection = ctx.client()?.create_collection(&create)?;
            ctx.emit_action(serde_json::to_value(collection)?)
        }
        CollectionCommands::Get { collection_id } => {
            let collection = ctx.client()?.get_collection(collection_id)?;
            ctx.emit(serde_json::to_value(collection)?)
        }
        CollectionCommands::Update {
            collection_id,
            data,
        } => {
            let update: CollectionUpdate =
                serde_json::from_str(&data).map_err(CliError::InvalidJson)?;
            let collection = ctx.client()?.update_collection(collection_id, &update)?;
            ctx.emit_action(serde_json::to_value(collection)?)
        }
        CollectionCommands::Delete { collection_id } => {
            let success = ctx.client()?.delete_collection(collection_id)?;
            ctx.emit_action(json!({"success": success}))
        }
        CollectionCommands::DeleteMultiple { ids } => {
            let ids = parse_id_list(&ids)?;
            let success = ctx.client()?.delete_collections(&ids)?;
            ctx.emit_action(json!({"success": success}))
        }
        CollectionCommands::Reorder { sort } => {
            let success = ctx.client()?.reorder_collections(&sort)?;
            ctx.emit_action(json!({"success": success}))
        }
        CollectionCommands::ExpandAll { expanded } => {
            let success = ctx.client()?.expand_all_collections(expanded)?;
            ctx.emit_action(json!({"success": success}))
        }
        CollectionCommands::Merge { ids, target_id } => {
            let ids = parse_id_list(&ids)?;
            let success = ctx.client()?.merge_collections(&ids, target_id)?;
            ctx.emit_action(json!({"success": success}))
        }
        CollectionCommands::Clean => {
            let removed = ctx.client()?.clean_empty_collections()?;
            ctx.emit_action(json!({"removed_count": removed}))
        }
        CollectionCommands::EmptyTrash => {
            let success = ctx.client()?.empty_trash()?;
            ctx.emit_action(json!({"success": success}))
        }
        CollectionCommands::Cover {
            collection_id,
            source,
        } => cover(ctx, collection_id, &source),
        CollectionCommands::SetIcon {
            collection_id,
            query,
        } => set_icon(ctx, collection_id, &query),
    }
}

/// Upload a cover from a local file or a URL.
fn cover(ctx: &CommandContext, collection_id: i64, source: &str) -> Result<(), CliError> {
    let client = ctx.client()?;
    let (filename, bytes) = if source.starts_with("http://") || source.starts_with("https://") {
        info!(source, "downloading cover");
        ("cover.png".to_string(), client.fetch_bytes(source)?)
    } else {
        let name = std::path::Path::new(source)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cover.png".to_string());
        (name, std::fs::read(source)?)
    };
    let collection = client.upload_collection_cover(collection_id, &filename, bytes)?;
    ctx.emit_action(serde_json::to_value(collection)?)
}

/// Search the icon library, take the best match, upload it as the cover.
fn set_icon(ctx: &CommandContext, collection_id: i64, query: &str) -> Result<(), CliError> {
    let client = ctx.client()?;
    let icons = client.search_covers(query)?;
    let Some(icon_url) = icons.first() else {
        return Err(CliError::Validation(format!("no icons found for {query:?}")));
    };
    info!(icon_url, "downloading icon");
    let bytes = client.fetch_bytes(icon_url)?;
    let collection = client.upload_collection_cover(collection_id, "icon.png", bytes)?;
    ctx.emit_action(serde_json::to_value(collection)?)
}
