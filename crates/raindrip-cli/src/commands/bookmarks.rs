//! Single-bookmark commands: search, get, add, patch, delete, suggest,
//! sort, and the Wayback probe.

use super::CommandContext;
use crate::error::CliError;
use crate::render::render_table;
use raindrip_api::{Collection, RaindropUpdate};
use serde_json::{json, Value};

pub fn search(
    ctx: &CommandContext,
    query: &str,
    collection: i64,
    pretty: bool,
) -> Result<(), CliError> {
    let results = ctx.client()?.search(query, collection)?;

    if pretty {
        let title = if query.is_empty() {
            "Recent Bookmarks".to_string()
        } else {
            format!("Search Results: {query}")
        };
        let rows: Vec<Vec<String>> = results
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.title.clone(),
                    r.tags.join(", "),
                    r.link.clone(),
                ]
            })
            .collect();
        println!("{}", render_table(&title, &["ID", "Title", "Tags", "Link"], &rows));
        return Ok(());
    }

    // Flatten tags into one cell so the item list stays tabular.
    let items: Vec<Value> = results
        .iter()
        .map(|r| {
            json!({
                "id": r.id,
                "title": r.title,
                "link": r.link,
                "tags": r.tags.join(","),
                "type": r.kind.as_deref().unwrap_or("link"),
                "created": r.created,
            })
        })
        .collect();
    ctx.emit(json!({ "items": items }))
}

pub fn get(ctx: &CommandContext, raindrop_id: i64) -> Result<(), CliError> {
    let raindrop = ctx.client()?.get_raindrop(raindrop_id)?;
    ctx.emit(serde_json::to_value(raindrop)?)
}

pub fn add(
    ctx: &CommandContext,
    url: &str,
    title: Option<String>,
    tags: Option<String>,
    collection: Option<i64>,
) -> Result<(), CliError> {
    let tag_list: Option<Vec<String>> =
        tags.map(|raw| raw.split(',').map(|t| t.trim().to_string()).collect());
    let raindrop = ctx.client()?.create_raindrop(
        url,
        title.as_deref(),
        tag_list.as_deref(),
        collection,
    )?;
    ctx.emit_action(serde_json::to_value(raindrop)?)
}

pub fn patch(ctx: &CommandContext, raindrop_id: i64, data: &str) -> Result<(), CliError> {
    let update: RaindropUpdate = serde_json::from_str(data).map_err(CliError::InvalidJson)?;
    let raindrop = ctx.client()?.update_raindrop(raindrop_id, &update)?;
    ctx.emit_action(serde_json::to_value(raindrop)?)
}

pub fn delete(ctx: &CommandContext, raindrop_id: i64) -> Result<(), CliError> {
    let success = ctx.client()?.delete_raindrop(raindrop_id)?;
    ctx.emit_action(json!({"success": success}))
}

pub fn suggest(ctx: &CommandContext, raindrop_id: i64) -> Result<(), CliError> {
    let suggestions = ctx.client()?.get_suggestions(raindrop_id)?;
    ctx.emit(suggestions)
}

/// Propose target collections for a bookmark by keyword-matching its
/// title against collection titles.
pub fn sort(ctx: &CommandContext, raindrop_id: i64) -> Result<(), CliError> {
    let client = ctx.client()?;
    let bookmark = client.get_raindrop(raindrop_id)?;
    let collections = client.get_collections()?;
    let suggestions = suggest_collections(&bookmark.title, &collections);
    ctx.emit(json!({
        "bookmark": {"id": bookmark.id, "title": bookmark.title},
        "suggested_collections": suggestions,
    }))
}

pub fn wayback(ctx: &CommandContext, url: &str) -> Result<(), CliError> {
    let snapshot = ctx.client()?.check_wayback(url);
    ctx.emit(json!({"url": url, "snapshot": snapshot}))
}

/// Top three collections whose title overlaps the bookmark title.
fn suggest_collections(title: &str, collections: &[Collection]) -> Vec<Value> {
    let title_lower = title.to_lowercase();
    let mut suggestions: Vec<Value> = collections
        .iter()
        .filter(|col| {
            let col_title = col.title.to_lowercase();
            !col_title.is_empty()
                && (title_lower.contains(&col_title)
                    || col_title
                        .split_whitespace()
                        .any(|word| title_lower.contains(word)))
        })
        .map(|col| {
            json!({
                "id": col.id,
                "title": col.title,
                "match_reason": format!("Matches keyword '{}'", col.title),
            })
        })
        .collect();
    suggestions.truncate(3);
    suggestions
}
