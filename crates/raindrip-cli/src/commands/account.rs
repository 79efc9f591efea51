//! Account-level overview commands: `context`, `structure`, and `schema`.

use super::CommandContext;
use crate::error::CliError;
use serde_json::{json, Value};

const RECENT_ACTIVITY_LIMIT: usize = 5;

/// High-level account context in one call: who is logged in, how much is
/// stored, the top-level collection tree, and the latest additions.
/// Designed to be the first command an agent runs in a session.
pub fn context(ctx: &CommandContext) -> Result<(), CliError> {
    let client = ctx.client()?;
    let user = client.get_user()?;
    let stats = client.get_stats()?;
    let recent = client.search_page("", 0, 0, 50)?;
    let collections = client.get_collections()?;

    let total_bookmarks = stats
        .iter()
        .find(|item| item.get("_id").and_then(Value::as_i64) == Some(0))
        .and_then(|item| item.get("count").and_then(Value::as_i64))
        .unwrap_or(0);

    let root_collections: Vec<Value> = collections
        .iter()
        .filter(|c| c.parent.is_none())
        .map(|c| json!({"id": c.id, "title": c.title, "count": c.count}))
        .collect();

    let recent_activity: Vec<Value> = recent
        .iter()
        .take(RECENT_ACTIVITY_LIMIT)
        .map(|r| json!({"id": r.id, "title": r.title, "created": r.created}))
        .collect();

    ctx.emit(json!({
        "user": [{"id": user.id, "name": user.full_name}],
        "stats": [{
            "total_bookmarks": total_bookmarks,
            "total_collections": collections.len(),
        }],
        "structure": {"root_collections": root_collections},
        "recent_activity": recent_activity,
    }))
}

/// Full collection tree plus the tag list.
pub fn structure(ctx: &CommandContext) -> Result<(), CliError> {
    let client = ctx.client()?;
    let collections = client.get_collections()?;
    let tags = client.get_tags()?;

    let collections: Vec<Value> = collections
        .iter()
        .map(|c| {
            json!({
                "id": c.id,
                "title": c.title,
                "count": c.count,
                "parent_id": c.parent.map(|p| p.id),
                "last_update": c.last_update,
            })
        })
        .collect();

    ctx.emit(json!({"collections": collections, "tags": tags}))
}

/// Input schemas and worked examples for the write commands. Always JSON,
/// since it documents JSON payloads.
pub fn schema() -> Result<(), CliError> {
    let payload = json!({
        "schemas": {
            "Raindrop": {
                "_id": "integer",
                "link": "string",
                "title": "string",
                "excerpt": "string",
                "note": "string",
                "tags": "string[]",
                "type": "link|article|image|video|document|audio",
                "important": "boolean",
                "collectionId": "integer",
                "created": "datetime",
                "lastUpdate": "datetime",
            },
            "RaindropUpdate": {
                "link": "string?",
                "title": "string?",
                "excerpt": "string?",
                "note": "string?",
                "tags": "string[]?",
                "collectionId": "integer?",
                "collection": "{\"$id\": integer}?",
            },
            "CollectionCreate": {
                "title": "string",
                "view": "list|simple|grid|masonry?",
                "public": "boolean?",
                "parent": "{\"$id\": integer}?",
            },
            "CollectionUpdate": {
                "title": "string?",
                "view": "string?",
                "public": "boolean?",
                "parent": "{\"$id\": integer}?",
                "expanded": "boolean?",
            },
        },
        "usage_examples": {
            "patch_update_title_tags":
                "raindrip patch <id> '{\"title\": \"New Title\", \"tags\": [\"ai\", \"cli\"]}'",
            "move_single_bookmark": "raindrip patch <id> '{\"collectionId\": <target_col_id>}'",
            "move_batch_bookmarks":
                "raindrip batch update --ids 1,2 '{\"collection\": {\"$id\": <target_col_id>}}'",
            "create_collection": "raindrip collection create Research --public true",
            "set_collection_icon_search": "raindrip collection set-icon <id> robot",
            "set_collection_icon_url":
                "raindrip collection cover <id> https://example.com/icon.png",
            "complex_query": "raindrip search \"python tag:important\" --pretty",
        },
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
