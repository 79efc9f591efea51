//! Synchronous Raindrop.io REST client.
//!
//! One blocking HTTP client per process invocation, bearer-token auth, and
//! a central request path that handles rate limiting, transient upstream
//! failures, and the dry-run guard. Mutating requests (POST/PUT/DELETE)
//! are never sent when dry-run is active; the client logs the request it
//! would have made and returns a synthetic success body instead.

use crate::error::ApiError;
use crate::models::{
    Collection, CollectionCreate, CollectionUpdate, Raindrop, RaindropUpdate, User,
};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const BASE_URL: &str = "https://api.raindrop.io/rest/v1";
const WAYBACK_URL: &str = "https://archive.org/wayback/available";
const MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_AFTER_SECS: u64 = 10;
const SEARCH_PAGE_SIZE: usize = 50;

/// Trash is addressed as a regular collection with a reserved ID.
pub const TRASH_COLLECTION_ID: i64 = -99;

pub struct RaindropClient {
    http: Client,
    base_url: Url,
    token: String,
    dry_run: bool,
}

impl RaindropClient {
    pub fn new(token: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create HTTP client");
        Self {
            http,
            base_url: Url::parse(BASE_URL).expect("base URL is valid"),
            token: token.into(),
            dry_run: false,
        }
    }

    /// Point the client at a different API root. Used by tests.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    // ------------------------------------------------------------------
    // User
    // ------------------------------------------------------------------

    pub fn get_user(&self) -> Result<User, ApiError> {
        let data = self.request(Method::GET, "/user", &[], None)?;
        field(&data, "user")
    }

    /// Account statistics: counts of raindrops per special collection.
    pub fn get_stats(&self) -> Result<Vec<Value>, ApiError> {
        let data = self.request(Method::GET, "/user/stats", &[], None)?;
        Ok(data
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    // ------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------

    pub fn get_collections(&self) -> Result<Vec<Collection>, ApiError> {
        let data = self.request(Method::GET, "/collections/all", &[], None)?;
        items(&data)
    }

    pub fn get_collection(&self, collection_id: i64) -> Result<Collection, ApiError> {
        let data = self.request(Method::GET, &format!("/collection/{collection_id}"), &[], None)?;
        field(&data, "item")
    }

    pub fn create_collection(&self, create: &CollectionCreate) -> Result<Collection, ApiError> {
        let data = self.request(
            Method::POST,
            "/collection",
            &[],
            Some(serde_json::to_value(create)?),
        )?;
        field(&data, "item")
    }

    pub fn update_collection(
        &self,
        collection_id: i64,
        update: &CollectionUpdate,
    ) -> Result<Collection, ApiError> {
        let data = self.request(
            Method::PUT,
            &format!("/collection/{collection_id}"),
            &[],
            Some(serde_json::to_value(update)?),
        )?;
        field(&data, "item")
    }

    pub fn delete_collection(&self, collection_id: i64) -> Result<bool, ApiError> {
        let data = self.request(
            Method::DELETE,
            &format!("/collection/{collection_id}"),
            &[],
            None,
        )?;
        Ok(result_flag(&data, false))
    }

    pub fn delete_collections(&self, ids: &[i64]) -> Result<bool, ApiError> {
        let data = self.request(
            Method::DELETE,
            "/collections",
            &[],
            Some(json!({ "ids": ids })),
        )?;
        // The API sometimes returns an empty body on success here.
        Ok(result_flag(&data, true))
    }

    /// Reorder all collections: `title`, `-title`, or `-count`.
    pub fn reorder_collections(&self, sort: &str) -> Result<bool, ApiError> {
        let data = self.request(Method::PUT, "/collections", &[], Some(json!({ "sort": sort })))?;
        Ok(result_flag(&data, false))
    }

    pub fn expand_all_collections(&self, expanded: bool) -> Result<bool, ApiError> {
        let data = self.request(
            Method::PUT,
            "/collections",
            &[],
            Some(json!({ "expanded": expanded })),
        )?;
        Ok(result_flag(&data, false))
    }

    pub fn merge_collections(&self, ids: &[i64], target_id: i64) -> Result<bool, ApiError> {
        let data = self.request(
            Method::PUT,
            "/collections/merge",
            &[],
            Some(json!({ "ids": ids, "to": target_id })),
        )?;
        Ok(result_flag(&data, true))
    }

    /// Remove all empty collections; returns how many were removed.
    pub fn clean_empty_collections(&self) -> Result<i64, ApiError> {
        let data = self.request(Method::PUT, "/collections/clean", &[], Some(json!({})))?;
        Ok(data.get("count").and_then(Value::as_i64).unwrap_or(0))
    }

    pub fn empty_trash(&self) -> Result<bool, ApiError> {
        let data = self.request(
            Method::DELETE,
            &format!("/collection/{TRASH_COLLECTION_ID}"),
            &[],
            None,
        )?;
        Ok(result_flag(&data, false))
    }

    /// Search Raindrop's icon library; returns PNG URLs, best match first.
    pub fn search_covers(&self, query: &str) -> Result<Vec<String>, ApiError> {
        let path = format!("/collections/covers/{}", urlencoding::encode(query));
        let data = self.request(Method::GET, &path, &[], None)?;
        let mut icons = Vec::new();
        if let Some(groups) = data.get("items").and_then(Value::as_array) {
            for group in groups {
                if let Some(list) = group.get("icons").and_then(Value::as_array) {
                    for icon in list {
                        if let Some(png) = icon.get("png").and_then(Value::as_str) {
                            icons.push(png.to_string());
                        }
                    }
                }
            }
        }
        Ok(icons)
    }

    /// Upload a collection cover image as multipart form data.
    pub fn upload_collection_cover(
        &self,
        collection_id: i64,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<Collection, ApiError> {
        if self.dry_run {
            info!(collection_id, filename, "dry run: skipping cover upload");
            return Ok(Collection {
                id: collection_id,
                title: "Dry run cover".into(),
                ..Collection::default()
            });
        }
        let url = self.endpoint(&format!("/collection/{collection_id}/cover"))?;
        let form = Form::new().part("cover", Part::bytes(bytes).file_name(filename.to_string()));
        let response = self
            .http
            .put(url)
            .bearer_auth(&self.token)
            .multipart(form)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            });
        }
        let data: Value = response
            .json()
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        field(&data, "item")
    }

    // ------------------------------------------------------------------
    // Tags
    // ------------------------------------------------------------------

    pub fn get_tags(&self) -> Result<Vec<String>, ApiError> {
        let data = self.request(Method::GET, "/tags", &[], None)?;
        Ok(data
            .get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("_id").and_then(Value::as_str))
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Delete tags globally (collection 0) or within one collection.
    pub fn delete_tags(&self, tags: &[String], collection_id: i64) -> Result<bool, ApiError> {
        let data = self.request(
            Method::DELETE,
            &format!("/tags/{collection_id}"),
            &[],
            Some(json!({ "tags": tags })),
        )?;
        Ok(result_flag(&data, false))
    }

    /// Rename a tag; merges with an existing tag of the new name.
    pub fn rename_tag(
        &self,
        old_name: &str,
        new_name: &str,
        collection_id: i64,
    ) -> Result<bool, ApiError> {
        let data = self.request(
            Method::PUT,
            &format!("/tags/{collection_id}"),
            &[],
            Some(json!({ "replace": new_name, "tags": [old_name] })),
        )?;
        Ok(result_flag(&data, false))
    }

    // ------------------------------------------------------------------
    // Raindrops
    // ------------------------------------------------------------------

    /// One page of search results.
    pub fn search_page(
        &self,
        query: &str,
        collection_id: i64,
        page: usize,
        per_page: usize,
    ) -> Result<Vec<Raindrop>, ApiError> {
        let data = self.request(
            Method::GET,
            &format!("/raindrops/{collection_id}"),
            &[
                ("search", query.to_string()),
                ("page", page.to_string()),
                ("perpage", per_page.to_string()),
            ],
            None,
        )?;
        items(&data)
    }

    /// Full search: walks pages sequentially until a short page.
    pub fn search(&self, query: &str, collection_id: i64) -> Result<Vec<Raindrop>, ApiError> {
        let mut page = 0;
        let mut all = Vec::new();
        loop {
            let batch = self.search_page(query, collection_id, page, SEARCH_PAGE_SIZE)?;
            let full_page = batch.len() == SEARCH_PAGE_SIZE;
            all.extend(batch);
            if !full_page {
                return Ok(all);
            }
            page += 1;
        }
    }

    pub fn get_raindrop(&self, raindrop_id: i64) -> Result<Raindrop, ApiError> {
        let data = self.request(Method::GET, &format!("/raindrop/{raindrop_id}"), &[], None)?;
        field(&data, "item")
    }

    pub fn create_raindrop(
        &self,
        link: &str,
        title: Option<&str>,
        tags: Option<&[String]>,
        collection_id: Option<i64>,
    ) -> Result<Raindrop, ApiError> {
        let mut payload = Map::new();
        payload.insert("link".into(), json!(link));
        if let Some(title) = title {
            payload.insert("title".into(), json!(title));
        }
        if let Some(tags) = tags {
            payload.insert("tags".into(), json!(tags));
        }
        if let Some(collection_id) = collection_id {
            payload.insert("collectionId".into(), json!(collection_id));
        }
        let data = self.request(Method::POST, "/raindrop", &[], Some(Value::Object(payload)))?;
        field(&data, "item")
    }

    pub fn update_raindrop(
        &self,
        raindrop_id: i64,
        update: &RaindropUpdate,
    ) -> Result<Raindrop, ApiError> {
        let data = self.request(
            Method::PUT,
            &format!("/raindrop/{raindrop_id}"),
            &[],
            Some(serde_json::to_value(update)?),
        )?;
        field(&data, "item")
    }

    pub fn delete_raindrop(&self, raindrop_id: i64) -> Result<bool, ApiError> {
        let data = self.request(Method::DELETE, &format!("/raindrop/{raindrop_id}"), &[], None)?;
        Ok(result_flag(&data, false))
    }

    pub fn batch_update_raindrops(
        &self,
        collection_id: i64,
        ids: &[i64],
        update: &RaindropUpdate,
    ) -> Result<bool, ApiError> {
        let mut payload = match serde_json::to_value(update)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        payload.insert("ids".into(), json!(ids));
        let data = self.request(
            Method::PUT,
            &format!("/raindrops/{collection_id}"),
            &[],
            Some(Value::Object(payload)),
        )?;
        Ok(result_flag(&data, false))
    }

    pub fn batch_delete_raindrops(&self, collection_id: i64, ids: &[i64]) -> Result<bool, ApiError> {
        let data = self.request(
            Method::DELETE,
            &format!("/raindrops/{collection_id}"),
            &[],
            Some(json!({ "ids": ids })),
        )?;
        Ok(result_flag(&data, false))
    }

    /// Tag and collection suggestions for an existing raindrop.
    pub fn get_suggestions(&self, raindrop_id: i64) -> Result<Value, ApiError> {
        let data = self.request(
            Method::GET,
            &format!("/raindrop/{raindrop_id}/suggest"),
            &[],
            None,
        )?;
        Ok(data.get("item").cloned().unwrap_or(Value::Null))
    }

    // ------------------------------------------------------------------
    // External helpers
    // ------------------------------------------------------------------

    /// Closest Wayback Machine snapshot for a URL, if any. Failure-tolerant:
    /// any error reads as "no snapshot".
    pub fn check_wayback(&self, target: &str) -> Option<String> {
        let response = self
            .http
            .get(WAYBACK_URL)
            .query(&[("url", target)])
            .send()
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let data: Value = response.json().ok()?;
        data.pointer("/archived_snapshots/closest/url")
            .and_then(Value::as_str)
            .map(String::from)
    }

    /// Download raw bytes from an arbitrary URL (cover images).
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: format!("failed to download {url}"),
            });
        }
        Ok(response.bytes()?.to_vec())
    }

    // ------------------------------------------------------------------
    // Request plumbing
    // ------------------------------------------------------------------

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(Url::parse(&format!("{}{path}", self.base_url))?)
    }

    /// Central request path: dry-run guard, bounded retries for 429/5xx,
    /// structured errors for everything else.
    fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        if self.dry_run && is_mutating(&method) {
            let payload = body.map(scrub_tokens).unwrap_or(Value::Null);
            info!(
                method = %method,
                path,
                payload = %payload,
                "dry run: skipping mutating request"
            );
            return Ok(dry_run_stub());
        }

        let url = self.endpoint(path)?;
        let mut attempts_left = MAX_ATTEMPTS;
        loop {
            attempts_left -= 1;
            debug!(method = %method, %url, "sending request");
            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .bearer_auth(&self.token);
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(ref body) = body {
                request = request.json(body);
            }
            let response = request.send()?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get(header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                if attempts_left == 0 {
                    return Err(ApiError::RateLimited { retry_after });
                }
                warn!(retry_after, attempts_left, "rate limited, retrying");
                thread::sleep(Duration::from_secs(retry_after));
                continue;
            }
            if status.is_server_error() {
                if attempts_left == 0 {
                    return Err(ApiError::Upstream(format!(
                        "Raindrop.io server error: {status}"
                    )));
                }
                warn!(%status, attempts_left, "server error, retrying");
                thread::sleep(Duration::from_secs(2));
                continue;
            }
            if !status.is_success() {
                let text = response.text().unwrap_or_default();
                let message = serde_json::from_str::<Value>(&text)
                    .ok()
                    .and_then(|v| {
                        v.get("errorMessage")
                            .and_then(Value::as_str)
                            .map(String::from)
                    })
                    .unwrap_or(text);
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    message,
                });
            }
            return response
                .json()
                .map_err(|e| ApiError::InvalidResponse(e.to_string()));
        }
    }
}

fn is_mutating(method: &Method) -> bool {
    *method == Method::POST
        || *method == Method::PUT
        || *method == Method::DELETE
        || *method == Method::PATCH
}

/// Never log token-bearing payload fields, even under dry run.
fn scrub_tokens(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| !key.to_lowercase().contains("token"))
                .collect(),
        ),
        other => other,
    }
}

/// Synthetic success body returned in place of a skipped mutating request.
/// Shaped so every typed response helper can digest it.
fn dry_run_stub() -> Value {
    json!({
        "result": true,
        "item": {"_id": 0, "title": "Dry run item", "link": "https://example.invalid"},
        "items": [],
        "count": 0,
    })
}

fn result_flag(data: &Value, default: bool) -> bool {
    data.get("result").and_then(Value::as_bool).unwrap_or(default)
}

fn field<T: DeserializeOwned>(data: &Value, key: &str) -> Result<T, ApiError> {
    let value = data.get(key).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

fn items<T: DeserializeOwned>(data: &Value) -> Result<Vec<T>, ApiError> {
    let value = data
        .get("items")
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()));
    serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A client that errors on any real socket use; dry-run calls must
    /// succeed without ever connecting.
    fn offline_dry_run_client() -> RaindropClient {
        RaindropClient::new("test-token")
            .with_base_url(Url::parse("http://127.0.0.1:9/rest/v1").unwrap())
            .with_dry_run(true)
    }

    #[test]
    fn dry_run_skips_delete_request() {
        let client = offline_dry_run_client();
        assert!(client.delete_raindrop(123).unwrap());
    }

    #[test]
    fn dry_run_skips_batch_mutations() {
        let client = offline_dry_run_client();
        assert!(client.batch_delete_raindrops(0, &[1, 2, 3]).unwrap());
        let update = RaindropUpdate {
            tags: Some(vec!["research".into()]),
            ..RaindropUpdate::default()
        };
        assert!(client.batch_update_raindrops(0, &[1, 2], &update).unwrap());
    }

    #[test]
    fn dry_run_create_returns_stub_item() {
        let client = offline_dry_run_client();
        let created = client
            .create_collection(&CollectionCreate {
                title: "Research".into(),
                ..CollectionCreate::default()
            })
            .unwrap();
        assert_eq!(created.id, 0);
    }

    #[test]
    fn dry_run_cover_upload_is_skipped() {
        let client = offline_dry_run_client();
        let collection = client
            .upload_collection_cover(7, "icon.png", vec![1, 2, 3])
            .unwrap();
        assert_eq!(collection.id, 7);
    }

    #[test]
    fn scrub_tokens_drops_token_fields() {
        let scrubbed = scrub_tokens(json!({
            "title": "x",
            "accessToken": "secret",
            "refresh_token": "secret",
        }));
        assert_eq!(scrubbed, json!({"title": "x"}));
    }

    #[test]
    fn get_requests_still_run_under_dry_run() {
        // GETs are not guarded; against an unroutable host they fail with
        // a network error rather than returning a stub.
        let client = offline_dry_run_client();
        assert!(matches!(
            client.get_user(),
            Err(ApiError::Network(_))
        ));
    }
}
