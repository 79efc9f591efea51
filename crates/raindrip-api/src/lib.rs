//! # raindrip-api
//!
//! Synchronous client for the Raindrop.io REST API, used by the `raindrip`
//! CLI. Covers collections, tags, raindrops (bookmarks), search, icon
//! covers, and the Wayback availability probe.
//!
//! The client is deliberately simple: blocking I/O, one request at a time,
//! bounded retries for rate limits and transient upstream failures, and a
//! dry-run mode that reports mutating requests instead of sending them.

pub mod client;
pub mod error;
pub mod models;

pub use client::{RaindropClient, TRASH_COLLECTION_ID};
pub use error::ApiError;
pub use models::{
    Collection, CollectionCreate, CollectionUpdate, ParentRef, Raindrop, RaindropUpdate, User,
};
