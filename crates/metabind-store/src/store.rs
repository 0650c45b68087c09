//! Pluggable hash store trait
//!
//! This module defines the abstraction over the remote store the metadata
//! core writes to. A record is addressed by a string key and holds a flat
//! set of string fields; mutations can be grouped into an atomic batch.

use crate::batch::Batch;
use crate::error::StoreResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Remote store exposing hash-oriented record operations
///
/// Implementations provide per-command atomicity plus all-or-nothing
/// commits for [`Batch`] groups. No isolation is promised across batches:
/// independent callers interleave at batch granularity.
#[async_trait]
pub trait HashStore: Send + Sync {
    /// Check whether a record exists under `key`
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Fetch every field of the record (empty map if the record is absent)
    async fn get_all(&self, key: &str) -> StoreResult<HashMap<String, String>>;

    /// Set several fields of the record in one write, creating it if needed
    async fn set_fields(&self, key: &str, fields: HashMap<String, String>) -> StoreResult<()>;

    /// Remove the given fields; missing fields are ignored
    async fn delete_fields(&self, key: &str, fields: &[String]) -> StoreResult<()>;

    /// List the record's field names (empty if the record is absent)
    async fn field_names(&self, key: &str) -> StoreResult<Vec<String>>;

    /// Atomically add `delta` to a numeric field, returning the new value
    ///
    /// An absent field counts from zero; an absent record is created.
    async fn increment(&self, key: &str, field: &str, delta: i64) -> StoreResult<i64>;

    /// Arm the record's expiration timer
    async fn expire(&self, key: &str, ttl: Duration) -> StoreResult<()>;

    /// Commit a batch of mutations as a single atomic unit
    async fn apply(&self, batch: Batch) -> StoreResult<()>;
}
