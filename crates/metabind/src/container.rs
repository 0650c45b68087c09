//! Per-owner metadata container
//!
//! A [`MetadataContainer`] is the bound handle over one owner's hash record:
//! it lazily loads a snapshot on first read, batches multi-field writes and
//! deletes into one atomic commit, arms expiration only when a write creates
//! the backing record, and resolves wildcard patterns into bulk deletes.

use crate::error::{MetadataError, Result};
use metabind_store::{Batch, HashStore};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Characters that make a field name a wildcard pattern
const GLOB_CHARS: &[char] = &['*', '?', '['];

/// Expiration request for a write
///
/// Three states keep "caller said nothing" apart from "caller wants no
/// expiration": `Default` substitutes the container's configured TTL,
/// `Never` suppresses expiration even when a default is configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ttl {
    /// Use the container's default TTL
    Default,
    /// Expire this record after the given duration
    After(Duration),
    /// Do not arm an expiration timer
    Never,
}

/// Snapshot state of a container
#[derive(Clone, Debug)]
enum Snapshot {
    Unloaded,
    Loaded(HashMap<String, String>),
}

/// Set of field mutations applied in one atomic commit
///
/// `set` entries update fields, `clear` entries remove them; both land in
/// the same batch, mirroring the original mapping-with-null-values shape.
#[derive(Clone, Debug, Default)]
pub struct MetadataUpdate {
    entries: Vec<(String, Option<String>)>,
}

impl MetadataUpdate {
    /// Create an empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a field write
    pub fn set(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((field.into(), Some(value.into())));
        self
    }

    /// Queue a field removal
    pub fn clear(mut self, field: impl Into<String>) -> Self {
        self.entries.push((field.into(), None));
        self
    }

    /// Check if no mutations have been queued
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split into fields to write and fields to remove
    fn partition(self) -> (HashMap<String, String>, Vec<String>) {
        let mut to_update = HashMap::new();
        let mut to_delete = Vec::new();
        for (field, value) in self.entries {
            match value {
                Some(value) => {
                    to_update.insert(field, value);
                }
                None => to_delete.push(field),
            }
        }
        (to_update, to_delete)
    }
}

impl From<HashMap<String, Option<String>>> for MetadataUpdate {
    fn from(mapping: HashMap<String, Option<String>>) -> Self {
        Self {
            entries: mapping.into_iter().collect(),
        }
    }
}

impl FromIterator<(String, Option<String>)> for MetadataUpdate {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Bound handle over one owner's metadata record
///
/// Not safe to share across tasks without external synchronization: the
/// snapshot and its loaded flag are plain mutable state.
pub struct MetadataContainer {
    store: Arc<dyn HashStore>,
    key: Option<String>,
    default_ttl: Option<Duration>,
    snapshot: Snapshot,
}

impl MetadataContainer {
    /// Create a container bound to a fixed store key
    pub fn new(store: Arc<dyn HashStore>, key: impl Into<String>) -> Self {
        Self::from_parts(store, Some(key.into()), None)
    }

    pub(crate) fn from_parts(
        store: Arc<dyn HashStore>,
        key: Option<String>,
        default_ttl: Option<Duration>,
    ) -> Self {
        Self {
            store,
            key,
            default_ttl,
            snapshot: Snapshot::Unloaded,
        }
    }

    /// Set the expiration applied when a write creates the backing record
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// The store key this container reads and writes, if configured
    pub fn key(&self) -> Result<&str> {
        self.key.as_deref().ok_or(MetadataError::Unconfigured)
    }

    /// Check whether a snapshot is currently cached
    pub fn is_loaded(&self) -> bool {
        matches!(self.snapshot, Snapshot::Loaded(_))
    }

    /// Drop the cached snapshot; the next read loads fresh
    pub fn invalidate(&mut self) {
        self.snapshot = Snapshot::Unloaded;
    }

    /// Fetch the record's current fields into the snapshot
    ///
    /// On failure the previous snapshot is kept untouched.
    pub async fn load(&mut self) -> Result<()> {
        let key = self.key()?.to_string();
        let fields = self.store.get_all(&key).await?;
        debug!(key = %key, fields = fields.len(), "loaded metadata snapshot");
        self.snapshot = Snapshot::Loaded(fields);
        Ok(())
    }

    async fn ensure_loaded(&mut self) -> Result<&HashMap<String, String>> {
        if !self.is_loaded() {
            self.load().await?;
        }
        match &self.snapshot {
            Snapshot::Loaded(fields) => Ok(fields),
            Snapshot::Unloaded => unreachable!("snapshot loaded above"),
        }
    }

    /// All fields as of the last load or commit, loading lazily
    pub async fn snapshot_map(&mut self) -> Result<&HashMap<String, String>> {
        self.ensure_loaded().await
    }

    /// Look up a field, or `None` if absent
    pub async fn get(&mut self, field: &str) -> Result<Option<String>> {
        Ok(self.ensure_loaded().await?.get(field).cloned())
    }

    /// Look up a field that must be present
    pub async fn require(&mut self, field: &str) -> Result<String> {
        let key = self.key()?.to_string();
        self.ensure_loaded()
            .await?
            .get(field)
            .cloned()
            .ok_or_else(|| MetadataError::FieldNotFound {
                key,
                field: field.to_string(),
            })
    }

    /// Read a field, computing and storing it on a miss
    ///
    /// The read-then-write window is deliberately unguarded: two concurrent
    /// callers may both observe absence and both write, with the store's
    /// last committed write winning silently.
    pub async fn get_or_set<F>(&mut self, field: &str, supplier: F) -> Result<String>
    where
        F: FnOnce() -> String,
    {
        if let Some(value) = self.get(field).await? {
            return Ok(value);
        }
        let value = supplier();
        self.apply(MetadataUpdate::new().set(field, value.clone()), Ttl::Default)
            .await?;
        Ok(value)
    }

    /// Commit an update as one atomic batch, then reload
    ///
    /// Expiration is armed only when the backing record did not exist before
    /// this commit. Re-arming on every write would keep refreshing the timer
    /// and the record would never age out.
    pub async fn apply(&mut self, update: MetadataUpdate, ttl: Ttl) -> Result<()> {
        let key = self.key()?.to_string();
        if update.is_empty() {
            return self.load().await;
        }

        let (to_update, to_delete) = update.partition();
        let exists = self.store.exists(&key).await?;

        let mut batch = Batch::new();
        if !to_update.is_empty() {
            batch.set_fields(&key, to_update);
        }
        for field in to_delete {
            batch.delete_field(&key, field);
        }
        let effective_ttl = match ttl {
            Ttl::Default => self.default_ttl,
            Ttl::After(duration) => Some(duration),
            Ttl::Never => None,
        };
        if !exists {
            if let Some(duration) = effective_ttl {
                batch.expire(&key, duration);
            }
        }

        let commands = batch.len();
        self.store.apply(batch).await?;
        debug!(key = %key, commands, "committed metadata batch");
        self.load().await
    }

    /// Write one field
    pub async fn set(&mut self, field: &str, value: &str) -> Result<()> {
        self.apply(MetadataUpdate::new().set(field, value), Ttl::Default)
            .await
    }

    /// Remove one field
    pub async fn clear(&mut self, field: &str) -> Result<()> {
        self.apply(MetadataUpdate::new().clear(field), Ttl::Default)
            .await
    }

    /// Delete fields by exact name or shell-style wildcard pattern
    ///
    /// Wildcard matching runs against the field names read from the store at
    /// call time, not the cached snapshot. All matched fields go in one
    /// atomic batch; zero matches is a successful no-op. Returns the number
    /// of delete commands issued.
    pub async fn delete(&mut self, pattern: &str) -> Result<usize> {
        let key = self.key()?.to_string();

        let matched: Vec<String> = if pattern.contains(GLOB_CHARS) {
            let matcher = glob::Pattern::new(pattern)?;
            self.store
                .field_names(&key)
                .await?
                .into_iter()
                .filter(|field| matcher.matches(field))
                .collect()
        } else {
            vec![pattern.to_string()]
        };

        if !matched.is_empty() {
            let mut batch = Batch::new();
            for field in &matched {
                batch.delete_field(&key, field);
            }
            self.store.apply(batch).await?;
            debug!(key = %key, pattern, deleted = matched.len(), "deleted metadata fields");
        }
        self.load().await?;
        Ok(matched.len())
    }

    /// Atomically add `delta` to a numeric field, returning the new value
    ///
    /// Goes straight to the store: no lazy load before, no reload after.
    pub async fn increment(&self, field: &str, delta: i64) -> Result<i64> {
        let key = self.key()?;
        Ok(self.store.increment(key, field, delta).await?)
    }

    /// Field names in the snapshot
    pub async fn keys(&mut self) -> Result<Vec<String>> {
        Ok(self.ensure_loaded().await?.keys().cloned().collect())
    }

    /// Field values in the snapshot
    pub async fn values(&mut self) -> Result<Vec<String>> {
        Ok(self.ensure_loaded().await?.values().cloned().collect())
    }

    /// Field name/value pairs in the snapshot
    pub async fn items(&mut self) -> Result<Vec<(String, String)>> {
        Ok(self
            .ensure_loaded()
            .await?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    /// Check field membership in the snapshot
    pub async fn contains(&mut self, field: &str) -> Result<bool> {
        Ok(self.ensure_loaded().await?.contains_key(field))
    }

    /// Number of fields in the snapshot
    pub async fn len(&mut self) -> Result<usize> {
        Ok(self.ensure_loaded().await?.len())
    }

    /// Check whether the snapshot holds no fields
    pub async fn is_empty(&mut self) -> Result<bool> {
        Ok(self.ensure_loaded().await?.is_empty())
    }
}

impl fmt::Display for MetadataContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.snapshot {
            Snapshot::Loaded(fields) => {
                let mut sorted: Vec<_> = fields.iter().collect();
                sorted.sort();
                f.debug_map().entries(sorted).finish()
            }
            Snapshot::Unloaded => f.write_str("<unloaded>"),
        }
    }
}
