//! In-memory hash store
//!
//! In production the core runs against a remote store; this backend keeps
//! records in a process-local map with the same observable semantics:
//! record-drops-when-empty, lazy expiry, atomic batch commits under one lock.

use crate::batch::{Batch, BatchCommand};
use crate::error::{StoreError, StoreResult};
use crate::store::HashStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Default)]
struct Record {
    fields: HashMap<String, String>,
    expires_at: Option<Instant>,
}

impl Record {
    fn expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Instant::now())
    }
}

/// In-memory reference backend
///
/// Records indexed by key; a record with an elapsed timer or no remaining
/// fields counts as absent, matching remote hash-store behavior.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Record>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining time before the record expires, if a timer is armed
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let mut records = self.records.lock();
        Self::evict_expired(&mut records, key);
        records
            .get(key)
            .and_then(|r| r.expires_at)
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    fn evict_expired(records: &mut HashMap<String, Record>, key: &str) {
        if records.get(key).is_some_and(Record::expired) {
            records.remove(key);
        }
    }

    fn apply_command(records: &mut HashMap<String, Record>, command: BatchCommand) {
        match command {
            BatchCommand::SetFields { key, fields } => {
                Self::evict_expired(records, &key);
                records.entry(key).or_default().fields.extend(fields);
            }
            BatchCommand::DeleteField { key, field } => {
                Self::evict_expired(records, &key);
                if let Some(record) = records.get_mut(&key) {
                    record.fields.remove(&field);
                    if record.fields.is_empty() {
                        records.remove(&key);
                    }
                }
            }
            BatchCommand::Expire { key, ttl } => {
                Self::evict_expired(records, &key);
                if let Some(record) = records.get_mut(&key) {
                    record.expires_at = Some(Instant::now() + ttl);
                }
            }
        }
    }
}

#[async_trait]
impl HashStore for MemoryStore {
    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let mut records = self.records.lock();
        Self::evict_expired(&mut records, key);
        Ok(records.contains_key(key))
    }

    async fn get_all(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        let mut records = self.records.lock();
        Self::evict_expired(&mut records, key);
        Ok(records.get(key).map(|r| r.fields.clone()).unwrap_or_default())
    }

    async fn set_fields(&self, key: &str, fields: HashMap<String, String>) -> StoreResult<()> {
        let mut records = self.records.lock();
        Self::apply_command(&mut records, BatchCommand::SetFields {
            key: key.to_string(),
            fields,
        });
        Ok(())
    }

    async fn delete_fields(&self, key: &str, fields: &[String]) -> StoreResult<()> {
        let mut records = self.records.lock();
        for field in fields {
            Self::apply_command(&mut records, BatchCommand::DeleteField {
                key: key.to_string(),
                field: field.clone(),
            });
        }
        Ok(())
    }

    async fn field_names(&self, key: &str) -> StoreResult<Vec<String>> {
        let mut records = self.records.lock();
        Self::evict_expired(&mut records, key);
        Ok(records
            .get(key)
            .map(|r| r.fields.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn increment(&self, key: &str, field: &str, delta: i64) -> StoreResult<i64> {
        let mut records = self.records.lock();
        Self::evict_expired(&mut records, key);
        let record = records.entry(key.to_string()).or_default();
        let current = match record.fields.get(field) {
            Some(value) => value.parse::<i64>().map_err(|_| StoreError::NotNumeric {
                field: field.to_string(),
            })?,
            None => 0,
        };
        let next = current.checked_add(delta).ok_or_else(|| {
            StoreError::Operation(format!("increment overflows field '{field}'"))
        })?;
        record.fields.insert(field.to_string(), next.to_string());
        Ok(next)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> StoreResult<()> {
        let mut records = self.records.lock();
        Self::apply_command(&mut records, BatchCommand::Expire {
            key: key.to_string(),
            ttl,
        });
        Ok(())
    }

    async fn apply(&self, batch: Batch) -> StoreResult<()> {
        // One lock span for the whole group keeps the commit atomic with
        // respect to every other operation on this store.
        let commands = batch.len();
        let mut records = self.records.lock();
        for command in batch.into_commands() {
            Self::apply_command(&mut records, command);
        }
        debug!(commands, "committed batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_set_and_get_all() {
        let store = MemoryStore::new();
        store
            .set_fields("rec", fields(&[("a", "1"), ("b", "2")]))
            .await
            .unwrap();

        let all = store.get_all("rec").await.unwrap();
        assert_eq!(all.get("a").map(String::as_str), Some("1"));
        assert_eq!(all.get("b").map(String::as_str), Some("2"));
        assert!(store.exists("rec").await.unwrap());
    }

    #[tokio::test]
    async fn test_absent_record_reads_empty() {
        let store = MemoryStore::new();
        assert!(!store.exists("missing").await.unwrap());
        assert!(store.get_all("missing").await.unwrap().is_empty());
        assert!(store.field_names("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_dropped_when_last_field_deleted() {
        let store = MemoryStore::new();
        store.set_fields("rec", fields(&[("a", "1")])).await.unwrap();
        store
            .delete_fields("rec", &["a".to_string()])
            .await
            .unwrap();
        assert!(!store.exists("rec").await.unwrap());
    }

    #[tokio::test]
    async fn test_increment_from_zero_and_existing() {
        let store = MemoryStore::new();
        assert_eq!(store.increment("rec", "n", 2).await.unwrap(), 2);
        assert_eq!(store.increment("rec", "n", 2).await.unwrap(), 4);
        assert_eq!(store.increment("rec", "n", -1).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_increment_overflow_fails_without_wrapping() {
        let store = MemoryStore::new();
        store
            .set_fields("rec", fields(&[("n", &i64::MAX.to_string())]))
            .await
            .unwrap();

        let err = store.increment("rec", "n", 1).await.unwrap_err();
        assert!(matches!(err, StoreError::Operation(_)));

        // The stored value is left untouched by the rejected increment.
        let all = store.get_all("rec").await.unwrap();
        assert_eq!(all.get("n"), Some(&i64::MAX.to_string()));
    }

    #[tokio::test]
    async fn test_increment_non_numeric_fails() {
        let store = MemoryStore::new();
        store
            .set_fields("rec", fields(&[("n", "abc")]))
            .await
            .unwrap();
        let err = store.increment("rec", "n", 1).await.unwrap_err();
        assert!(matches!(err, StoreError::NotNumeric { .. }));
    }

    #[tokio::test]
    async fn test_expired_record_counts_as_absent() {
        let store = MemoryStore::new();
        store.set_fields("rec", fields(&[("a", "1")])).await.unwrap();
        store.expire("rec", Duration::from_millis(5)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(!store.exists("rec").await.unwrap());
        assert!(store.get_all("rec").await.unwrap().is_empty());
        assert_eq!(store.ttl("rec"), None);
    }

    #[tokio::test]
    async fn test_batch_applies_all_commands() {
        let store = MemoryStore::new();
        store
            .set_fields("rec", fields(&[("old", "x")]))
            .await
            .unwrap();

        let mut batch = Batch::new();
        batch.set_fields("rec", fields(&[("new", "y")]));
        batch.delete_field("rec", "old");
        store.apply(batch).await.unwrap();

        let all = store.get_all("rec").await.unwrap();
        assert_eq!(all.get("new").map(String::as_str), Some("y"));
        assert!(!all.contains_key("old"));
    }

    #[tokio::test]
    async fn test_expire_in_batch_arms_timer() {
        let store = MemoryStore::new();

        let mut batch = Batch::new();
        batch.set_fields("rec", fields(&[("a", "1")]));
        batch.expire("rec", Duration::from_secs(60));
        store.apply(batch).await.unwrap();

        let remaining = store.ttl("rec").expect("timer armed");
        assert!(remaining <= Duration::from_secs(60));
        assert!(remaining > Duration::from_secs(50));
    }
}
