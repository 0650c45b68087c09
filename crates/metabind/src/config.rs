//! Configuration types for metabind
//!
//! Plain values consumed by the core; loading them from a file or the
//! environment is the embedding application's concern.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default key template: `metadata:<owner type>:<owner id>`
pub const DEFAULT_KEY_TEMPLATE: &str = "metadata:%(identifier)s:%(id)s";

/// Root configuration for metabind
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Key template with `%(identifier)s` / `%(id)s` placeholders.
    /// An empty template leaves every owner unconfigured.
    pub key_template: String,
    /// Expiration applied when a write creates the backing record.
    /// Absent means records never expire by default.
    pub default_ttl_secs: Option<u64>,
    /// Store connection parameters
    pub store: StoreConfig,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            key_template: DEFAULT_KEY_TEMPLATE.to_string(),
            default_ttl_secs: None,
            store: StoreConfig::default(),
        }
    }
}

impl MetadataConfig {
    /// Default record expiration as a duration
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl_secs.map(Duration::from_secs)
    }
}

/// Connection parameters for the backing store
///
/// Consumed by whichever client constructor the application wires in; the
/// core itself never opens connections.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store endpoint URL
    pub url: String,
    /// Connect timeout (milliseconds)
    pub connect_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379/0".to_string(),
            connect_timeout_ms: 5000,
        }
    }
}
