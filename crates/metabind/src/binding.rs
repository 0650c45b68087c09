//! Per-owner binding declaration
//!
//! A [`MetadataBinding`] is declared once per owner type and holds the
//! shared store handle, key template, and default TTL. Every `bind` call
//! produces a fresh [`MetadataContainer`] for one owner instance; container
//! state never leaks between owners or between separate bind calls.

use crate::config::MetadataConfig;
use crate::container::MetadataContainer;
use crate::key::KeyTemplate;
use crate::owner::MetadataOwner;
use metabind_store::HashStore;
use std::sync::Arc;
use std::time::Duration;

/// Shared declaration producing owner-scoped containers
#[derive(Clone)]
pub struct MetadataBinding {
    store: Arc<dyn HashStore>,
    template: KeyTemplate,
    default_ttl: Option<Duration>,
}

impl MetadataBinding {
    /// Create a binding with the default key template
    pub fn new(store: Arc<dyn HashStore>) -> Self {
        Self {
            store,
            template: KeyTemplate::default(),
            default_ttl: None,
        }
    }

    /// Create a binding from configuration values
    pub fn from_config(store: Arc<dyn HashStore>, config: &MetadataConfig) -> Self {
        Self {
            store,
            template: KeyTemplate::new(config.key_template.clone()),
            default_ttl: config.default_ttl(),
        }
    }

    /// Override the key template for this declaration
    pub fn with_template(mut self, template: KeyTemplate) -> Self {
        self.template = template;
        self
    }

    /// Set the expiration applied when a write creates a record
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Build a fresh container bound to one owner instance
    ///
    /// The store handle and template are shared by reference; the snapshot
    /// belongs to the returned container alone. Callers wanting state to
    /// persist across accesses keep the returned value.
    pub fn bind<O: MetadataOwner>(&self, owner: &O) -> MetadataContainer {
        let key = self.template.resolve(owner);
        MetadataContainer::from_parts(Arc::clone(&self.store), key, self.default_ttl)
    }

    /// Build a container bound to a fixed store key
    pub fn bind_key(&self, key: impl Into<String>) -> MetadataContainer {
        MetadataContainer::from_parts(Arc::clone(&self.store), Some(key.into()), self.default_ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetadataError;
    use metabind_store::MemoryStore;

    struct Poll {
        id: u64,
    }

    impl MetadataOwner for Poll {
        const KIND: &'static str = "poll";

        fn identity(&self) -> String {
            self.id.to_string()
        }
    }

    fn binding() -> MetadataBinding {
        MetadataBinding::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_bound_containers_are_independent_per_owner() {
        let binding = binding();
        let first = Poll { id: 1 };
        let second = Poll { id: 2 };

        let mut metadata = binding.bind(&first);
        metadata.set("color", "blue").await.unwrap();

        let mut other = binding.bind(&second);
        assert_eq!(other.get("color").await.unwrap(), None);

        assert_eq!(metadata.key().unwrap(), "metadata:poll:1");
        assert_eq!(other.key().unwrap(), "metadata:poll:2");
    }

    #[tokio::test]
    async fn test_each_bind_yields_a_fresh_container() {
        let binding = binding();
        let poll = Poll { id: 1 };

        let mut metadata = binding.bind(&poll);
        metadata.set("color", "blue").await.unwrap();
        assert!(metadata.is_loaded());

        // A new bind starts unloaded but reads the same record.
        let mut again = binding.bind(&poll);
        assert!(!again.is_loaded());
        assert_eq!(again.get("color").await.unwrap().as_deref(), Some("blue"));
    }

    #[tokio::test]
    async fn test_binding_carries_config_values() {
        let mut config = MetadataConfig::default();
        config.key_template = "app:%(identifier)s:%(id)s".to_string();
        config.default_ttl_secs = Some(60);

        let store = Arc::new(MemoryStore::new());
        let binding = MetadataBinding::from_config(Arc::clone(&store) as _, &config);

        let mut metadata = binding.bind(&Poll { id: 3 });
        assert_eq!(metadata.key().unwrap(), "app:poll:3");

        metadata.set("a", "1").await.unwrap();
        assert!(store.ttl("app:poll:3").is_some());
    }

    #[tokio::test]
    async fn test_empty_template_binds_unconfigured_container() {
        let binding = binding().with_template(KeyTemplate::new(""));
        let mut metadata = binding.bind(&Poll { id: 1 });

        assert!(matches!(
            metadata.get("a").await,
            Err(MetadataError::Unconfigured)
        ));
    }

    #[tokio::test]
    async fn test_bind_key_uses_fixed_key() {
        let binding = binding();
        let mut metadata = binding.bind_key("metadata:custom");
        metadata.set("a", "1").await.unwrap();
        assert_eq!(metadata.key().unwrap(), "metadata:custom");
    }
}
