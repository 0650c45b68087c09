//! Metabind - schemaless metadata for identifiable owners
//!
//! Attaches an arbitrary set of string fields to any entity with a stable
//! identity, persisted in a remote hash store under a key derived from the
//! owner. Containers feel local (get, iterate, length) but synchronize
//! transparently: lazy load on first read, atomic batched commits on write,
//! expiration armed only when a write creates the backing record.
//!
//! ```
//! use metabind::{MetadataBinding, MetadataOwner};
//! use metabind_store::MemoryStore;
//! use std::sync::Arc;
//!
//! struct Poll { id: u64 }
//!
//! impl MetadataOwner for Poll {
//!     const KIND: &'static str = "poll";
//!     fn identity(&self) -> String { self.id.to_string() }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> metabind::Result<()> {
//! let binding = MetadataBinding::new(Arc::new(MemoryStore::new()));
//! let mut metadata = binding.bind(&Poll { id: 1 });
//!
//! metadata.set("color", "blue").await?;
//! assert_eq!(metadata.get("color").await?.as_deref(), Some("blue"));
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod config;
pub mod container;
pub mod error;
pub mod key;
pub mod owner;

pub use binding::MetadataBinding;
pub use config::{MetadataConfig, StoreConfig, DEFAULT_KEY_TEMPLATE};
pub use container::{MetadataContainer, MetadataUpdate, Ttl};
pub use error::{MetadataError, Result};
pub use key::KeyTemplate;
pub use owner::MetadataOwner;
