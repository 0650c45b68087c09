//! Metabind Store - Hash-structured key-value store boundary
//!
//! This crate defines the store capability the metadata core runs against:
//! the `HashStore` trait, the atomic `Batch` command group, and an
//! in-process `MemoryStore` reference backend.

pub mod batch;
pub mod error;
pub mod memory;
pub mod store;

pub use batch::{Batch, BatchCommand};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use store::HashStore;
