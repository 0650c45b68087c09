//! Atomic command groups
//!
//! A `Batch` collects mutation commands which a backend commits
//! all-or-nothing via [`HashStore::apply`](crate::store::HashStore::apply).
//! Commands are applied in insertion order.

use std::collections::HashMap;
use std::time::Duration;

/// One mutation inside a batch
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchCommand {
    /// Set several fields of one record in a single write
    SetFields {
        key: String,
        fields: HashMap<String, String>,
    },
    /// Remove one field from a record
    DeleteField { key: String, field: String },
    /// Arm the record's expiration timer
    Expire { key: String, ttl: Duration },
}

/// Ordered group of mutations committed as one atomic unit
#[derive(Clone, Debug, Default)]
pub struct Batch {
    commands: Vec<BatchCommand>,
}

impl Batch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a multi-field set
    pub fn set_fields(&mut self, key: impl Into<String>, fields: HashMap<String, String>) {
        self.commands.push(BatchCommand::SetFields {
            key: key.into(),
            fields,
        });
    }

    /// Queue a single-field delete
    pub fn delete_field(&mut self, key: impl Into<String>, field: impl Into<String>) {
        self.commands.push(BatchCommand::DeleteField {
            key: key.into(),
            field: field.into(),
        });
    }

    /// Queue an expiration
    pub fn expire(&mut self, key: impl Into<String>, ttl: Duration) {
        self.commands.push(BatchCommand::Expire {
            key: key.into(),
            ttl,
        });
    }

    /// Check if no commands have been queued
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Get the number of queued commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Consume the batch, yielding its commands in insertion order
    pub fn into_commands(self) -> Vec<BatchCommand> {
        self.commands
    }
}
