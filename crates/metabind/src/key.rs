//! Store key derivation
//!
//! A [`KeyTemplate`] turns an owner's type identifier and unique id into the
//! store key its metadata record lives under. Derivation is pure: the same
//! owner always yields the same key.

use crate::config::DEFAULT_KEY_TEMPLATE;
use crate::owner::MetadataOwner;
use serde::{Deserialize, Serialize};

/// Key template with `%(identifier)s` and `%(id)s` placeholders
///
/// An empty template resolves to no key; containers built from it reject
/// every operation as unconfigured.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyTemplate(String);

impl KeyTemplate {
    /// Create a template from a raw string
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Check whether this template can produce a key at all
    pub fn is_configured(&self) -> bool {
        !self.0.is_empty()
    }

    /// Derive the store key for an owner, or `None` if unconfigured
    pub fn resolve<O: MetadataOwner>(&self, owner: &O) -> Option<String> {
        self.resolve_parts(O::KIND, &owner.identity())
    }

    /// Derive the store key from raw identifier/id parts
    pub fn resolve_parts(&self, identifier: &str, id: &str) -> Option<String> {
        if !self.is_configured() {
            return None;
        }
        Some(
            self.0
                .replace("%(identifier)s", identifier)
                .replace("%(id)s", id),
        )
    }
}

impl Default for KeyTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_TEMPLATE)
    }
}
