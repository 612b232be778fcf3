use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Logical resource name, e.g. `bible_nvi` or `harpa`.
///
/// Doubles as the Durable Resource Store key, so it is restricted to a
/// filesystem- and URL-safe alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl_id!(ResourceId);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// `true` when the id is non-empty and only contains `[A-Za-z0-9_-]`.
    pub fn is_storage_safe(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }
}
