use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Identifies one attached projector surface in logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(String);

impl_id!(SurfaceId);

impl SurfaceId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}
