use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Identifies one run of the control surface.
///
/// `seq` only orders snapshots within an epoch. A replica that sees a new
/// epoch starts comparing seqs afresh, so a writer that restarts without its
/// previous snapshot is still followed. The empty epoch marks snapshots
/// written before epochs existed, and the state a replica starts from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WriterEpoch(String);

impl_id!(WriterEpoch);

impl WriterEpoch {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }
}
