use serde::{Deserialize, Serialize};

use super::{DisplaySettings, ProjectionState};
use crate::ids::WriterEpoch;

/// The replicated tuple: everything a projector surface needs to render.
///
/// Wire shape (JSON):
/// `{ epoch, seq, type, content, reference, fontSize, backgroundImage?, blackout }`
///
/// `seq` is assigned by the single writer and increases by one per publish.
/// Replicas use it to discard stale or duplicate deliveries from the same
/// `epoch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSnapshot {
    #[serde(default)]
    pub epoch: WriterEpoch,
    pub seq: u64,
    #[serde(flatten)]
    pub projection: ProjectionState,
    #[serde(flatten)]
    pub settings: DisplaySettings,
    #[serde(default)]
    pub blackout: bool,
}

impl ProjectionSnapshot {
    /// Snapshot a replica assumes before anything has been published.
    pub fn initial() -> Self {
        Self {
            epoch: WriterEpoch::default(),
            seq: 0,
            projection: ProjectionState::idle(),
            settings: DisplaySettings::default(),
            blackout: false,
        }
    }

    /// Whether `self` may be ordered against `other` by seq.
    pub fn same_writer(&self, other: &Self) -> bool {
        self.epoch == other.epoch
    }

    /// Equality ignoring `epoch` and `seq`.
    pub fn same_payload(&self, other: &Self) -> bool {
        self.projection == other.projection
            && self.settings == other.settings
            && self.blackout == other.blackout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ProjectionKind;

    #[test]
    fn wire_shape_is_flat() {
        let snapshot = ProjectionSnapshot {
            epoch: WriterEpoch::from("run-1"),
            seq: 7,
            projection: ProjectionState::text("For God so loved", "John 3:16"),
            settings: DisplaySettings::default(),
            blackout: true,
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["epoch"], "run-1");
        assert_eq!(value["seq"], 7);
        assert_eq!(value["type"], "TEXT");
        assert_eq!(value["reference"], "John 3:16");
        assert_eq!(value["fontSize"], 60.0);
        assert_eq!(value["blackout"], true);
        assert!(value.get("backgroundImage").is_none());
    }

    #[test]
    fn parses_wire_shape() {
        let json = r#"{"seq":3,"type":"LYRIC","content":"a","reference":"r","fontSize":72,"backgroundImage":"bg.png","blackout":false}"#;
        let snapshot: ProjectionSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.seq, 3);
        assert!(snapshot.epoch.is_unset());
        assert_eq!(snapshot.projection.kind(), ProjectionKind::Lyric);
        assert_eq!(snapshot.settings.font_size, 72.0);
        assert_eq!(snapshot.settings.background_image.as_deref(), Some("bg.png"));
    }

    #[test]
    fn same_payload_ignores_seq() {
        let a = ProjectionSnapshot::initial();
        let mut b = a.clone();
        b.seq = 9;
        assert!(a.same_payload(&b));
        b.blackout = true;
        assert!(!a.same_payload(&b));
    }
}
