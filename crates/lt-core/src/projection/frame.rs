//! Pure rendering model for projector surfaces.

use super::{ProjectionKind, ProjectionSnapshot};

/// Reference line is rendered at this fraction of the body font size.
pub const REFERENCE_FONT_RATIO: f32 = 0.45;

/// What a projector surface shows for a given snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Nothing projected: welcome/logo screen.
    Welcome { background_image: Option<String> },
    /// Blackout: background only, content suppressed but retained upstream.
    Rest { background_image: Option<String> },
    Text {
        kind: ProjectionKind,
        content: String,
        reference: Option<String>,
        font_size: f32,
        reference_font_size: f32,
        background_image: Option<String>,
    },
}

/// Derive the frame for a snapshot. Same input, same frame.
pub fn render(snapshot: &ProjectionSnapshot) -> Frame {
    let background_image = snapshot.settings.background_image.clone();

    if snapshot.blackout {
        return Frame::Rest { background_image };
    }

    let projection = &snapshot.projection;
    match projection.kind() {
        ProjectionKind::Idle => Frame::Welcome { background_image },
        kind => {
            let font_size = snapshot.settings.font_size;
            Frame::Text {
                kind,
                content: projection.content().to_string(),
                reference: (!projection.reference().is_empty())
                    .then(|| projection.reference().to_string()),
                font_size,
                reference_font_size: font_size * REFERENCE_FONT_RATIO,
                background_image,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{DisplaySettings, ProjectionState};

    fn snapshot(projection: ProjectionState, blackout: bool) -> ProjectionSnapshot {
        ProjectionSnapshot {
            seq: 1,
            projection,
            settings: DisplaySettings::default(),
            blackout,
            ..ProjectionSnapshot::initial()
        }
    }

    #[test]
    fn idle_renders_welcome() {
        let frame = render(&snapshot(ProjectionState::idle(), false));
        assert_eq!(frame, Frame::Welcome { background_image: None });
    }

    #[test]
    fn blackout_hides_content() {
        let frame = render(&snapshot(ProjectionState::text("a", "b"), true));
        assert_eq!(frame, Frame::Rest { background_image: None });
    }

    #[test]
    fn empty_reference_is_omitted() {
        match render(&snapshot(ProjectionState::lyric("stanza", ""), false)) {
            Frame::Text {
                reference,
                reference_font_size,
                ..
            } => {
                assert_eq!(reference, None);
                assert_eq!(reference_font_size, 60.0 * REFERENCE_FONT_RATIO);
            }
            other => panic!("unexpected frame {other:?}"),
        }
    }
}
