use serde::{Deserialize, Serialize};

/// Kind of content currently projected.
///
/// `Idle` is the only kind without content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectionKind {
    #[default]
    Idle,
    /// Scripture or any prose text
    Text,
    /// Hymn stanza or pasted slide
    Lyric,
}

/// What is currently projected.
///
/// Invariant: `kind == Idle` implies empty `content` and `reference`. Fields are
/// private so every value, including deserialized ones, upholds it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawProjectionState")]
pub struct ProjectionState {
    #[serde(rename = "type")]
    kind: ProjectionKind,
    content: String,
    reference: String,
}

impl ProjectionState {
    pub fn new(kind: ProjectionKind, content: impl Into<String>, reference: impl Into<String>) -> Self {
        match kind {
            ProjectionKind::Idle => Self::idle(),
            kind => Self {
                kind,
                content: content.into(),
                reference: reference.into(),
            },
        }
    }

    pub fn idle() -> Self {
        Self::default()
    }

    pub fn text(content: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::new(ProjectionKind::Text, content, reference)
    }

    pub fn lyric(content: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::new(ProjectionKind::Lyric, content, reference)
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn is_idle(&self) -> bool {
        self.kind == ProjectionKind::Idle
    }
}

#[derive(Deserialize)]
struct RawProjectionState {
    #[serde(rename = "type", default)]
    kind: ProjectionKind,
    #[serde(default)]
    content: String,
    #[serde(default)]
    reference: String,
}

impl From<RawProjectionState> for ProjectionState {
    fn from(raw: RawProjectionState) -> Self {
        Self::new(raw.kind, raw.content, raw.reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_drops_content_and_reference() {
        let state = ProjectionState::new(ProjectionKind::Idle, "John 3:16", "text");
        assert!(state.is_idle());
        assert_eq!(state.content(), "");
        assert_eq!(state.reference(), "");
    }

    #[test]
    fn deserialized_idle_upholds_invariant() {
        let state: ProjectionState =
            serde_json::from_str(r#"{"type":"IDLE","content":"leftover","reference":"x"}"#)
                .unwrap();
        assert_eq!(state, ProjectionState::idle());
    }

    #[test]
    fn serializes_kind_as_type_field() {
        let json = serde_json::to_value(ProjectionState::lyric("a", "12. Hino")).unwrap();
        assert_eq!(json["type"], "LYRIC");
        assert_eq!(json["content"], "a");
        assert_eq!(json["reference"], "12. Hino");
    }
}
