use serde::{Deserialize, Serialize};

/// Which canonical shape a resource normalizes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Books → chapters → verses
    Scripture,
    /// Numbered hymns with lyrics
    Hymnal,
}

impl ResourceKind {
    /// A bundled or cached pack must hold strictly more items than this to be
    /// trusted; smaller packs are treated as stubs/placeholders.
    pub fn default_min_items(self) -> usize {
        match self {
            Self::Scripture => 5,
            Self::Hymnal => 100,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scripture => "scripture",
            Self::Hymnal => "hymnal",
        }
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scripture" | "bible" => Ok(Self::Scripture),
            "hymnal" | "hymns" => Ok(Self::Hymnal),
            other => Err(format!("unknown resource kind: {other}")),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
