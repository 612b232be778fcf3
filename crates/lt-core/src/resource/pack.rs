use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ResourceKind;
use crate::ids::ResourceId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hymn {
    pub number: u32,
    pub title: String,
    pub lyrics: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbrev: Option<String>,
    /// `chapters[c][v]` is verse `v + 1` of chapter `c + 1`.
    pub chapters: Vec<Vec<String>>,
}

impl Book {
    pub fn verse_count(&self) -> usize {
        self.chapters.iter().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackContent {
    Scripture(Vec<Book>),
    Hymnal(Vec<Hymn>),
}

/// Canonical, normalized content pack. Immutable once acquired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePack {
    pub id: ResourceId,
    pub items: PackContent,
}

impl ResourcePack {
    pub fn scripture(id: impl Into<ResourceId>, books: Vec<Book>) -> Self {
        Self {
            id: id.into(),
            items: PackContent::Scripture(books),
        }
    }

    pub fn hymnal(id: impl Into<ResourceId>, hymns: Vec<Hymn>) -> Self {
        Self {
            id: id.into(),
            items: PackContent::Hymnal(hymns),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self.items {
            PackContent::Scripture(_) => ResourceKind::Scripture,
            PackContent::Hymnal(_) => ResourceKind::Hymnal,
        }
    }

    pub fn len(&self) -> usize {
        match &self.items {
            PackContent::Scripture(books) => books.len(),
            PackContent::Hymnal(hymns) => hymns.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn books(&self) -> Option<&[Book]> {
        match &self.items {
            PackContent::Scripture(books) => Some(books),
            PackContent::Hymnal(_) => None,
        }
    }

    pub fn hymns(&self) -> Option<&[Hymn]> {
        match &self.items {
            PackContent::Hymnal(hymns) => Some(hymns),
            PackContent::Scripture(_) => None,
        }
    }

    pub fn hymn(&self, number: u32) -> Option<&Hymn> {
        self.hymns()?.iter().find(|h| h.number == number)
    }

    /// Minimum-size sanity check shared by the bundled and cached tiers.
    pub fn passes_sanity(&self, min_items: usize) -> bool {
        self.len() > min_items
    }
}

/// One Durable Resource Store record. Overwritten on every store, never appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: ResourceId,
    /// Always the canonical `ResourcePack` shape, never a raw source shape.
    pub payload: serde_json::Value,
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn from_pack(pack: &ResourcePack, stored_at: DateTime<Utc>) -> serde_json::Result<Self> {
        Ok(Self {
            key: pack.id.clone(),
            payload: serde_json::to_value(pack)?,
            stored_at,
        })
    }

    pub fn to_pack(&self) -> serde_json::Result<ResourcePack> {
        ResourcePack::deserialize(&self.payload)
    }
}

/// Which tier produced a pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AcquireStatus {
    Bundled,
    Cached,
    Network,
    /// Every mirror failed and the bundled dataset was used regardless of size.
    OfflineFallback,
}

impl AcquireStatus {
    pub fn is_degraded(self) -> bool {
        self == Self::OfflineFallback
    }
}

impl std::fmt::Display for AcquireStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Bundled => "bundled",
            Self::Cached => "cached",
            Self::Network => "network",
            Self::OfflineFallback => "offline-fallback",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AcquiredPack {
    pub pack: ResourcePack,
    pub status: AcquireStatus,
}
