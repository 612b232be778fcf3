//! Content packs: canonical shapes, cache entries and source normalization.

pub mod kind;
pub mod normalize;
pub mod pack;
pub mod search;

pub use kind::ResourceKind;
pub use normalize::{normalize, parse_payload};
pub use pack::{AcquireStatus, AcquiredPack, Book, CacheEntry, Hymn, PackContent, ResourcePack};
pub use search::filter_hymns;
