//! # lt-core
//!
//! Core domain models and business logic for Lectern.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! what is projected, how it is replicated to projector surfaces, and how content
//! packs are normalized into their canonical shape.

// Public module exports
pub mod config;
pub mod error;
pub mod ids;
pub mod ports;
pub mod projection;
pub mod resource;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use error::{AcquireError, AttemptFailure, FetchError, NormalizeError};
pub use ids::{ResourceId, SurfaceId, WriterEpoch};
pub use projection::{
    render, DisplaySettings, Frame, ProjectionKind, ProjectionSnapshot, ProjectionState,
};
pub use resource::{
    AcquireStatus, AcquiredPack, Book, CacheEntry, Hymn, PackContent, ResourceKind, ResourcePack,
};
