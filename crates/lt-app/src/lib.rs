//! Lectern Application Orchestration Layer
//!
//! This crate contains the use cases (resource acquisition) and the runtime
//! pieces each surface runs: the projection store on the control surface, the
//! replica on projector surfaces, and the autoplay driver.

pub mod autoplay;
pub mod navigation;
pub mod projection;
pub mod projector;
pub mod usecases;

pub use autoplay::{AutoplayDriver, AutoplayHandle, AutoplayNotice};
pub use navigation::{ContentSequence, SequenceItem};
pub use projection::{NavigationHandler, NavigationHandlers, ProjectionStore, SnapshotPublisher};
pub use projector::ProjectorReplica;
pub use usecases::{AcquireRequest, AcquireResource, LoadResource, LoadResourceError};
