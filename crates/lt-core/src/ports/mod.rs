//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations, so the pipeline and the projection
//! store never depend on a concrete filesystem, HTTP client or channel.

mod bundled;
mod clock;
mod mirror_fetcher;
mod projection_channel;
mod resource_store;

pub use bundled::BundledDatasetPort;
pub use clock::ClockPort;
pub use mirror_fetcher::MirrorFetcherPort;
pub use projection_channel::ProjectionChannelPort;
pub use resource_store::ResourceStorePort;
