//! Business logic use cases
//! 业务用例
//!
//! LoadResource (config + bundled datasets)
//!         ↓
//! AcquireResource (bundled → cache → mirrors → offline fallback)

pub mod acquire_resource;
pub mod load_resource;

pub use acquire_resource::{AcquireRequest, AcquireResource};
pub use load_resource::{LoadResource, LoadResourceError};
