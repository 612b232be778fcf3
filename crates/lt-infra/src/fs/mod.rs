mod atomic;
pub mod bundled;
pub mod resource_store;

pub use bundled::FsBundledDatasets;
pub use resource_store::FsResourceStore;

pub(crate) use atomic::atomic_write;
