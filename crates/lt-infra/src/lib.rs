//! Infrastructure implementations of the `lt-core` ports.

pub mod fs;
pub mod http;
pub mod sync;
pub mod time;

pub use fs::{FsBundledDatasets, FsResourceStore};
pub use http::ReqwestMirrorFetcher;
pub use sync::{FileProjectionChannel, InMemoryProjectionChannel};
pub use time::SystemClock;
