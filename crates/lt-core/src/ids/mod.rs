//! ID type wrappers for type safety.

mod id_macro;
pub mod resource_id;
pub mod surface_id;
pub mod writer_epoch;

pub use resource_id::ResourceId;
pub use surface_id::SurfaceId;
pub use writer_epoch::WriterEpoch;
