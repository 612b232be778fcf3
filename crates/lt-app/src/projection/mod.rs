//! Control-surface projection state.
//!
//! English: [`ProjectionStore`] is the single writer. Every replicated write is
//! queued for the [`SnapshotPublisher`] worker, which pushes snapshots to the
//! Cross-Surface Sync Channel in order.
//!
//! 中文：[`ProjectionStore`] 是唯一写入者。每次需要复制的写入都会排队交给
//! [`SnapshotPublisher`]，由其按顺序发布到跨界面同步通道。

mod handlers;
mod publisher;
mod store;

pub use handlers::{NavigationHandler, NavigationHandlers};
pub use publisher::SnapshotPublisher;
pub use store::ProjectionStore;
