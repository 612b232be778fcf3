//! Cross-surface sync channels.
//!
//! English: Both channels keep the latest snapshot durable before notifying,
//! so a surface that attaches late can always hydrate from `load_snapshot`.
//!
//! 中文：两种通道都先持久化最新快照再通知订阅者，晚加入的投影端可以通过
//! `load_snapshot` 追上最新状态。

mod file_channel;
mod memory_channel;

pub use file_channel::FileProjectionChannel;
pub use memory_channel::InMemoryProjectionChannel;

/// Broadcast buffer per channel. Subscribers that fall further behind get
/// `Lagged` and re-hydrate from the durable snapshot.
pub const NOTIFY_CAPACITY: usize = 64;
