//! Traversable content sequences that drive the navigation handlers.

mod sequence;

pub use sequence::{ContentSequence, SequenceItem};
