//! Projector surfaces: read-only replicas of the control surface's projection.

mod replica;

pub use replica::ProjectorReplica;
