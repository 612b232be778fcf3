//! Projection domain: what is on screen and how it travels to projector surfaces.
//!
//! ```text
//! control surface                         projector surfaces
//! ┌──────────────────┐  ProjectionSnapshot  ┌──────────────────┐
//! │ ProjectionState  │ ───────────────────▶ │ render() → Frame │
//! │ DisplaySettings  │   (durable + notify) │                  │
//! │ blackout         │                      └──────────────────┘
//! └──────────────────┘
//! ```

pub mod frame;
pub mod settings;
pub mod snapshot;
pub mod state;

pub use frame::{render, Frame, REFERENCE_FONT_RATIO};
pub use settings::{DisplaySettings, InvalidDisplaySettings, DEFAULT_FONT_SIZE};
pub use snapshot::ProjectionSnapshot;
pub use state::{ProjectionKind, ProjectionState};
