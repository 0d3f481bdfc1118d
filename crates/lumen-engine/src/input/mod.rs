//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The runtime feeds winit callbacks into an [`InputState`], which produces
//! [`PointerInput`] occurrences for the application.

mod state;
mod types;

pub use state::InputState;
pub use types::{Modifiers, MouseButton, PointerInput, PointerKind};
