//! Recorded draw stream.
//!
//! Visuals record renderer-agnostic commands here while the scene is
//! traversed. Geometry is already in pixel space: the traversal maps each
//! shape through the accumulated entity transform before recording it.
//!
//! Extending:
//! - add a shape module under `draw::shapes::*` with its payload type and a
//!   `DrawList::push_*` helper
//! - add the matching [`DrawCmd`] variant

mod cmd;
mod list;

pub mod shapes;

pub use cmd::DrawCmd;
pub use list::DrawList;
pub use shapes::Border;
