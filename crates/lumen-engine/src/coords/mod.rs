//! Coordinate and geometry types shared by the engine and the scene graph.
//!
//! Spaces in use:
//! - ND (normalized device): origin at the canvas center, +Y up, `[-1, 1]`
//! - pixel: logical pixels, origin top-left, +Y down
//! - entity-local: whatever an entity's [`Transform`] maps into its parent
//!
//! [`Transform::nd_to_pixel`] is the bridge between the first two.

mod rect;
mod transform;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use transform::Transform;
pub use vec2::Vec2;
pub use viewport::Viewport;
