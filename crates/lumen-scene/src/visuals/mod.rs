//! Built-in visuals.
//!
//! Each one draws a single primitive in its entity's local space. Custom
//! content implements [`Visual`](crate::entity::Visual) directly.

pub mod circle;
pub mod rect;

pub use circle::CircleVisual;
pub use rect::RectVisual;
