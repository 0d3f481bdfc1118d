//! Lumen scene: an entity tree hosted on a drawing canvas.
//!
//! A [`Canvas`] owns one root [`Entity`]. Platform paint ticks become draw
//! traversals, pointer occurrences are routed through the tree until an
//! entity claims them, and any change inside the tree schedules a repaint.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use lumen_scene::prelude::*;
//!
//! let scene = Entity::scene().with_child(
//!     Entity::new("button").with_visual(
//!         RectVisual::new(Rect::new(-0.25, -0.25, 0.5, 0.5), Color::WHITE)
//!             .toggle_color(Color::from_rgb_u8(0xe0, 0x40, 0x40)),
//!     ),
//! );
//!
//! Application::new().title("demo").run(scene)?;
//! ```
//!
//! # Custom visuals
//!
//! Implement [`Visual`] for any type and attach it with
//! [`Entity::with_visual`]. Geometry is given in the entity's local space.

pub mod app;
pub mod canvas;
pub mod emitter;
pub mod entity;
pub mod event;
pub mod repaint;
pub mod visuals;

pub use app::Application;
pub use canvas::{Canvas, CanvasConfig, PointerOutcome, SceneMut};
pub use entity::{Entity, EntityMut, Visual};

/// Everything needed to build scenes and visuals.
pub mod prelude {
    pub use crate::app::Application;
    pub use crate::canvas::{Canvas, CanvasConfig, PointerOutcome, SceneMut};
    pub use crate::emitter::{SubscriptionId, UpdateEmitter};
    pub use crate::entity::{Entity, EntityMut, Visual};
    pub use crate::event::{CanvasInfo, DrawEvent, PathEvent, PointerEvent};
    pub use crate::visuals::{CircleVisual, RectVisual};

    // Engine primitives visuals work with.
    pub use lumen_engine::coords::{Rect, Transform, Vec2, Viewport};
    pub use lumen_engine::draw::Border;
    pub use lumen_engine::input::{MouseButton, PointerInput, PointerKind};
    pub use lumen_engine::paint::Color;
}
