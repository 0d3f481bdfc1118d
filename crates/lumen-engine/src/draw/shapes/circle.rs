use crate::coords::Vec2;
use crate::draw::{DrawCmd, DrawList};
use crate::paint::Color;

/// Filled ellipse in pixel space.
///
/// A circle in entity-local space becomes an ellipse under non-uniform scale,
/// so radii are stored per axis (always non-negative).
#[derive(Debug, Clone, PartialEq)]
pub struct CircleCmd {
    pub center: Vec2,
    pub radii: Vec2,
    pub color: Color,
}

impl DrawList {
    /// Records a filled ellipse.
    #[inline]
    pub fn push_circle(&mut self, center: Vec2, radii: Vec2, color: Color) {
        self.push(DrawCmd::Circle(CircleCmd {
            center,
            radii: Vec2::new(radii.x.abs(), radii.y.abs()),
            color,
        }));
    }
}
