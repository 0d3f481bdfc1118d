use anyhow::Result;

use lumen_engine::coords::Vec2;
use lumen_engine::paint::Color;

use crate::entity::Visual;
use crate::event::{DrawEvent, PointerEvent};

/// Filled circle in local coordinates.
///
/// Passive: it never claims pointer events, but hit testing still follows the
/// circle so only presses inside it count as visits.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleVisual {
    center: Vec2,
    radius: f32,
    color: Color,
}

impl CircleVisual {
    pub fn new(center: Vec2, radius: f32, color: Color) -> Self {
        Self {
            center,
            radius: radius.abs(),
            color,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Whether `local` lies on the disc, edge included.
    pub fn contains(&self, local: Vec2) -> bool {
        let d = local - self.center;
        d.x * d.x + d.y * d.y <= self.radius * self.radius
    }
}

impl Visual for CircleVisual {
    fn draw(&self, event: &mut DrawEvent<'_>) -> Result<()> {
        event.fill_circle(self.center, self.radius, self.color);
        Ok(())
    }

    fn hit_test(&self, event: &PointerEvent<'_>) -> bool {
        event.local_position().is_some_and(|p| self.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use lumen_engine::coords::Viewport;
    use lumen_engine::input::{MouseButton, PointerInput};

    use super::*;
    use crate::event::CanvasInfo;

    #[test]
    fn contains_is_a_disc() {
        let c = CircleVisual::new(Vec2::new(1.0, 0.0), -0.5, Color::WHITE);
        assert_eq!(c.radius(), 0.5);
        assert!(c.contains(Vec2::new(1.0, 0.5)));
        assert!(c.contains(Vec2::new(0.7, 0.1)));
        assert!(!c.contains(Vec2::new(0.6, 0.4)));
        assert!(!c.contains(Vec2::ZERO));
    }

    #[test]
    fn hit_test_maps_pointer_into_local_space() {
        let info = CanvasInfo { size: Viewport::new(100.0, 100.0) };
        let c = CircleVisual::new(Vec2::ZERO, 0.2, Color::WHITE);

        let at = |x, y| {
            let input = PointerInput::press(Vec2::new(x, y), MouseButton::Left);
            c.hit_test(&PointerEvent::new(info, &input))
        };
        assert!(at(50.0, 50.0));
        assert!(at(50.0, 45.0));
        assert!(!at(50.0, 35.0));
    }
}
