use anyhow::Result;

use lumen_engine::coords::Rect;
use lumen_engine::draw::Border;
use lumen_engine::input::PointerInput;
use lumen_engine::paint::Color;

use crate::emitter::UpdateEmitter;
use crate::entity::Visual;
use crate::event::{DrawEvent, PointerEvent};

/// Axis-aligned filled rectangle.
///
/// Passive by default. Registering a press callback or a toggle color makes
/// it claim primary presses that land inside it.
///
/// ```rust,ignore
/// RectVisual::new(Rect::new(-0.5, -0.5, 1.0, 1.0), Color::WHITE)
///     .border(Border::new(2.0, Color::BLACK))
///     .toggle_color(Color::from_rgb_u8(0xe0, 0x40, 0x40))
///     .on_press(|p| log::info!("pressed at {:?}", p.position))
/// ```
pub struct RectVisual {
    rect: Rect,
    color: Color,
    border: Option<Border>,
    alternate: Option<Color>,
    on_press: Option<Box<dyn FnMut(&PointerInput)>>,
    interactive: bool,
}

impl RectVisual {
    /// `rect` is in local coordinates; flipped extents are accepted.
    pub fn new(rect: Rect, color: Color) -> Self {
        Self {
            rect: rect.normalized(),
            color,
            border: None,
            alternate: None,
            on_press: None,
            interactive: false,
        }
    }

    pub fn border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    /// Swaps between the fill color and `color` on every claimed press.
    pub fn toggle_color(mut self, color: Color) -> Self {
        self.alternate = Some(color);
        self.interactive = true;
        self
    }

    /// Callback invoked for every claimed press.
    pub fn on_press(mut self, f: impl FnMut(&PointerInput) + 'static) -> Self {
        self.on_press = Some(Box::new(f));
        self.interactive = true;
        self
    }

    /// Claims presses without any other reaction.
    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }
}

impl Visual for RectVisual {
    fn draw(&self, event: &mut DrawEvent<'_>) -> Result<()> {
        event.fill_rect(self.rect, self.color, self.border.clone());
        Ok(())
    }

    /// Tested in pixels: the drawn rect is half-open there, not in local
    /// space where the canvas flips Y.
    fn hit_test(&self, event: &PointerEvent<'_>) -> bool {
        event
            .transform()
            .map_rect(self.rect)
            .normalized()
            .contains(event.position())
    }

    fn on_pointer(&mut self, event: &mut PointerEvent<'_>, update: &UpdateEmitter) -> Result<()> {
        if !self.interactive || !event.source().is_primary_press() {
            return Ok(());
        }
        event.set_handled();

        if let Some(f) = self.on_press.as_mut() {
            f(event.source());
        }
        if let Some(alt) = self.alternate.as_mut() {
            std::mem::swap(&mut self.color, alt);
            update.notify();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use lumen_engine::coords::{Vec2, Viewport};
    use lumen_engine::input::MouseButton;

    use super::*;
    use crate::event::CanvasInfo;

    fn info() -> CanvasInfo {
        CanvasInfo { size: Viewport::new(100.0, 100.0) }
    }

    fn unit() -> RectVisual {
        RectVisual::new(Rect::new(-1.0, -1.0, 2.0, 2.0), Color::WHITE)
    }

    #[test]
    fn passive_rect_never_claims() {
        let mut visual = unit();
        let input = PointerInput::press(Vec2::new(50.0, 50.0), MouseButton::Left);
        let mut event = PointerEvent::new(info(), &input);
        visual.on_pointer(&mut event, &UpdateEmitter::new()).unwrap();
        assert!(!event.handled());
    }

    #[test]
    fn press_callback_claims_primary_press() {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let mut visual = unit().on_press(move |_| h.set(h.get() + 1));
        let update = UpdateEmitter::new();

        let input = PointerInput::press(Vec2::new(50.0, 50.0), MouseButton::Left);
        let mut event = PointerEvent::new(info(), &input);
        visual.on_pointer(&mut event, &update).unwrap();
        assert!(event.handled());
        assert_eq!(hits.get(), 1);

        let input = PointerInput::press(Vec2::new(50.0, 50.0), MouseButton::Right);
        let mut event = PointerEvent::new(info(), &input);
        visual.on_pointer(&mut event, &update).unwrap();
        assert!(!event.handled());

        let input = PointerInput::moved(Vec2::new(50.0, 50.0));
        let mut event = PointerEvent::new(info(), &input);
        visual.on_pointer(&mut event, &update).unwrap();
        assert!(!event.handled());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn toggle_swaps_color_and_notifies() {
        let red = Color::from_rgb_u8(255, 0, 0);
        let mut visual = unit().toggle_color(red);
        let update = UpdateEmitter::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        update.connect(move || h.set(h.get() + 1));

        let input = PointerInput::press(Vec2::new(50.0, 50.0), MouseButton::Left);
        for expected in [red, Color::WHITE] {
            let mut event = PointerEvent::new(info(), &input);
            visual.on_pointer(&mut event, &update).unwrap();
            assert_eq!(visual.color(), expected);
        }
        assert_eq!(hits.get(), 2);
    }

    fn hits(visual: &RectVisual, x: f32, y: f32) -> bool {
        let input = PointerInput::press(Vec2::new(x, y), MouseButton::Left);
        visual.hit_test(&PointerEvent::new(info(), &input))
    }

    #[test]
    fn hit_test_uses_normalized_rect() {
        // local (0,0)-(1,1) is the top-right pixel quadrant (50..100, 0..50)
        let visual = RectVisual::new(Rect::new(1.0, 1.0, -1.0, -1.0), Color::WHITE);
        assert!(hits(&visual, 75.0, 25.0));
        assert!(!hits(&visual, 25.0, 25.0));
        assert!(!hits(&visual, 75.0, 75.0));
    }

    #[test]
    fn hit_test_edges_match_drawn_pixels() {
        let visual = unit();
        assert!(hits(&visual, 0.0, 0.0));
        assert!(hits(&visual, 50.0, 0.0));
        assert!(hits(&visual, 99.5, 99.5));
        assert!(!hits(&visual, 50.0, 100.0));
        assert!(!hits(&visual, 100.0, 50.0));
    }
}
