use std::ops::{Deref, DerefMut};

use anyhow::Result;

use lumen_engine::coords::{Transform, Viewport};
use lumen_engine::core::PaintTick;
use lumen_engine::draw::DrawList;
use lumen_engine::input::PointerInput;
use lumen_engine::paint::Color;
use lumen_engine::render::{ClearPlanes, Graphics};

use crate::emitter::{SubscriptionId, UpdateEmitter};
use crate::entity::Entity;
use crate::event::{CanvasInfo, DrawEvent, PointerEvent};
use crate::repaint::RepaintSignal;

/// Initial canvas settings.
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    /// Size in logical pixels until the platform reports the real one.
    pub size: Viewport,
    pub clear_color: Color,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            size: Viewport::new(800.0, 600.0),
            clear_color: Color::BLACK,
        }
    }
}

/// Result of routing one pointer occurrence through the scene.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct PointerOutcome {
    pub handled: bool,
    /// Entities whose visual was offered the event.
    pub visited: usize,
}

/// Repaint connection on the root's channel. The channel handle is kept so
/// the connection can be cancelled even after the root was swapped out.
struct SceneSubscription {
    emitter: UpdateEmitter,
    id: SubscriptionId,
}

impl SceneSubscription {
    fn connect(scene: &Entity, repaint: &RepaintSignal) -> Self {
        let emitter = scene.update_emitter().clone();
        let repaint = repaint.clone();
        let id = emitter.connect(move || repaint.request());
        Self { emitter, id }
    }

    fn watches(&self, scene: &Entity) -> bool {
        self.emitter.same_channel(scene.update_emitter())
    }

    fn cancel(self) {
        if !self.emitter.disconnect(self.id) {
            log::trace!("scene subscription was already gone");
        }
    }
}

/// Drawing surface that hosts one scene tree.
///
/// The canvas translates platform occurrences into scene traversals:
/// - a paint tick clears the surface, then draws the scene
/// - a pointer occurrence is routed through the scene and the scene's verdict
///   is written back to the occurrence
/// - any change notified by the scene schedules one coalesced repaint
///
/// Root-local coordinates are normalized device coordinates: `(-1, -1)` is
/// the bottom-left corner of the canvas and `(1, 1)` the top-right one.
pub struct Canvas {
    size: Viewport,
    clear_color: Color,

    scene: Option<Entity>,
    subscription: Option<SceneSubscription>,
    repaint: RepaintSignal,

    draw_list: DrawList,
    entity_count: usize,
}

impl Canvas {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            size: config.size,
            clear_color: config.clear_color,
            scene: None,
            subscription: None,
            repaint: RepaintSignal::new(),
            draw_list: DrawList::new(),
            entity_count: 0,
        }
    }

    pub fn with_scene(mut self, scene: Entity) -> Self {
        self.set_scene(scene);
        self
    }

    // ── scene ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn scene(&self) -> Option<&Entity> {
        self.scene.as_ref()
    }

    /// Mutable access to the current root. Changes made through it notify as
    /// usual and schedule a repaint.
    ///
    /// The root may also be replaced in place; when the guard drops, the
    /// canvas moves its subscription to the new root.
    pub fn scene_mut(&mut self) -> Option<SceneMut<'_>> {
        let Canvas { scene, subscription, repaint, .. } = self;
        Some(SceneMut {
            scene: scene.as_mut()?,
            subscription,
            repaint,
        })
    }

    /// Replaces the root entity and returns the previous one.
    ///
    /// The previous root is unsubscribed before the new one is subscribed, so
    /// its later changes never schedule a repaint of this canvas. A repaint is
    /// scheduled for the new root.
    pub fn set_scene(&mut self, scene: Entity) -> Option<Entity> {
        let previous = self.take_scene();

        self.subscription = Some(SceneSubscription::connect(&scene, &self.repaint));
        log::debug!("canvas scene set to '{}' ({} entities)", scene.name(), scene.subtree_len());
        self.scene = Some(scene);

        self.repaint.request();
        previous
    }

    /// Detaches the current root, if any. The canvas then paints only its
    /// clear color.
    pub fn take_scene(&mut self) -> Option<Entity> {
        let previous = self.scene.take()?;
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
        self.repaint.request();
        Some(previous)
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[inline]
    pub fn size(&self) -> Viewport {
        self.size
    }

    /// Current ND-to-pixel mapping.
    #[inline]
    pub fn nd_transform(&self) -> Transform {
        Transform::nd_to_pixel(self.size)
    }

    #[inline]
    pub fn info(&self) -> CanvasInfo {
        CanvasInfo { size: self.size }
    }

    /// Applies a new canvas size.
    ///
    /// Only the ND-to-pixel mapping changes; entity transforms are left alone.
    pub fn on_resize(&mut self, size: Viewport) {
        if self.size == size {
            return;
        }
        log::debug!("canvas resized to {}x{}", size.width, size.height);
        self.size = size;
        self.repaint.request();
    }

    // ── appearance ────────────────────────────────────────────────────────

    #[inline]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) {
        if self.clear_color != color {
            self.clear_color = color;
            self.repaint.request();
        }
    }

    // ── platform occurrences ──────────────────────────────────────────────

    /// Paints one frame: clears color and depth, then draws the scene.
    ///
    /// The clear happens even without a scene. An error from a visual aborts
    /// the traversal and is returned; whatever was recorded up to that point
    /// stays in [`draw_list`](Self::draw_list).
    pub fn on_draw(&mut self, gfx: &mut dyn Graphics, tick: &PaintTick) -> Result<()> {
        self.repaint.take_pending();

        gfx.set_clear_color(self.clear_color);
        gfx.clear(ClearPlanes::COLOR | ClearPlanes::DEPTH);

        self.draw_list.clear();
        self.entity_count = 0;

        let info = self.info();
        let Some(scene) = self.scene.as_ref() else {
            log::trace!("canvas painted without a scene");
            return Ok(());
        };

        let mut event = DrawEvent::new(info, tick, &mut self.draw_list);
        let result = scene.draw(&mut event);
        self.entity_count = event.entity_count();

        log::debug!(
            "frame {}: {} entities, {} draw commands",
            tick.time.frame_index,
            self.entity_count,
            self.draw_list.len()
        );
        result
    }

    /// Routes a pointer occurrence through the scene.
    ///
    /// Without a scene nothing happens and `input.handled` is left untouched.
    /// Otherwise `input.handled` is overwritten with the scene's verdict, also
    /// when a handler fails partway.
    pub fn on_pointer(&mut self, input: &mut PointerInput) -> Result<PointerOutcome> {
        let info = self.info();
        let Some(scene) = self.scene.as_mut() else {
            return Ok(PointerOutcome::default());
        };

        let mut event = PointerEvent::new(info, input);
        let result = scene.process_pointer(&mut event);
        let outcome = PointerOutcome {
            handled: event.handled(),
            visited: event.visited(),
        };

        input.handled = outcome.handled;
        log::trace!("pointer {:?} at {:?}: {outcome:?}", input.kind, input.position);
        result.map(|()| outcome)
    }

    // ── repaint ───────────────────────────────────────────────────────────

    #[inline]
    pub fn repaint_signal(&self) -> &RepaintSignal {
        &self.repaint
    }

    /// Forwards scheduled repaints to the platform.
    pub fn set_repaint_hook(&self, hook: impl Fn() + 'static) {
        self.repaint.set_hook(hook);
    }

    #[inline]
    pub fn repaint_pending(&self) -> bool {
        self.repaint.is_pending()
    }

    // ── last frame ────────────────────────────────────────────────────────

    /// Entities drawn in the last paint.
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    /// Draw stream recorded in the last paint, in pixel space.
    #[inline]
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }
}

impl Drop for Canvas {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }
}

// ── SceneMut ──────────────────────────────────────────────────────────────

/// Mutable access to a canvas's root, from [`Canvas::scene_mut`].
pub struct SceneMut<'c> {
    scene: &'c mut Entity,
    subscription: &'c mut Option<SceneSubscription>,
    repaint: &'c RepaintSignal,
}

impl Deref for SceneMut<'_> {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &*self.scene
    }
}

impl DerefMut for SceneMut<'_> {
    fn deref_mut(&mut self) -> &mut Entity {
        &mut *self.scene
    }
}

impl Drop for SceneMut<'_> {
    fn drop(&mut self) {
        let scene: &Entity = &*self.scene;
        if self.subscription.as_ref().is_some_and(|s| s.watches(scene)) {
            return;
        }
        if let Some(stale) = self.subscription.take() {
            stale.cancel();
        }
        *self.subscription = Some(SceneSubscription::connect(scene, self.repaint));
        log::debug!("canvas root replaced by '{}' ({} entities)", scene.name(), scene.subtree_len());
        self.repaint.request();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use anyhow::anyhow;
    use lumen_engine::coords::{Rect, Vec2};
    use lumen_engine::draw::DrawCmd;
    use lumen_engine::input::MouseButton;
    use lumen_engine::render::{GraphicsCall, RecordingGraphics};
    use lumen_engine::time::FrameClock;

    use super::*;
    use crate::entity::Visual;
    use crate::visuals::RectVisual;

    fn canvas(w: f32, h: f32) -> Canvas {
        Canvas::new(CanvasConfig {
            size: Viewport::new(w, h),
            clear_color: Color::from_rgb_u8(10, 20, 30),
        })
    }

    fn tick() -> PaintTick {
        PaintTick {
            time: FrameClock::new().tick(),
            viewport: Viewport::new(800.0, 600.0),
        }
    }

    /// Full-canvas rect that claims primary presses.
    fn claimer(name: &str) -> Entity {
        Entity::new(name).with_visual(RectVisual::new(Rect::new(-1.0, -1.0, 2.0, 2.0), Color::WHITE).interactive())
    }

    struct Failing;

    impl Visual for Failing {
        fn draw(&self, _event: &mut DrawEvent<'_>) -> Result<()> {
            Err(anyhow!("visual failed"))
        }

        fn on_pointer(&mut self, event: &mut PointerEvent<'_>, _update: &UpdateEmitter) -> Result<()> {
            event.set_handled();
            Err(anyhow!("handler failed"))
        }
    }

    // ── draw ──────────────────────────────────────────────────────────────

    #[test]
    fn draw_clears_color_and_depth_once() {
        let mut canvas = canvas(800.0, 600.0).with_scene(Entity::scene().with_child(claimer("a")));
        let mut gfx = RecordingGraphics::new();

        canvas.on_draw(&mut gfx, &tick()).unwrap();

        assert_eq!(gfx.clear_count(), 1);
        assert_eq!(
            gfx.calls().last(),
            Some(&GraphicsCall::Clear {
                planes: ClearPlanes::ALL,
                color: Color::from_rgb_u8(10, 20, 30),
            })
        );
        assert_eq!(canvas.entity_count(), 2);
        assert_eq!(canvas.draw_list().len(), 1);
    }

    #[test]
    fn draw_without_scene_still_clears() {
        let mut canvas = canvas(800.0, 600.0);
        let mut gfx = RecordingGraphics::new();

        canvas.on_draw(&mut gfx, &tick()).unwrap();

        assert_eq!(gfx.clear_count(), 1);
        assert_eq!(canvas.entity_count(), 0);
        assert!(canvas.draw_list().is_empty());
    }

    #[test]
    fn draw_error_propagates_after_clear() {
        let mut canvas = canvas(800.0, 600.0).with_scene(Entity::scene().with_child(Entity::new("bad").with_visual(Failing)));
        let mut gfx = RecordingGraphics::new();

        let err = canvas.on_draw(&mut gfx, &tick()).unwrap_err();
        assert!(err.to_string().contains("visual failed"));
        assert_eq!(gfx.clear_count(), 1);
    }

    #[test]
    fn draw_maps_root_space_to_pixels() {
        let scene = Entity::scene().with_child(
            Entity::new("quad").with_visual(RectVisual::new(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE)),
        );
        let mut canvas = canvas(800.0, 600.0).with_scene(scene);
        canvas.on_draw(&mut RecordingGraphics::new(), &tick()).unwrap();

        // ND top-right quadrant
        let DrawCmd::Rect(cmd) = &canvas.draw_list().cmds()[0] else {
            panic!("expected rect");
        };
        assert_eq!(cmd.rect, Rect::new(400.0, 0.0, 400.0, 300.0));
    }

    // ── pointer ───────────────────────────────────────────────────────────

    #[test]
    fn press_at_center_is_claimed_by_one_entity() {
        let mut canvas = canvas(800.0, 600.0).with_scene(Entity::scene().with_child(claimer("a")));
        let mut input = PointerInput::press(Vec2::new(400.0, 300.0), MouseButton::Left);

        let outcome = canvas.on_pointer(&mut input).unwrap();

        assert!(input.handled);
        assert_eq!(outcome, PointerOutcome { handled: true, visited: 1 });
    }

    #[test]
    fn first_claim_wins() {
        let mut canvas = canvas(800.0, 600.0)
            .with_scene(Entity::scene().with_child(claimer("a")).with_child(claimer("b")));
        let mut input = PointerInput::press(Vec2::new(10.0, 10.0), MouseButton::Left);

        let outcome = canvas.on_pointer(&mut input).unwrap();

        assert!(outcome.handled);
        assert_eq!(outcome.visited, 1);
    }

    #[test]
    fn full_canvas_rect_covers_top_row_not_bottom_edge() {
        let mut canvas = canvas(800.0, 600.0).with_scene(Entity::scene().with_child(claimer("a")));

        let mut top = PointerInput::press(Vec2::new(400.0, 0.0), MouseButton::Left);
        assert_eq!(canvas.on_pointer(&mut top).unwrap(), PointerOutcome { handled: true, visited: 1 });

        let mut left = PointerInput::press(Vec2::new(0.0, 300.0), MouseButton::Left);
        assert!(canvas.on_pointer(&mut left).unwrap().handled);

        // max edges are half-open in pixels
        let mut bottom = PointerInput::press(Vec2::new(400.0, 600.0), MouseButton::Left);
        assert_eq!(canvas.on_pointer(&mut bottom).unwrap(), PointerOutcome::default());
        assert!(!bottom.handled);

        let mut right = PointerInput::press(Vec2::new(800.0, 300.0), MouseButton::Left);
        assert!(!canvas.on_pointer(&mut right).unwrap().handled);
    }

    #[test]
    fn unclaimed_pointer_leaves_handled_false() {
        let passive = Entity::new("p").with_visual(RectVisual::new(Rect::new(-1.0, -1.0, 2.0, 2.0), Color::WHITE));
        let mut canvas = canvas(800.0, 600.0).with_scene(Entity::scene().with_child(passive));
        let mut input = PointerInput::press(Vec2::new(400.0, 300.0), MouseButton::Left);

        let outcome = canvas.on_pointer(&mut input).unwrap();

        assert!(!input.handled);
        assert_eq!(outcome.visited, 1);
    }

    #[test]
    fn pointer_without_scene_is_ignored() {
        let mut canvas = canvas(800.0, 600.0);
        let mut input = PointerInput::press(Vec2::new(400.0, 300.0), MouseButton::Left);
        input.handled = true;

        let outcome = canvas.on_pointer(&mut input).unwrap();

        assert!(input.handled);
        assert_eq!(outcome, PointerOutcome::default());
    }

    #[test]
    fn handler_error_still_relays_claim() {
        let mut canvas = canvas(800.0, 600.0).with_scene(Entity::scene().with_child(Entity::new("bad").with_visual(Failing)));
        let mut input = PointerInput::press(Vec2::new(400.0, 300.0), MouseButton::Left);

        assert!(canvas.on_pointer(&mut input).is_err());
        assert!(input.handled);
    }

    // ── repaint ───────────────────────────────────────────────────────────

    #[test]
    fn scene_changes_schedule_one_repaint() {
        let mut canvas = canvas(800.0, 600.0).with_scene(Entity::scene().with_child(Entity::new("a")));
        let hooks = Rc::new(Cell::new(0));
        let h = hooks.clone();
        canvas.set_repaint_hook(move || h.set(h.get() + 1));
        // set_scene left a repaint pending; installing the hook forwards it
        assert_eq!(hooks.get(), 1);
        canvas.on_draw(&mut RecordingGraphics::new(), &tick()).unwrap();
        assert!(!canvas.repaint_pending());

        {
            let mut scene = canvas.scene_mut().unwrap();
            scene.child_mut(0).unwrap().set_transform(Transform::from_scale(0.5, 0.5));
            scene.child_mut(0).unwrap().set_visible(false);
            scene.request_update();
        }

        assert!(canvas.repaint_pending());
        assert_eq!(hooks.get(), 2);
    }

    #[test]
    fn replaced_scene_no_longer_schedules() {
        let mut canvas = canvas(800.0, 600.0).with_scene(Entity::new("first"));
        let old = canvas.set_scene(Entity::new("second")).unwrap();
        canvas.on_draw(&mut RecordingGraphics::new(), &tick()).unwrap();
        let scheduled = canvas.repaint_signal().scheduled();

        assert_eq!(old.update_emitter().subscriber_count(), 0);
        assert_eq!(canvas.scene().unwrap().update_emitter().subscriber_count(), 1);
        old.request_update();
        assert!(!canvas.repaint_pending());
        assert_eq!(canvas.repaint_signal().scheduled(), scheduled);

        canvas.scene().unwrap().request_update();
        assert!(canvas.repaint_pending());
    }

    #[test]
    fn root_replaced_in_place_moves_the_subscription() {
        let mut canvas = canvas(800.0, 600.0).with_scene(Entity::new("first"));
        let old = std::mem::replace(&mut *canvas.scene_mut().unwrap(), Entity::new("second"));

        assert_eq!(canvas.scene().map(Entity::name), Some("second"));
        assert_eq!(old.update_emitter().subscriber_count(), 0);
        assert_eq!(canvas.scene().unwrap().update_emitter().subscriber_count(), 1);
        assert!(canvas.repaint_pending());

        canvas.on_draw(&mut RecordingGraphics::new(), &tick()).unwrap();
        old.request_update();
        assert!(!canvas.repaint_pending());

        canvas.scene().unwrap().request_update();
        assert!(canvas.repaint_pending());

        // the replaced root is what take_scene unsubscribes
        let taken = canvas.take_scene().unwrap();
        assert_eq!(taken.update_emitter().subscriber_count(), 0);
    }

    #[test]
    fn root_edits_keep_the_subscription() {
        let mut canvas = canvas(800.0, 600.0).with_scene(Entity::scene());
        let emitter = canvas.scene().unwrap().update_emitter().clone();
        canvas.on_draw(&mut RecordingGraphics::new(), &tick()).unwrap();
        let scheduled = canvas.repaint_signal().scheduled();

        canvas.scene_mut().unwrap().set_visible(true);

        assert_eq!(emitter.subscriber_count(), 1);
        assert!(!canvas.repaint_pending());
        assert_eq!(canvas.repaint_signal().scheduled(), scheduled);
    }

    #[test]
    fn resize_changes_mapping_not_entities() {
        let child = Transform::from_translate(0.25, 0.0);
        let mut canvas = canvas(800.0, 600.0).with_scene(Entity::scene().with_child(Entity::new("a").with_transform(child)));
        canvas.on_draw(&mut RecordingGraphics::new(), &tick()).unwrap();

        canvas.on_resize(Viewport::new(400.0, 200.0));

        assert!(canvas.repaint_pending());
        assert_eq!(canvas.nd_transform(), Transform::nd_to_pixel(Viewport::new(400.0, 200.0)));
        assert_eq!(canvas.scene().unwrap().child(0).unwrap().transform(), child);

        // new size: center press still maps to ND origin
        let mut canvas = canvas;
        canvas.scene_mut().unwrap().add_child(claimer("hit"));
        let mut input = PointerInput::press(Vec2::new(200.0, 100.0), MouseButton::Left);
        assert!(canvas.on_pointer(&mut input).unwrap().handled);
    }

    #[test]
    fn same_size_resize_is_ignored() {
        let mut canvas = canvas(800.0, 600.0);
        canvas.on_draw(&mut RecordingGraphics::new(), &tick()).unwrap();
        canvas.on_resize(Viewport::new(800.0, 600.0));
        assert!(!canvas.repaint_pending());
    }

    #[test]
    fn dropping_canvas_unsubscribes_scene() {
        let scene = Entity::scene();
        let emitter = scene.update_emitter().clone();
        let canvas = canvas(800.0, 600.0).with_scene(scene);
        assert_eq!(emitter.subscriber_count(), 1);

        drop(canvas);
        assert_eq!(emitter.subscriber_count(), 0);
    }
}
