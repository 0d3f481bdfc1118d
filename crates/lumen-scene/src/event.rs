use core::ops::{Deref, DerefMut};

use lumen_engine::coords::{Rect, Transform, Vec2, Viewport};
use lumen_engine::core::PaintTick;
use lumen_engine::draw::{Border, DrawList};
use lumen_engine::input::{PointerInput, PointerKind};
use lumen_engine::paint::Color;

// ── CanvasInfo ────────────────────────────────────────────────────────────

/// Read-only view of the canvas that created an event.
///
/// Events carry this snapshot instead of a reference to the canvas, so
/// entities can never reach back into the canvas while it is traversing them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CanvasInfo {
    /// Canvas size in logical pixels.
    pub size: Viewport,
}

impl CanvasInfo {
    /// Maps ND coordinates to canvas pixels for the size at event creation.
    #[inline]
    pub fn nd_transform(&self) -> Transform {
        Transform::nd_to_pixel(self.size)
    }
}

// ── TransformPath ─────────────────────────────────────────────────────────

/// Transforms accumulated while descending the scene tree.
///
/// Each entry maps the local space of one entity on the current path all the
/// way to canvas pixels. The base maps root-local (ND) space to pixels.
#[derive(Debug, Clone)]
pub struct TransformPath {
    base: Transform,
    stack: Vec<Transform>,
}

impl TransformPath {
    pub fn new(base: Transform) -> Self {
        Self { base, stack: Vec::new() }
    }

    /// Local-to-pixel transform of the innermost entity on the path.
    #[inline]
    pub fn current(&self) -> Transform {
        self.stack.last().copied().unwrap_or(self.base)
    }

    /// Enters an entity whose transform maps its local space into the
    /// current space.
    pub fn push(&mut self, local: Transform) {
        let full = local.then(self.current());
        self.stack.push(full);
    }

    pub fn pop(&mut self) -> Option<Transform> {
        self.stack.pop()
    }

    /// Number of entities currently on the path.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Events that carry a [`TransformPath`].
pub trait PathEvent {
    fn path(&self) -> &TransformPath;
    fn path_mut(&mut self) -> &mut TransformPath;

    /// Pushes `local` and returns a guard that pops it when dropped, including
    /// on early return and unwinding.
    fn push_transform(&mut self, local: Transform) -> PathScope<'_, Self> {
        self.path_mut().push(local);
        PathScope { event: self }
    }
}

/// Guard returned by [`PathEvent::push_transform`]. Derefs to the event.
pub struct PathScope<'e, E: PathEvent + ?Sized> {
    event: &'e mut E,
}

impl<E: PathEvent + ?Sized> Deref for PathScope<'_, E> {
    type Target = E;

    #[inline]
    fn deref(&self) -> &E {
        self.event
    }
}

impl<E: PathEvent + ?Sized> DerefMut for PathScope<'_, E> {
    #[inline]
    fn deref_mut(&mut self) -> &mut E {
        self.event
    }
}

impl<E: PathEvent + ?Sized> Drop for PathScope<'_, E> {
    fn drop(&mut self) {
        self.event.path_mut().pop();
    }
}

// ── DrawEvent ─────────────────────────────────────────────────────────────

/// Event handed down the tree for one paint tick.
///
/// Visuals record their content through the helpers here; geometry is given
/// in the visual's local space and mapped to pixels with the current path.
pub struct DrawEvent<'a> {
    canvas: CanvasInfo,
    source: &'a PaintTick,
    path: TransformPath,
    draw_list: &'a mut DrawList,
    entity_count: usize,
}

impl<'a> DrawEvent<'a> {
    pub fn new(canvas: CanvasInfo, source: &'a PaintTick, draw_list: &'a mut DrawList) -> Self {
        Self {
            canvas,
            source,
            path: TransformPath::new(canvas.nd_transform()),
            draw_list,
            entity_count: 0,
        }
    }

    #[inline]
    pub fn canvas(&self) -> &CanvasInfo {
        &self.canvas
    }

    /// The platform paint occurrence.
    #[inline]
    pub fn source(&self) -> &PaintTick {
        self.source
    }

    /// Local-to-pixel transform of the entity being drawn.
    #[inline]
    pub fn transform(&self) -> Transform {
        self.path.current()
    }

    /// Entities drawn so far in this traversal.
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    pub(crate) fn count_entity(&mut self) {
        self.entity_count += 1;
    }

    /// Raw access to the pixel-space draw stream.
    #[inline]
    pub fn draw_list(&mut self) -> &mut DrawList {
        self.draw_list
    }

    /// Records a filled rectangle given in local coordinates.
    pub fn fill_rect(&mut self, rect: Rect, color: Color, border: Option<Border>) {
        let pixel = self.transform().map_rect(rect);
        self.draw_list.push_rect(pixel, color, border);
    }

    /// Records a filled circle given in local coordinates. Non-uniform scale
    /// on the path turns it into an ellipse.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let t = self.transform();
        self.draw_list
            .push_circle(t.map(center), t.scale * radius, color);
    }
}

impl PathEvent for DrawEvent<'_> {
    fn path(&self) -> &TransformPath {
        &self.path
    }

    fn path_mut(&mut self) -> &mut TransformPath {
        &mut self.path
    }
}

// ── PointerEvent ──────────────────────────────────────────────────────────

/// Routing context for one pointer occurrence.
///
/// `handled` starts false and can only be set, never cleared. Once set, the
/// tree stops offering the event to further entities.
pub struct PointerEvent<'a> {
    canvas: CanvasInfo,
    source: &'a PointerInput,
    path: TransformPath,
    handled: bool,
    visited: usize,
}

impl<'a> PointerEvent<'a> {
    pub fn new(canvas: CanvasInfo, source: &'a PointerInput) -> Self {
        Self {
            canvas,
            source,
            path: TransformPath::new(canvas.nd_transform()),
            handled: false,
            visited: 0,
        }
    }

    #[inline]
    pub fn canvas(&self) -> &CanvasInfo {
        &self.canvas
    }

    /// The platform pointer occurrence.
    #[inline]
    pub fn source(&self) -> &PointerInput {
        self.source
    }

    #[inline]
    pub fn kind(&self) -> PointerKind {
        self.source.kind
    }

    /// Pointer position in canvas pixels.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.source.position
    }

    /// Local-to-pixel transform of the entity currently visited.
    #[inline]
    pub fn transform(&self) -> Transform {
        self.path.current()
    }

    /// Pointer position in the local space of the entity currently visited.
    ///
    /// `None` when a transform on the path is degenerate.
    pub fn local_position(&self) -> Option<Vec2> {
        self.path.current().imap(self.source.position)
    }

    #[inline]
    pub fn handled(&self) -> bool {
        self.handled
    }

    /// Claims the event for the current entity.
    #[inline]
    pub fn set_handled(&mut self) {
        self.handled = true;
    }

    /// Number of entities the event was offered to.
    #[inline]
    pub fn visited(&self) -> usize {
        self.visited
    }

    pub(crate) fn count_visit(&mut self) {
        self.visited += 1;
    }
}

impl PathEvent for PointerEvent<'_> {
    fn path(&self) -> &TransformPath {
        &self.path
    }

    fn path_mut(&mut self) -> &mut TransformPath {
        &mut self.path
    }
}
