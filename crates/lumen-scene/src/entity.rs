use std::ops::{Deref, DerefMut};

use anyhow::Result;

use lumen_engine::coords::Transform;

use crate::emitter::{SubscriptionId, UpdateEmitter};
use crate::event::{DrawEvent, PathEvent, PointerEvent};

// ── Visual trait ──────────────────────────────────────────────────────────

/// Renderable and interactive content attached to an [`Entity`].
///
/// Geometry is expressed in the owning entity's local space; the events map
/// it to canvas pixels.
///
/// ```rust,ignore
/// struct Dot;
///
/// impl Visual for Dot {
///     fn draw(&self, event: &mut DrawEvent<'_>) -> Result<()> {
///         event.fill_circle(Vec2::ZERO, 0.1, Color::WHITE);
///         Ok(())
///     }
/// }
/// ```
pub trait Visual: 'static {
    fn draw(&self, event: &mut DrawEvent<'_>) -> Result<()>;

    /// Whether the pointer lies on this visual. Visuals that return `false`
    /// are not offered the event.
    ///
    /// [`PointerEvent::transform`] maps local geometry to pixels, where edge
    /// tests agree with what was drawn; [`PointerEvent::local_position`] is
    /// the inverse view.
    fn hit_test(&self, event: &PointerEvent<'_>) -> bool {
        let _ = event;
        true
    }

    /// Handles a pointer event that hit this visual.
    ///
    /// Call [`PointerEvent::set_handled`] to claim it. `update` is the owning
    /// entity's channel; notify it after changing anything that affects
    /// drawing.
    fn on_pointer(&mut self, event: &mut PointerEvent<'_>, update: &UpdateEmitter) -> Result<()> {
        let _ = (event, update);
        Ok(())
    }
}

// ── Entity ────────────────────────────────────────────────────────────────

struct Child {
    entity: Entity,
    /// Channel `forward` was connected on. Differs from `entity.update` once
    /// the entity was swapped out through an [`EntityMut`].
    source: UpdateEmitter,
    forward: SubscriptionId,
}

/// Node of the scene tree.
///
/// Every entity owns an [`UpdateEmitter`]. A child's notifications are
/// forwarded to its parent, so subscribing to the root observes changes
/// anywhere in the tree.
pub struct Entity {
    name: String,
    transform: Transform,
    visible: bool,
    visual: Option<Box<dyn Visual>>,
    children: Vec<Child>,
    update: UpdateEmitter,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            visible: true,
            visual: None,
            children: Vec::new(),
            update: UpdateEmitter::new(),
        }
    }

    /// Empty root entity.
    pub fn scene() -> Self {
        Self::new("scene")
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_visual(mut self, visual: impl Visual) -> Self {
        self.visual = Some(Box::new(visual));
        self
    }

    pub fn with_child(mut self, child: Entity) -> Self {
        self.add_child(child);
        self
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maps this entity's local space into its parent's local space.
    #[inline]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn update_emitter(&self) -> &UpdateEmitter {
        &self.update
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, index: usize) -> Option<&Entity> {
        self.children.get(index).map(|c| &c.entity)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<EntityMut<'_>> {
        if index >= self.children.len() {
            return None;
        }
        Some(EntityMut(Slot::Child { parent: self, index }))
    }

    pub fn children(&self) -> impl Iterator<Item = &Entity> {
        self.children.iter().map(|c| &c.entity)
    }

    /// Depth-first search for an entity by name, starting with `self`.
    pub fn find(&self, name: &str) -> Option<&Entity> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.entity.find(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<EntityMut<'_>> {
        if self.name == name {
            return Some(EntityMut(Slot::Own(self)));
        }
        let mut path = Vec::new();
        if !self.find_path(name, &mut path) {
            return None;
        }
        let index = path.pop()?;
        let mut parent = self;
        for i in path {
            parent = &mut parent.children[i].entity;
        }
        Some(EntityMut(Slot::Child { parent, index }))
    }

    /// Child indices leading to the first descendant named `name`, in the
    /// same order [`find`](Self::find) searches.
    fn find_path(&self, name: &str, path: &mut Vec<usize>) -> bool {
        for (i, child) in self.children.iter().enumerate() {
            path.push(i);
            if child.entity.name == name || child.entity.find_path(name, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    /// Number of entities in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(|c| c.entity.subtree_len()).sum::<usize>()
    }

    // ── mutation ──────────────────────────────────────────────────────────

    /// Appends a child and returns its index.
    pub fn add_child(&mut self, child: Entity) -> usize {
        let parent = self.update.downgrade();
        let forward = child.update.connect(move || parent.notify());
        let source = child.update.clone();
        self.children.push(Child { entity: child, source, forward });
        self.update.notify();
        self.children.len() - 1
    }

    /// Detaches and returns the child at `index`. Its notifications no longer
    /// reach this entity.
    pub fn remove_child(&mut self, index: usize) -> Option<Entity> {
        if index >= self.children.len() {
            return None;
        }
        let child = self.children.remove(index);
        child.source.disconnect(child.forward);
        self.update.notify();
        Some(child.entity)
    }

    pub fn set_transform(&mut self, transform: Transform) {
        if self.transform != transform {
            self.transform = transform;
            self.update.notify();
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.update.notify();
        }
    }

    pub fn set_visual(&mut self, visual: impl Visual) {
        self.visual = Some(Box::new(visual));
        self.update.notify();
    }

    /// Signals a change that the entity cannot observe itself.
    pub fn request_update(&self) {
        self.update.notify();
    }

    /// Moves the forward of child `index` onto its current channel when the
    /// entity in that slot was replaced, then notifies.
    fn relink_child(&mut self, index: usize) {
        let parent = self.update.downgrade();
        let Some(child) = self.children.get_mut(index) else {
            return;
        };
        if child.source.same_channel(&child.entity.update) {
            return;
        }
        child.source.disconnect(child.forward);
        child.forward = child.entity.update.connect(move || parent.notify());
        child.source = child.entity.update.clone();
        log::trace!("child {index} of '{}' replaced by '{}'", self.name, child.entity.name);
        self.update.notify();
    }

    // ── traversal ─────────────────────────────────────────────────────────

    /// Draws this subtree: own visual first, then children in insertion
    /// order. Hidden entities skip their whole subtree.
    pub fn draw(&self, event: &mut DrawEvent<'_>) -> Result<()> {
        if !self.visible {
            return Ok(());
        }

        let mut event = event.push_transform(self.transform);
        event.count_entity();

        if let Some(visual) = &self.visual {
            visual.draw(&mut event)?;
        }
        for child in &self.children {
            child.entity.draw(&mut event)?;
        }
        Ok(())
    }

    /// Routes a pointer event through this subtree.
    ///
    /// Children are offered the event first, in insertion order, then this
    /// entity's visual. Routing stops as soon as the event is handled.
    pub fn process_pointer(&mut self, event: &mut PointerEvent<'_>) -> Result<()> {
        if !self.visible || event.handled() {
            return Ok(());
        }

        let mut event = event.push_transform(self.transform);

        for child in &mut self.children {
            child.entity.process_pointer(&mut event)?;
            if event.handled() {
                return Ok(());
            }
        }

        let Some(visual) = self.visual.as_mut() else {
            return Ok(());
        };
        if visual.hit_test(&event) {
            event.count_visit();
            log::trace!("pointer {:?} offered to '{}'", event.kind(), self.name);
            visual.on_pointer(&mut event, &self.update)?;
        }
        Ok(())
    }
}

impl Drop for Entity {
    fn drop(&mut self) {
        for child in &self.children {
            child.source.disconnect(child.forward);
        }
    }
}

// ── EntityMut ─────────────────────────────────────────────────────────────

enum Slot<'a> {
    Child { parent: &'a mut Entity, index: usize },
    Own(&'a mut Entity),
}

/// Mutable access to an entity inside a tree, from [`Entity::child_mut`] or
/// [`Entity::find_mut`].
///
/// The entity may be replaced wholesale (`std::mem::replace`, `*guard = ..`);
/// on drop its parent forwards the new entity's notifications instead of the
/// old one's.
pub struct EntityMut<'a>(Slot<'a>);

impl Deref for EntityMut<'_> {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        match &self.0 {
            Slot::Child { parent, index } => &parent.children[*index].entity,
            Slot::Own(entity) => entity,
        }
    }
}

impl DerefMut for EntityMut<'_> {
    fn deref_mut(&mut self) -> &mut Entity {
        match &mut self.0 {
            Slot::Child { parent, index } => &mut parent.children[*index].entity,
            Slot::Own(entity) => entity,
        }
    }
}

impl Drop for EntityMut<'_> {
    fn drop(&mut self) {
        if let Slot::Child { parent, index } = &mut self.0 {
            parent.relink_child(*index);
        }
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("transform", &self.transform)
            .field("visible", &self.visible)
            .field("has_visual", &self.visual.is_some())
            .field("children", &self.children.len())
            .finish()
    }
}
