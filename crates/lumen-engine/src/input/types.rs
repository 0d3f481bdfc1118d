use crate::coords::Vec2;

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Modifier keys state.
///
/// Stored as booleans rather than bitflags to keep it explicit and stable.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Phase of a pointer occurrence.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PointerKind {
    Press,
    Move,
    Release,
}

/// A pointer occurrence as delivered by the platform.
///
/// `handled` is written back by whoever consumes the occurrence. The runtime
/// reads it afterwards to decide whether to apply its own default behavior.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerInput {
    pub kind: PointerKind,
    /// Position in logical pixels, origin top-left.
    pub position: Vec2,
    /// Button that changed state; `None` for moves.
    pub button: Option<MouseButton>,
    pub modifiers: Modifiers,
    pub handled: bool,
}

impl PointerInput {
    #[inline]
    pub fn new(kind: PointerKind, position: Vec2, button: Option<MouseButton>) -> Self {
        Self {
            kind,
            position,
            button,
            modifiers: Modifiers::default(),
            handled: false,
        }
    }

    #[inline]
    pub fn press(position: Vec2, button: MouseButton) -> Self {
        Self::new(PointerKind::Press, position, Some(button))
    }

    #[inline]
    pub fn moved(position: Vec2) -> Self {
        Self::new(PointerKind::Move, position, None)
    }

    #[inline]
    pub fn release(position: Vec2, button: MouseButton) -> Self {
        Self::new(PointerKind::Release, position, Some(button))
    }

    #[inline]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// `true` for a press of the primary (left) button.
    #[inline]
    pub fn is_primary_press(&self) -> bool {
        self.kind == PointerKind::Press && self.button == Some(MouseButton::Left)
    }
}
