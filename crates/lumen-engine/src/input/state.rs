use std::collections::HashSet;

use crate::coords::Vec2;

use super::types::{Modifiers, MouseButton, PointerInput, PointerKind};

/// Pointer state for a single window.
///
/// Platforms report button changes without a position, so the last known
/// pointer position is kept here and stamped onto every occurrence.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels; `None` while outside the window.
    pub pointer_pos: Option<Vec2>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            // Avoid stuck buttons when focus changes mid-press.
            self.buttons_down.clear();
        }
    }

    pub fn pointer_left(&mut self) {
        self.pointer_pos = None;
    }

    /// Records a pointer move and returns the matching occurrence.
    pub fn pointer_moved(&mut self, pos: Vec2) -> PointerInput {
        self.pointer_pos = Some(pos);
        PointerInput::moved(pos).with_modifiers(self.modifiers)
    }

    /// Records a button transition at the last known pointer position.
    ///
    /// Returns `None` for a release of a button that was never seen going
    /// down (e.g. pressed outside the window), and for repeated presses.
    pub fn button_changed(&mut self, button: MouseButton, pressed: bool) -> Option<PointerInput> {
        let kind = if pressed {
            if !self.buttons_down.insert(button) {
                return None;
            }
            PointerKind::Press
        } else {
            if !self.buttons_down.remove(&button) {
                return None;
            }
            PointerKind::Release
        };

        let pos = self.pointer_pos.unwrap_or(Vec2::ZERO);
        Some(PointerInput::new(kind, pos, Some(button)).with_modifiers(self.modifiers))
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_uses_last_pointer_position() {
        let mut state = InputState::default();
        state.pointer_moved(Vec2::new(12.0, 34.0));

        let press = state.button_changed(MouseButton::Left, true).unwrap();
        assert_eq!(press.kind, PointerKind::Press);
        assert_eq!(press.position, Vec2::new(12.0, 34.0));
        assert!(!press.handled);
        assert!(state.button_down(MouseButton::Left));
    }

    #[test]
    fn release_without_press_is_dropped() {
        let mut state = InputState::default();
        assert!(state.button_changed(MouseButton::Right, false).is_none());
    }

    #[test]
    fn repeated_press_is_dropped() {
        let mut state = InputState::default();
        assert!(state.button_changed(MouseButton::Left, true).is_some());
        assert!(state.button_changed(MouseButton::Left, true).is_none());
        let release = state.button_changed(MouseButton::Left, false).unwrap();
        assert_eq!(release.kind, PointerKind::Release);
    }

    #[test]
    fn focus_loss_clears_buttons() {
        let mut state = InputState::default();
        state.button_changed(MouseButton::Left, true);
        state.set_focused(false);
        assert!(!state.button_down(MouseButton::Left));
    }

    #[test]
    fn occurrences_carry_modifiers() {
        let mut state = InputState::default();
        state.set_modifiers(Modifiers { shift: true, ..Default::default() });
        let moved = state.pointer_moved(Vec2::new(1.0, 2.0));
        assert!(moved.modifiers.shift);
        assert!(moved.modifiers.any());
    }
}
