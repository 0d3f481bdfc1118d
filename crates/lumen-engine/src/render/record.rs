use crate::paint::Color;

use super::{ClearPlanes, Graphics};

/// A call observed by [`RecordingGraphics`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GraphicsCall {
    SetClearColor(Color),
    Clear { planes: ClearPlanes, color: Color },
}

/// Headless graphics binding that records calls instead of issuing them.
#[derive(Debug, Default)]
pub struct RecordingGraphics {
    clear_color: Color,
    calls: Vec<GraphicsCall>,
}

impl RecordingGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[GraphicsCall] {
        &self.calls
    }

    /// Number of `clear` calls recorded so far.
    pub fn clear_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, GraphicsCall::Clear { .. }))
            .count()
    }
}

impl Graphics for RecordingGraphics {
    fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
        self.calls.push(GraphicsCall::SetClearColor(color));
    }

    fn clear(&mut self, planes: ClearPlanes) {
        self.calls.push(GraphicsCall::Clear { planes, color: self.clear_color });
    }
}
