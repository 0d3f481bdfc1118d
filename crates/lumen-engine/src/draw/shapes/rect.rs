use crate::coords::Rect;
use crate::draw::{DrawCmd, DrawList};
use crate::paint::Color;

use super::Border;

/// Filled rectangle in pixel space, always normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub color: Color,
    pub border: Option<Border>,
}

impl DrawList {
    /// Records a filled rectangle. Flipped extents are normalized first.
    #[inline]
    pub fn push_rect(&mut self, rect: Rect, color: Color, border: Option<Border>) {
        self.push(DrawCmd::Rect(RectCmd {
            rect: rect.normalized(),
            color,
            border,
        }));
    }
}
