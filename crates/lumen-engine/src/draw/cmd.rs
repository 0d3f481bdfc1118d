use super::shapes::circle::CircleCmd;
use super::shapes::rect::RectCmd;

/// Renderer-agnostic draw command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect(RectCmd),
    Circle(CircleCmd),
}

impl DrawCmd {
    /// Short label used in trace logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DrawCmd::Rect(_) => "rect",
            DrawCmd::Circle(_) => "circle",
        }
    }
}
