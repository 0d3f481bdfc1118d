use anyhow::Result;

use crate::coords::Viewport;
use crate::input::PointerInput;
use crate::window::RedrawHandle;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// All callbacks run on the event-loop thread, one at a time. Errors returned
/// here reach the runtime's error boundary (see `RuntimeConfig::exit_on_error`).
pub trait App {
    /// Called once the window and GPU exist, before the first paint.
    ///
    /// `redraw` is the only way to schedule a paint from outside a callback;
    /// the runtime does not redraw continuously.
    fn on_start(&mut self, redraw: RedrawHandle, viewport: Viewport) {
        let _ = (redraw, viewport);
    }

    /// Called when the logical window size changes. A paint follows.
    fn on_resize(&mut self, viewport: Viewport) {
        let _ = viewport;
    }

    /// Called for every pointer press, move, and release.
    ///
    /// Set `input.handled` to suppress the runtime's default behavior.
    fn on_pointer(&mut self, input: &mut PointerInput) -> Result<AppControl> {
        let _ = input;
        Ok(AppControl::Continue)
    }

    /// Called once per paint tick.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl>;
}
