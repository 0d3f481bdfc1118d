use anyhow::Result;
use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::InputState;
use crate::render::Graphics;
use crate::time::FrameTime;

use super::app::AppControl;

/// Platform paint occurrence: one per redraw.
#[derive(Debug, Copy, Clone)]
pub struct PaintTick {
    pub time: FrameTime,
    /// Logical window size at the time of the paint.
    pub viewport: Viewport,
}

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id:     WindowId,
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// Returns the window size in logical pixels.
    pub fn logical_size(&self) -> Viewport {
        logical_viewport(self.window)
    }
}

pub(crate) fn logical_viewport(window: &Window) -> Viewport {
    let logical: winit::dpi::LogicalSize<f64> = window.inner_size().to_logical(window.scale_factor());
    Viewport::new(logical.width as f32, logical.height as f32)
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu:    &'a mut Gpu<'w>,
    pub input:  &'a InputState,
    pub tick:   PaintTick,
}

impl FrameCtx<'_, '_> {
    /// Acquires a frame, hands its graphics binding to `draw`, then presents.
    ///
    /// If `draw` fails the frame is discarded and the error is returned
    /// unchanged. Surface errors are handled here: lost/outdated surfaces are
    /// reconfigured and the frame skipped; out-of-memory asks the runtime to exit.
    pub fn render<F>(&mut self, draw: F) -> Result<AppControl>
    where
        F: FnOnce(&mut dyn Graphics) -> Result<()>,
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return Ok(match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        self.window.window.request_redraw();
                        AppControl::Continue
                    }
                });
            }
        };

        // The binding borrows the encoder; it must be gone before submit() takes the frame.
        {
            let mut gfx = self.gpu.graphics(&mut frame);
            draw(&mut gfx)?;
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        Ok(AppControl::Continue)
    }
}
