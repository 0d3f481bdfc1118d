use anyhow::Result;
use winit::dpi::LogicalSize;

use lumen_engine::coords::Viewport;
use lumen_engine::core::{App as EngineApp, AppControl, FrameCtx};
use lumen_engine::device::GpuInit;
use lumen_engine::input::PointerInput;
use lumen_engine::paint::Color;
use lumen_engine::window::{RedrawHandle, Runtime, RuntimeConfig};

use crate::canvas::{Canvas, CanvasConfig};
use crate::entity::Entity;

// ── Application ───────────────────────────────────────────────────────────

/// Builder that opens a window and hosts one scene on a [`Canvas`].
///
/// ```rust,ignore
/// Application::new()
///     .title("Lumen Studio")
///     .size(1024.0, 768.0)
///     .clear_color(Color::from_rgb_u8(0x20, 0x24, 0x2c))
///     .run(scene)?;
/// ```
pub struct Application {
    title:          String,
    width:          f64,
    height:         f64,
    clear_color:    Color,
    exit_on_error:  bool,
    drag_window:    bool,
    gpu:            GpuInit,
}

impl Application {
    pub fn new() -> Self {
        Self {
            title:          "lumen".to_string(),
            width:          800.0,
            height:         600.0,
            clear_color:    Color::BLACK,
            exit_on_error:  false,
            drag_window:    false,
            gpu:            GpuInit::default(),
        }
    }

    /// Set the window title.
    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width  = width;
        self.height = height;
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Stop on the first scene error instead of logging it and continuing.
    pub fn exit_on_error(mut self, exit: bool) -> Self {
        self.exit_on_error = exit;
        self
    }

    /// Let primary presses that no entity claims drag the window.
    pub fn drag_window_on_unhandled_press(mut self, enabled: bool) -> Self {
        self.drag_window = enabled;
        self
    }

    pub fn gpu(mut self, init: GpuInit) -> Self {
        self.gpu = init;
        self
    }

    /// Builds the canvas for `scene` without opening a window.
    pub fn build_canvas(&self, scene: Entity) -> Canvas {
        Canvas::new(CanvasConfig {
            size: Viewport::new(self.width as f32, self.height as f32),
            clear_color: self.clear_color,
        })
        .with_scene(scene)
    }

    // ── Entry point ───────────────────────────────────────────────────────

    /// Runs the event loop until the window closes.
    pub fn run(self, scene: Entity) -> Result<()> {
        let canvas = self.build_canvas(scene);
        let config = RuntimeConfig {
            title:                          self.title,
            initial_size:                   LogicalSize::new(self.width, self.height),
            exit_on_error:                  self.exit_on_error,
            drag_window_on_unhandled_press: self.drag_window,
        };
        log::info!("starting '{}' at {}x{}", config.title, self.width, self.height);
        Runtime::run(config, self.gpu, CanvasApp { canvas })
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

// ── CanvasApp ─────────────────────────────────────────────────────────────

/// Adapts a [`Canvas`] to the engine's application contract.
struct CanvasApp {
    canvas: Canvas,
}

impl EngineApp for CanvasApp {
    fn on_start(&mut self, redraw: RedrawHandle, viewport: Viewport) {
        self.canvas.set_repaint_hook(move || redraw.request());
        self.canvas.on_resize(viewport);
    }

    fn on_resize(&mut self, viewport: Viewport) {
        self.canvas.on_resize(viewport);
    }

    fn on_pointer(&mut self, input: &mut PointerInput) -> Result<AppControl> {
        self.canvas.on_pointer(input)?;
        Ok(AppControl::Continue)
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let tick = ctx.tick;
        let canvas = &mut self.canvas;
        ctx.render(|gfx| canvas.on_draw(gfx, &tick))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let app = Application::new();
        assert_eq!(app.title, "lumen");
        assert_eq!((app.width, app.height), (800.0, 600.0));
        assert!(!app.exit_on_error);
        assert!(!app.drag_window);
    }

    #[test]
    fn build_canvas_uses_configured_size_and_color() {
        let teal = Color::from_rgb_u8(0, 128, 128);
        let canvas = Application::new()
            .size(320.0, 240.0)
            .clear_color(teal)
            .build_canvas(Entity::scene());

        assert_eq!(canvas.size(), Viewport::new(320.0, 240.0));
        assert_eq!(canvas.clear_color(), teal);
        assert!(canvas.scene().is_some());
        assert!(canvas.repaint_pending());
    }
}
