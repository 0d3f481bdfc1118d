use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::keyboard::ModifiersState;
use winit::window::{Window, WindowId};

use crate::coords::Vec2;
use crate::core::{logical_viewport, App, AppControl, FrameCtx, PaintTick, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::{InputState, Modifiers, MouseButton, PointerInput};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,

    /// Stop the event loop on the first error returned by the application.
    ///
    /// When `false`, the error is logged and the offending frame or pointer
    /// occurrence is dropped.
    pub exit_on_error: bool,

    /// Start a window drag when a primary press is left unhandled.
    pub drag_window_on_unhandled_press: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            exit_on_error: false,
            drag_window_on_unhandled_press: false,
        }
    }
}

#[derive(Debug, Copy, Clone)]
enum RuntimeEvent {
    Redraw,
}

/// Schedules a paint of the runtime's window from anywhere on the event-loop
/// thread. Requests are delivered as loop events, never synchronously.
#[derive(Clone)]
pub struct RedrawHandle {
    proxy: EventLoopProxy<RuntimeEvent>,
}

impl RedrawHandle {
    pub fn request(&self) {
        if self.proxy.send_event(RuntimeEvent::Redraw).is_err() {
            log::trace!("redraw requested after the event loop closed");
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and drives `app` until the window closes.
    ///
    /// Returns the application error that stopped the loop when
    /// [`RuntimeConfig::exit_on_error`] is set.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::<RuntimeEvent>::with_user_event()
            .build()
            .context("failed to create winit EventLoop")?;

        let redraw = RedrawHandle { proxy: event_loop.create_proxy() };
        let mut state = AppState::new(config, gpu_init, app, redraw);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    redraw: RedrawHandle,

    entry: Option<WindowEntry>,
    error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A, redraw: RedrawHandle) -> Self {
        Self {
            config,
            gpu_init,
            app,
            redraw,
            entry: None,
            error: None,
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        let viewport = entry.with_window(|w| logical_viewport(w));
        self.entry = Some(entry);
        self.app.on_start(self.redraw.clone(), viewport);
        Ok(())
    }

    /// Error boundary for application callbacks.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("application error: {err:#}");
        if self.config.exit_on_error {
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn dispatch_pointer(&mut self, event_loop: &ActiveEventLoop, mut input: PointerInput) {
        match self.app.on_pointer(&mut input) {
            Ok(AppControl::Exit) => event_loop.exit(),
            Ok(AppControl::Continue) => self.pointer_default(&input),
            Err(err) => self.fail(event_loop, err),
        }
    }

    /// Platform default handling for occurrences the application left unhandled.
    fn pointer_default(&self, input: &PointerInput) {
        if input.handled || !self.config.drag_window_on_unhandled_press || !input.is_primary_press() {
            return;
        }
        if let Some(entry) = &self.entry {
            if let Err(e) = entry.with_window(|w| w.drag_window()) {
                log::debug!("window drag unavailable: {e}");
            }
        }
    }

    fn paint(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        let app = &mut self.app;

        let result = entry.with_mut(|fields| {
            let tick = PaintTick {
                time: fields.clock.tick(),
                viewport: logical_viewport(fields.window),
            };
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: fields.window,
                },
                gpu: fields.gpu,
                input: fields.input_state,
                tick,
            };
            app.on_frame(&mut ctx)
        });

        match result {
            Ok(AppControl::Continue) => {}
            Ok(AppControl::Exit) => event_loop.exit(),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn resized(&mut self) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        let new_size = entry.with_window(|w| w.inner_size());
        entry.with_gpu_mut(|gpu| gpu.resize(new_size));
        let viewport = entry.with_window(|w| logical_viewport(w));

        self.app.on_resize(viewport);
        entry.with_window(|w| w.request_redraw());
    }
}

impl<A> ApplicationHandler<RuntimeEvent> for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            log::error!("failed to create window: {e:#}");
            self.error = Some(e);
            event_loop.exit();
            return;
        }

        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: RuntimeEvent) {
        match event {
            RuntimeEvent::Redraw => {
                if let Some(entry) = &self.entry {
                    entry.with_window(|w| w.request_redraw());
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Paints happen only on request (resize, expose, RedrawHandle).
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                self.entry = None;
                event_loop.exit();
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => self.resized(),

            WindowEvent::RedrawRequested => self.paint(event_loop, window_id),

            WindowEvent::ModifiersChanged(m) => {
                let modifiers = map_modifiers(m.state());
                entry.with_input_state_mut(|s| s.set_modifiers(modifiers));
            }

            WindowEvent::Focused(focused) => {
                entry.with_input_state_mut(|s| s.set_focused(focused));
            }

            WindowEvent::CursorLeft { .. } => {
                entry.with_input_state_mut(|s| s.pointer_left());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let pos = entry.with_window(|w| to_logical(w, position));
                let input = entry.with_input_state_mut(|s| s.pointer_moved(pos));
                self.dispatch_pointer(event_loop, input);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state == ElementState::Pressed;
                let button = map_mouse_button(button);
                if let Some(input) = entry.with_input_state_mut(|s| s.button_changed(button, pressed)) {
                    self.dispatch_pointer(event_loop, input);
                }
            }

            _ => {}
        }
    }
}

fn to_logical(window: &Window, pos: PhysicalPosition<f64>) -> Vec2 {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    Vec2::new(logical.x as f32, logical.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}
