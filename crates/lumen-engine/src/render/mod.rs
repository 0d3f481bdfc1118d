//! Graphics binding.
//!
//! The canvas talks to the GPU through the narrow [`Graphics`] trait: it sets
//! a clear color and clears the frame once per paint tick, before the scene is
//! traversed. Two bindings ship with the engine:
//! - [`GpuGraphics`]: wgpu, clears the acquired surface texture and the depth
//!   attachment
//! - [`RecordingGraphics`]: headless, records every call (tests, tooling)

mod gpu;
mod graphics;
mod record;

pub use gpu::GpuGraphics;
pub use graphics::{ClearPlanes, Graphics};
pub use record::{GraphicsCall, RecordingGraphics};
