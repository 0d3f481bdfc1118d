//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single canvas window, wires them to the
//! GPU layer and translates platform callbacks into [`App`](crate::core::App)
//! calls.

mod runtime;

pub use runtime::{RedrawHandle, Runtime, RuntimeConfig};
