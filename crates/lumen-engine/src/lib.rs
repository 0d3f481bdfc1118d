//! Lumen engine crate.
//!
//! Platform and GPU plumbing under the scene graph: geometry and transforms,
//! the recorded draw stream, the graphics binding, pointer input, frame
//! timing, the winit runtime, and logging setup.

pub mod core;
pub mod device;
pub mod input;
pub mod time;
pub mod window;

pub mod coords;
pub mod draw;
pub mod logging;
pub mod paint;
pub mod render;
