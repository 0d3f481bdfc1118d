//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! higher layers (scene, studio). Runtime internals stay behind [`App`] and
//! the per-frame [`FrameCtx`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, PaintTick, WindowCtx};
pub(crate) use ctx::logical_viewport;
