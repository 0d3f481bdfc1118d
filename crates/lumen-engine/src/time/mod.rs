//! Frame timing.
//!
//! One [`FrameClock`] per window; the runtime ticks it once per paint and
//! hands the resulting [`FrameTime`] to the application on the paint tick.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
