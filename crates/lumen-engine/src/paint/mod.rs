//! Paint model shared between visuals and the graphics binding.
//!
//! Colors are stored linear and premultiplied; see [`Color`].

pub mod color;

pub use color::Color;
