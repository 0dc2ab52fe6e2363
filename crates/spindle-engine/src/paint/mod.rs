//! Color representation shared by the frame loop and the renderer.

pub mod color;

pub use color::Color;
