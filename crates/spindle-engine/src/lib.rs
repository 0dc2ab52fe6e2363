//! Spindle engine crate.
//!
//! Platform, GPU and frame-loop pieces for rendering a single spinning
//! triangle with winit and wgpu.

pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod time;
pub mod transform;
pub mod window;
