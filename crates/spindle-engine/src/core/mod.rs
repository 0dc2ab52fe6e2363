//! Core loop contracts.
//!
//! Defines the frame loop state machine, the backend interface it drives, the
//! scene configuration and resource teardown. Nothing here depends on winit,
//! so the loop can be driven headless with a `ManualClock` and a recording
//! backend.

mod backend;
mod config;
mod frame_loop;
mod lifecycle;

pub use backend::{FrameBackend, FrameStatus};
pub use config::SceneConfig;
pub use frame_loop::{CloseReason, FrameLoop, LoopState};
pub use lifecycle::{Lifecycle, Resource, SceneHandles};
