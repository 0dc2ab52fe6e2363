//! Model/view/projection state for the spinning triangle.
//!
//! Conventions:
//! - angles are radians, angular velocity is radians per second
//! - right-handed coordinates, camera looks down -Z
//! - clip-space depth is `0..1` (wgpu), so projections use `perspective_rh`

mod rotation;
mod transforms;

pub use rotation::{RotationState, DEFAULT_ANGULAR_VELOCITY};
pub use transforms::{Projection, TransformSet};
