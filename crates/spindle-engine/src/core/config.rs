use crate::paint::Color;
use crate::transform::{Projection, DEFAULT_ANGULAR_VELOCITY};

/// Fixed parameters of the spinning triangle scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Spin rate about +Y, radians per second.
    pub angular_velocity: f32,
    /// Vertical field of view, degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the camera to the triangle along Z.
    pub camera_distance: f32,
    pub clear_color: Color,
}

impl SceneConfig {
    /// Projection for a drawable of the given aspect ratio (width / height).
    ///
    /// Degenerate aspect ratios fall back to 1.0.
    pub fn projection(&self, aspect: f32) -> Projection {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        Projection {
            fov_y: self.fov_y_degrees.to_radians(),
            aspect,
            near: self.near,
            far: self.far,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            angular_velocity: DEFAULT_ANGULAR_VELOCITY,
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            camera_distance: 3.0,
            clear_color: Color::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_scene() {
        let c = SceneConfig::default();
        assert_eq!(c.angular_velocity, 10.0);
        assert_eq!(c.camera_distance, 3.0);
        assert_eq!(c.projection(1.5), Projection::default());
    }

    #[test]
    fn degenerate_aspect_falls_back() {
        let c = SceneConfig::default();
        assert_eq!(c.projection(0.0).aspect, 1.0);
        assert_eq!(c.projection(f32::NAN).aspect, 1.0);
        assert_eq!(c.projection(2.0).aspect, 2.0);
    }
}
