use glam::{Mat4, Vec3};

/// Perspective projection parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    /// Vertical field of view, radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: 45.0_f32.to_radians(),
            aspect: 1200.0 / 800.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// The three matrices consumed by the triangle shader.
///
/// `view` and `projection` are fixed at construction. Only `model` changes,
/// through [`TransformSet::set_rotation`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransformSet {
    model: Mat4,
    view: Mat4,
    projection: Mat4,
}

impl TransformSet {
    /// Camera pulled back `camera_distance` units along +Z, looking at the origin.
    pub fn new(camera_distance: f32, projection: Projection) -> Self {
        Self {
            model: Mat4::IDENTITY,
            view: Mat4::from_translation(Vec3::new(0.0, 0.0, -camera_distance)),
            projection: projection.matrix(),
        }
    }

    /// Rebuilds the model matrix as a rotation of `angle` radians about +Y.
    pub fn set_rotation(&mut self, angle: f32) {
        self.model = Mat4::from_rotation_y(angle);
    }

    #[inline]
    pub fn model(&self) -> Mat4 {
        self.model
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }
}

impl Default for TransformSet {
    fn default() -> Self {
        Self::new(3.0, Projection::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn model_at_zero_is_identity() {
        let mut t = TransformSet::default();
        assert_eq!(t.model(), Mat4::IDENTITY);
        t.set_rotation(1.3);
        t.set_rotation(0.0);
        assert!(t.model().abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn view_and_projection_do_not_change_with_rotation() {
        let mut t = TransformSet::default();
        let (view, proj) = (t.view(), t.projection());

        for angle in [0.1f32, 2.0, 7.5, 1000.0] {
            t.set_rotation(angle);
            assert_eq!(t.view(), view);
            assert_eq!(t.projection(), proj);
        }
    }

    #[test]
    fn view_translates_back_along_z() {
        let t = TransformSet::new(3.0, Projection::default());
        let p = t.view() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(p, Vec4::new(0.0, 0.0, -3.0, 1.0));
    }

    #[test]
    fn quarter_turn_maps_x_to_minus_z() {
        let mut t = TransformSet::default();
        t.set_rotation(std::f32::consts::FRAC_PI_2);
        let p = t.model().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
    }

    #[test]
    fn origin_lands_inside_clip_volume() {
        let t = TransformSet::default();
        let clip = t.projection() * t.view() * t.model() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
