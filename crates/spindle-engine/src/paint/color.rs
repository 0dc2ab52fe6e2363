/// Linear straight-alpha RGBA color.
///
/// The triangle pipeline draws opaque geometry with no blending, so no
/// premultiplication is applied.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Color> for wgpu::Color {
    fn from(c: Color) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_wgpu_color() {
        let c: wgpu::Color = Color::new(0.25, 0.5, 0.75, 1.0).into();
        assert_eq!((c.r, c.g, c.b, c.a), (0.25, 0.5, 0.75, 1.0));
    }

    #[test]
    fn black_is_opaque() {
        let c: wgpu::Color = Color::BLACK.into();
        assert_eq!(c, wgpu::Color::BLACK);
    }
}
