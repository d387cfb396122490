use glam::Vec4;

/// Straight-alpha RGBA color, components nominally in `[0, 1]`.
///
/// The antialiased fragment stage scales `a` by coverage and leaves `rgb` alone,
/// so instance colors must not be premultiplied.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Creates a color from 8-bit channels (`0`–`255`), no transfer function applied.
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    #[inline]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Clamps every channel to `[0, 1]`. NaN channels become `0`.
    #[inline]
    pub fn clamped(self) -> Self {
        let c = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self::rgba(c(self.r), c(self.g), c(self.b), c(self.a))
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn to_vec4(self) -> Vec4 {
        Vec4::from_array(self.to_array())
    }

    /// Converts to the `f64` clear color wgpu expects.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

impl From<Color> for [f32; 4] {
    fn from(c: Color) -> Self {
        c.to_array()
    }
}

impl From<Vec4> for Color {
    fn from(v: Vec4) -> Self {
        Self::rgba(v.x, v.y, v.z, v.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u8_maps_full_range() {
        assert_eq!(Color::from_u8(0, 0, 255, 255), Color::rgb(0.0, 0.0, 1.0));
        assert_eq!(Color::from_u8(0, 0, 0, 0), Color::TRANSPARENT);
    }

    #[test]
    fn with_alpha_keeps_rgb() {
        let c = Color::rgb(0.2, 0.4, 0.6).with_alpha(0.5);
        assert_eq!(c, Color::rgba(0.2, 0.4, 0.6, 0.5));
    }

    #[test]
    fn clamped_limits_range_and_drops_nan() {
        let c = Color::rgba(-1.0, 2.0, f32::NAN, 0.5).clamped();
        assert_eq!(c, Color::rgba(0.0, 1.0, 0.0, 0.5));
        assert!(c.is_finite());
    }

    #[test]
    fn is_finite_detects_inf() {
        assert!(!Color::rgba(f32::INFINITY, 0.0, 0.0, 1.0).is_finite());
        assert!(Color::WHITE.is_finite());
    }

    #[test]
    fn vec4_round_trip_is_component_wise() {
        let c = Color::rgba(0.1, 0.2, 0.3, 0.4);
        assert_eq!(Color::from(c.to_vec4()), c);
        assert_eq!(<[f32; 4]>::from(c), [0.1, 0.2, 0.3, 0.4]);
    }
}
