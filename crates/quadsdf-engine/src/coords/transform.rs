use std::ops::Mul;

use glam::{Affine2, Mat2, Vec2};

use super::Canvas;

/// Model → clip affine transform (`clip = mat * p + trans`).
///
/// One transform is active per draw; every instance of the draw observes the same
/// value. Composition follows `glam`: `a * b` applies `b` first.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    affine: Affine2,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        affine: Affine2::IDENTITY,
    };

    #[inline]
    pub const fn from_affine(affine: Affine2) -> Self {
        Self { affine }
    }

    #[inline]
    pub fn from_mat_trans(mat: Mat2, trans: Vec2) -> Self {
        Self::from_affine(Affine2::from_mat2_translation(mat, trans))
    }

    /// Maps canvas pixels (top-left origin, +Y down) onto clip space.
    ///
    /// This is the identity view of a drawing surface: one model unit is one device pixel.
    pub fn pixels(canvas: Canvas) -> Self {
        let size = canvas.size_f32();
        Self::from_mat_trans(
            Mat2::from_diagonal(Vec2::new(2.0 / size.x, -2.0 / size.y)),
            Vec2::new(-1.0, 1.0),
        )
    }

    #[inline]
    pub fn affine(self) -> Affine2 {
        self.affine
    }

    #[inline]
    pub fn mat(self) -> Mat2 {
        self.affine.matrix2
    }

    #[inline]
    pub fn trans(self) -> Vec2 {
        self.affine.translation
    }

    /// Returns a transform that applies `self` first, then `outer`.
    #[inline]
    pub fn then(self, outer: Transform) -> Self {
        outer * self
    }

    /// Translates in model space (applied before the current transform).
    pub fn translate(self, delta: Vec2) -> Self {
        self * Self::from_affine(Affine2::from_translation(delta))
    }

    /// Scales in model space (applied before the current transform).
    pub fn scale(self, factor: Vec2) -> Self {
        self * Self::from_affine(Affine2::from_scale(factor))
    }

    /// Scales around `pivot` (model space).
    pub fn scale_about(self, pivot: Vec2, factor: Vec2) -> Self {
        self.translate(pivot).scale(factor).translate(-pivot)
    }

    #[inline]
    pub fn apply_point(self, p: Vec2) -> Vec2 {
        self.affine.transform_point2(p)
    }

    /// Applies the linear part only.
    #[inline]
    pub fn apply_vector(self, v: Vec2) -> Vec2 {
        self.affine.transform_vector2(v)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.affine.is_finite()
    }

    /// Bit pattern used to deduplicate identical transforms within a frame.
    pub(crate) fn to_bits(self) -> [u32; 6] {
        self.affine.to_cols_array().map(f32::to_bits)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Transform;

    #[inline]
    fn mul(self, rhs: Transform) -> Transform {
        Transform::from_affine(self.affine * rhs.affine)
    }
}

impl From<Affine2> for Transform {
    fn from(affine: Affine2) -> Self {
        Self::from_affine(affine)
    }
}
