use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};

use crate::coords::{Canvas, Transform};

/// Binding 0: output surface size, integer and float forms.
///
/// WGSL: `struct Canvas { size_i32: vec2<i32>, size_f32: vec2<f32> }`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CanvasUniform {
    pub size_i32: [i32; 2],
    pub size_f32: [f32; 2],
}

/// Binding 1: active model → clip affine.
///
/// WGSL: `struct Transform { affine_mat: mat2x2<f32>, affine_trans: vec2<f32> }`.
/// `affine_mat` is column-major, as WGSL matrices are.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TransformUniform {
    pub affine_mat: [[f32; 2]; 2],
    pub affine_trans: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

impl From<Canvas> for CanvasUniform {
    fn from(canvas: Canvas) -> Self {
        Self {
            size_i32: canvas.size_i32().to_array(),
            size_f32: canvas.size_f32().to_array(),
        }
    }
}

impl From<Transform> for TransformUniform {
    fn from(xf: Transform) -> Self {
        Self {
            affine_mat: xf.mat().to_cols_array_2d(),
            affine_trans: xf.trans().to_array(),
            _pad: [0.0; 2],
        }
    }
}

/// Minimum binding size for a uniform struct. Both uniform types are non-empty.
pub(crate) fn min_binding_size<T>() -> NonZeroU64 {
    NonZeroU64::new(std::mem::size_of::<T>() as u64).unwrap_or(NonZeroU64::MIN)
}
