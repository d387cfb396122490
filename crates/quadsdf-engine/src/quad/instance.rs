use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

use crate::paint::Color;

/// Per-rectangle instance data, uploaded verbatim into the instance buffer.
///
/// `pos.xy` is the model-space corner the template's `(0, 0)` maps to; `pos.z` is
/// copied to clip-space depth and must stay in `[0, 1]` to survive clipping.
/// `color` is straight alpha.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct RectInstance {
    pub pos: [f32; 3],
    pub size: [f32; 2],
    pub color: [f32; 4],
}

impl RectInstance {
    /// Shader locations. Location 2 is reserved and never bound.
    pub const POS_LOCATION: u32 = 0;
    pub const SIZE_LOCATION: u32 = 1;
    pub const COLOR_LOCATION: u32 = 3;

    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // pos
        1 => Float32x2, // size
        3 => Float32x4  // color
    ];

    #[inline]
    pub fn new(pos: Vec3, size: Vec2, color: Color) -> Self {
        Self {
            pos: pos.to_array(),
            size: size.to_array(),
            color: color.to_array(),
        }
    }

    /// Instance at depth `0` from a corner and a size.
    #[inline]
    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32, color: Color) -> Self {
        Self::new(Vec3::new(x, y, 0.0), Vec2::new(w, h), color)
    }

    #[inline]
    pub fn with_depth(mut self, z: f32) -> Self {
        self.pos[2] = z;
        self
    }

    #[inline]
    pub fn pos(&self) -> Vec3 {
        Vec3::from_array(self.pos)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::from_array(self.size)
    }

    #[inline]
    pub fn color(&self) -> Vec4 {
        Vec4::from_array(self.color)
    }

    /// `true` when the instance has no area (zero or non-finite size).
    ///
    /// Negative sizes are fine: they mirror the rectangle about `pos`.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        let size = self.size();
        !(size.x != 0.0 && size.y != 0.0 && size.is_finite())
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
