use glam::Vec4;

/// Pipeline variant. Both variants share the uniform and instance layouts.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum QuadVariant {
    /// Interpolated instance color, no coverage math.
    Flat,
    /// Box-SDF coverage with a one-pixel edge ramp.
    #[default]
    Antialiased,
}

impl QuadVariant {
    pub const ALL: [QuadVariant; 2] = [QuadVariant::Flat, QuadVariant::Antialiased];

    #[inline]
    pub const fn label(self) -> &'static str {
        match self {
            QuadVariant::Flat => "flat",
            QuadVariant::Antialiased => "antialiased",
        }
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            QuadVariant::Flat => 0,
            QuadVariant::Antialiased => 1,
        }
    }
}

/// How fragment output combines with the color target.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Fragment output overwrites the target.
    Replace,
    /// Straight-alpha source-over (`wgpu::BlendState::ALPHA_BLENDING`).
    #[default]
    Alpha,
}

impl BlendMode {
    pub fn blend_state(self) -> Option<wgpu::BlendState> {
        match self {
            BlendMode::Replace => None,
            BlendMode::Alpha => Some(wgpu::BlendState::ALPHA_BLENDING),
        }
    }

    /// CPU equivalent of [`blend_state`](Self::blend_state).
    ///
    /// Inputs are clamped to `[0, 1]` first, as a unorm target would store them.
    pub fn blend(self, src: Vec4, dst: Vec4) -> Vec4 {
        let src = saturate4(src);
        match self {
            BlendMode::Replace => src,
            BlendMode::Alpha => {
                let inv = 1.0 - src.w;
                let rgb = src.truncate() * src.w + dst.truncate() * inv;
                rgb.extend(src.w + dst.w * inv)
            }
        }
    }
}

pub(crate) fn saturate(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

pub(crate) fn saturate4(v: Vec4) -> Vec4 {
    Vec4::new(saturate(v.x), saturate(v.y), saturate(v.z), saturate(v.w))
}
