use anyhow::{ensure, Result};
use glam::{IVec2, Vec2};

/// Largest accepted width or height.
///
/// Keeps both the `i32` and the `f32` form of the size exact.
pub const MAX_CANVAS_DIMENSION: u32 = 1 << 15;

/// Output surface size in device pixels.
///
/// Invariant: both dimensions are in `1..=MAX_CANVAS_DIMENSION`, so the float form
/// handed to shaders always equals the integer form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Canvas {
    width: u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        ensure!(
            width > 0 && height > 0,
            "canvas has zero size ({width}x{height})"
        );
        ensure!(
            width <= MAX_CANVAS_DIMENSION && height <= MAX_CANVAS_DIMENSION,
            "canvas {width}x{height} exceeds {MAX_CANVAS_DIMENSION} pixels per side"
        );
        Ok(Self { width, height })
    }

    #[inline]
    pub fn width(self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size_i32(self) -> IVec2 {
        IVec2::new(self.width as i32, self.height as i32)
    }

    #[inline]
    pub fn size_f32(self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    #[inline]
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}
