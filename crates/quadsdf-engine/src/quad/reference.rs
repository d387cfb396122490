//! Software reference rasterizer.
//!
//! Runs [`stage::vertex_stage`] and [`stage::fragment_stage`] exactly as the GPU
//! would: viewport mapping with a Y flip, one sample at each pixel center, the
//! top-left fill rule for shared edges, depth clipping to `[0, 1]`, and the blend
//! mode of the color target. Slow by design; it is the test oracle.

use glam::{Vec2, Vec4};

use crate::coords::Canvas;

use super::stage::{self, DrawUniforms, VertexOutput};
use super::variant::saturate4;
use super::{BlendMode, QuadBatch};

/// Float RGBA image, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
}

impl Pixmap {
    /// Transparent black image covering `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self::filled(canvas, Vec4::ZERO)
    }

    pub fn filled(canvas: Canvas, color: Vec4) -> Self {
        Self {
            width: canvas.width(),
            height: canvas.height(),
            pixels: vec![color; canvas.pixel_count()],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Vec4> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Alpha at `(x, y)`; `0` outside the image.
    pub fn alpha_at(&self, x: u32, y: u32) -> f32 {
        self.get(x, y).map_or(0.0, |p| p.w)
    }

    /// Number of pixels with non-zero alpha.
    pub fn count_visible(&self) -> usize {
        self.pixels.iter().filter(|p| p.w > 0.0).count()
    }

    pub fn pixels(&self) -> &[Vec4] {
        &self.pixels
    }

    /// Quantizes to RGBA8 the way a unorm target stores values.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| saturate4(*p).to_array())
            .map(|c| (c * 255.0).round() as u8)
            .collect()
    }

    fn blend(&mut self, x: u32, y: u32, src: Vec4, mode: BlendMode) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = mode.blend(src, self.pixels[i]);
        }
    }
}

/// Renders `batches` in order onto a transparent canvas.
pub fn rasterize(canvas: Canvas, batches: &[QuadBatch], blend: BlendMode) -> Pixmap {
    let mut pixmap = Pixmap::new(canvas);
    for batch in batches {
        rasterize_batch(&mut pixmap, canvas, batch, blend);
    }
    pixmap
}

/// Renders one batch onto `pixmap`. `pixmap` must have been created for `canvas`.
pub fn rasterize_batch(pixmap: &mut Pixmap, canvas: Canvas, batch: &QuadBatch, blend: BlendMode) {
    debug_assert_eq!((pixmap.width, pixmap.height), (canvas.width(), canvas.height()));

    let uniforms = DrawUniforms::new(canvas, batch.transform);
    for instance in &batch.instances {
        if instance.is_degenerate() {
            continue;
        }

        // Depth is constant per instance; outside [0, 1] the clipper drops it whole.
        let z = instance.pos[2];
        if !(0.0..=1.0).contains(&z) {
            continue;
        }

        let verts = stage::expand_instance(batch.variant, &uniforms, instance);
        for tri in verts.chunks_exact(3) {
            let tri = [tri[0], tri[1], tri[2]];
            rasterize_triangle(pixmap, canvas, &tri, blend);
        }
    }
}

/// Clip space → framebuffer pixels (top-left origin, +Y down).
#[inline]
fn to_framebuffer(canvas_size: Vec2, clip: Vec4) -> Vec2 {
    Vec2::new(
        (clip.x + 1.0) * 0.5 * canvas_size.x,
        (1.0 - clip.y) * 0.5 * canvas_size.y,
    )
}

/// Twice the signed area of `(a, b, p)`; positive when `p` is clockwise of `a → b`
/// on screen.
#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Top-left rule for an edge of a positively oriented triangle.
#[inline]
fn owns_boundary(a: Vec2, b: Vec2) -> bool {
    let d = b - a;
    (d.y == 0.0 && d.x > 0.0) || d.y < 0.0
}

#[inline]
fn inside(w: f32, a: Vec2, b: Vec2) -> bool {
    w > 0.0 || (w == 0.0 && owns_boundary(a, b))
}

fn rasterize_triangle(pixmap: &mut Pixmap, canvas: Canvas, tri: &[VertexOutput; 3], blend: BlendMode) {
    let size = canvas.size_f32();
    let mut tri = *tri;
    let mut v = tri.map(|o| to_framebuffer(size, o.clip_pos));

    if !v.iter().all(|p| p.is_finite()) {
        return;
    }

    let mut area = edge(v[0], v[1], v[2]);
    if area == 0.0 || !area.is_finite() {
        return;
    }
    if area < 0.0 {
        v.swap(1, 2);
        tri.swap(1, 2);
        area = -area;
    }

    let min = v[0].min(v[1]).min(v[2]);
    let max = v[0].max(v[1]).max(v[2]);
    let x0 = min.x.floor().clamp(0.0, size.x) as u32;
    let y0 = min.y.floor().clamp(0.0, size.y) as u32;
    let x1 = max.x.ceil().clamp(0.0, size.x) as u32;
    let y1 = max.y.ceil().clamp(0.0, size.y) as u32;

    for y in y0..y1 {
        for x in x0..x1 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(v[1], v[2], p);
            let w1 = edge(v[2], v[0], p);
            let w2 = edge(v[0], v[1], p);

            if !(inside(w0, v[1], v[2]) && inside(w1, v[2], v[0]) && inside(w2, v[0], v[1])) {
                continue;
            }

            let frag = VertexOutput::interpolate(&tri, [w0 / area, w1 / area, w2 / area]);
            pixmap.blend(x, y, stage::fragment_stage(&frag), blend);
        }
    }
}
