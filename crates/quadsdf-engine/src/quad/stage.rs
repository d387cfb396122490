//! Vertex and fragment stage math.
//!
//! These functions are the CPU twins of `quad_common.wgsl`, `quad_flat.wgsl` and
//! `quad_sdf.wgsl`. Keep both sides in sync: the reference rasterizer and the
//! tests trust this module to describe what the GPU computes.

use glam::{Vec2, Vec4};

use crate::coords::{Canvas, Transform};

use super::variant::saturate;
use super::{template_corner, QuadVariant, RectInstance};

/// Width of the coverage ramp, in raster pixels. The SDF box is inset by this much
/// so the ramp lands on the outermost pixel ring of the rasterized quad.
pub const FEATHER_PX: f32 = 1.0;

/// Uniform values shared by every vertex of a draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawUniforms {
    pub canvas: Canvas,
    pub transform: Transform,
}

impl DrawUniforms {
    #[inline]
    pub fn new(canvas: Canvas, transform: Transform) -> Self {
        Self { canvas, transform }
    }
}

/// Antialiasing varyings for one vertex.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SdfVarying {
    /// Raster position relative to the snapped box center. Interpolated.
    pub pos: Vec2,
    /// Box half-extents in raster pixels. Constant per instance (flat).
    pub half_size: Vec2,
}

/// Output of the vertex stage, and after interpolation, input of the fragment stage.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VertexOutput {
    pub clip_pos: Vec4,
    pub color: Vec4,
    /// Present for [`QuadVariant::Antialiased`] only.
    pub sdf: Option<SdfVarying>,
}

impl VertexOutput {
    /// Interpolates three vertex outputs with barycentric `weights`.
    ///
    /// `sdf.half_size` uses flat interpolation and comes from the first vertex.
    pub fn interpolate(tri: &[VertexOutput; 3], weights: [f32; 3]) -> VertexOutput {
        let [a, b, c] = tri;
        let [wa, wb, wc] = weights;

        let sdf = match (a.sdf, b.sdf, c.sdf) {
            (Some(sa), Some(sb), Some(sc)) => Some(SdfVarying {
                pos: sa.pos * wa + sb.pos * wb + sc.pos * wc,
                half_size: sa.half_size,
            }),
            _ => None,
        };

        VertexOutput {
            clip_pos: a.clip_pos * wa + b.clip_pos * wb + c.clip_pos * wc,
            color: a.color * wa + b.color * wb + c.color * wc,
            sdf,
        }
    }
}

/// Pixel-snapped SDF box of one instance, in raster space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SdfBox {
    pub center: Vec2,
    pub half_size: Vec2,
}

impl SdfBox {
    /// Snaps a raster-space rectangle (origin corner + signed size) to the pixel grid.
    ///
    /// Both edges move to the pixel boundary the rasterizer uses for them, so the box
    /// spans exactly the rasterized pixels and its feather lands on the outermost ring
    /// for odd and fractional sizes alike. The size may be negative on either axis
    /// (mirroring transforms); the box is the same either way.
    pub fn from_raster(raster_pos: Vec2, raster_size: Vec2) -> Self {
        let far = raster_pos + raster_size;
        let lo = snap_edge(raster_pos.min(far));
        let hi = snap_edge(raster_pos.max(far));
        let half_size = ((hi - lo) * 0.5 - Vec2::splat(FEATHER_PX)).max(Vec2::ZERO);
        Self {
            center: (lo + hi) * 0.5,
            half_size,
        }
    }
}

/// Pixel boundary of a raster edge: pixels whose centers lie in `[lo, hi)` are covered,
/// so an edge at `v` bounds pixels up to `ceil(v - 0.5)`.
#[inline]
pub fn snap_edge(v: Vec2) -> Vec2 {
    (v - Vec2::splat(0.5)).ceil()
}

/// Maps a clip-space point to raster pixels: `(p + 1) * (0.5, -0.5) * canvas_size`.
///
/// Raster X runs `0..width` left to right; raster Y runs `-height..0` top to bottom,
/// i.e. device pixel rows shifted by `-height`. Only differences and floors of raster
/// coordinates are consumed, and the shift is integral, so it never shows.
#[inline]
pub fn raster_point(canvas_size: Vec2, p: Vec2) -> Vec2 {
    (p + Vec2::ONE) * Vec2::new(0.5, -0.5) * canvas_size
}

/// Maps a clip-space vector to raster pixels (linear part of [`raster_point`]).
#[inline]
pub fn raster_vector(canvas_size: Vec2, v: Vec2) -> Vec2 {
    v * Vec2::new(0.5, -0.5) * canvas_size
}

/// Vertex stage for one template vertex of one instance.
pub fn vertex_stage(
    variant: QuadVariant,
    uniforms: &DrawUniforms,
    vertex_index: u32,
    instance: &RectInstance,
) -> VertexOutput {
    let xf = uniforms.transform;
    let pos = instance.pos();
    let size = instance.size();

    let local = pos.truncate() + template_corner(vertex_index) * size;
    let clip_xy = xf.apply_point(local);
    let clip_pos = clip_xy.extend(pos.z).extend(1.0);

    let sdf = match variant {
        QuadVariant::Flat => None,
        QuadVariant::Antialiased => {
            let canvas_size = uniforms.canvas.size_f32();
            let raster_pos = raster_point(canvas_size, xf.apply_point(pos.truncate()));
            let raster_size = raster_vector(canvas_size, xf.apply_vector(size));
            let sdf_box = SdfBox::from_raster(raster_pos, raster_size);

            Some(SdfVarying {
                pos: raster_point(canvas_size, clip_xy) - sdf_box.center,
                half_size: sdf_box.half_size,
            })
        }
    };

    VertexOutput {
        clip_pos,
        color: instance.color(),
        sdf,
    }
}

/// Runs the vertex stage for all six template vertices of an instance.
pub fn expand_instance(
    variant: QuadVariant,
    uniforms: &DrawUniforms,
    instance: &RectInstance,
) -> [VertexOutput; 6] {
    std::array::from_fn(|i| vertex_stage(variant, uniforms, i as u32, instance))
}

/// Exact signed distance from `p` to an origin-centered box with half-extents `half_size`.
///
/// Negative inside, zero on the boundary, positive outside.
#[inline]
pub fn box_sdf(p: Vec2, half_size: Vec2) -> f32 {
    let n = p.abs() - half_size;
    n.max(Vec2::ZERO).length() + n.x.max(n.y).min(0.0)
}

/// Coverage alpha for a signed distance: `1 - clamp(d, 0, 1)`. NaN covers nothing.
#[inline]
pub fn coverage(distance: f32) -> f32 {
    if distance.is_nan() {
        return 0.0;
    }
    1.0 - distance.clamp(0.0, 1.0)
}

/// Fragment stage for an interpolated vertex output.
pub fn fragment_stage(input: &VertexOutput) -> Vec4 {
    match input.sdf {
        None => input.color,
        Some(sdf) => {
            let alpha = coverage(box_sdf(sdf.pos, sdf.half_size));
            input.color.truncate().extend(saturate(input.color.w * alpha))
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;

    use super::*;
    use crate::paint::Color;

    fn canvas() -> Canvas {
        Canvas::new(100, 100).unwrap()
    }

    fn pixels() -> DrawUniforms {
        DrawUniforms::new(canvas(), Transform::pixels(canvas()))
    }

    fn blue_square() -> RectInstance {
        RectInstance::from_xywh(10.0, 10.0, 20.0, 20.0, Color::rgb(0.0, 0.0, 1.0))
    }

    // ── vertex stage ──────────────────────────────────────────────────────

    #[test]
    fn clip_position_follows_template_and_transform() {
        let out = expand_instance(QuadVariant::Flat, &pixels(), &blue_square());
        let expected = [
            Vec2::new(-0.8, 0.8),
            Vec2::new(-0.4, 0.8),
            Vec2::new(-0.4, 0.4),
            Vec2::new(-0.8, 0.8),
            Vec2::new(-0.4, 0.4),
            Vec2::new(-0.8, 0.4),
        ];
        for (o, e) in out.iter().zip(expected) {
            assert_relative_eq!(o.clip_pos.truncate().truncate(), e, epsilon = 1e-6);
            assert_eq!(o.clip_pos.w, 1.0);
        }
    }

    #[test]
    fn depth_passes_through_untouched() {
        let inst = blue_square().with_depth(0.375);
        let out = vertex_stage(QuadVariant::Antialiased, &pixels(), 2, &inst);
        assert_eq!(out.clip_pos.z, 0.375);
    }

    #[test]
    fn flat_variant_has_no_sdf_varyings() {
        let out = vertex_stage(QuadVariant::Flat, &pixels(), 0, &blue_square());
        assert!(out.sdf.is_none());
        assert_eq!(out.color, Vec4::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn raster_mapping_flips_y_and_scales() {
        let size = Vec2::new(100.0, 50.0);
        assert_relative_eq!(raster_point(size, Vec2::new(-1.0, -1.0)), Vec2::ZERO);
        assert_relative_eq!(raster_point(size, Vec2::new(1.0, 1.0)), Vec2::new(100.0, -50.0));
        assert_relative_eq!(raster_vector(size, Vec2::new(0.4, -0.4)), Vec2::new(20.0, 10.0));
    }

    #[test]
    fn sdf_box_is_pixel_snapped_and_inset() {
        let out = vertex_stage(QuadVariant::Antialiased, &pixels(), 0, &blue_square());
        let sdf = out.sdf.unwrap();
        // 20 px footprint -> half 10, inset by the one-pixel feather.
        assert_eq!(sdf.half_size, Vec2::splat(9.0));
        // Corner (10, 10) sits 10 px up-left of the center (20, 20).
        assert_relative_eq!(sdf.pos, Vec2::new(-10.0, -10.0), epsilon = 1e-4);
    }

    #[test]
    fn sdf_quantization_is_identical_across_vertices() {
        let inst = RectInstance::from_xywh(13.37, 7.21, 31.9, 12.6, Color::WHITE);
        let out = expand_instance(QuadVariant::Antialiased, &pixels(), &inst);
        let first = out[0].sdf.unwrap().half_size;
        for o in &out {
            assert_eq!(o.sdf.unwrap().half_size, first);
        }
        // Re-deriving from the same inputs yields bit-identical values.
        let again = expand_instance(QuadVariant::Antialiased, &pixels(), &inst);
        assert_eq!(out, again);
    }

    #[test]
    fn sdf_box_handles_mirrored_sizes() {
        let a = SdfBox::from_raster(Vec2::new(10.0, -90.0), Vec2::new(20.0, 20.0));
        let b = SdfBox::from_raster(Vec2::new(30.0, -70.0), Vec2::new(-20.0, -20.0));
        assert_eq!(a, b);
    }

    #[test]
    fn sdf_box_tolerates_rounding_around_integers() {
        let below = SdfBox::from_raster(Vec2::new(9.999_998, 10.0), Vec2::new(19.999_998, 20.0));
        let above = SdfBox::from_raster(Vec2::new(10.000_002, 10.0), Vec2::new(20.000_002, 20.0));
        for b in [below, above] {
            assert_eq!(b.center, Vec2::new(20.0, 20.0));
            assert_eq!(b.half_size, Vec2::splat(9.0));
        }
    }

    #[test]
    fn sdf_box_edges_land_on_pixel_boundaries_for_odd_sizes() {
        // 21 px: edges 10 and 31, center on a half pixel.
        let b = SdfBox::from_raster(Vec2::new(10.0, 0.0), Vec2::new(21.0, 3.0));
        assert_eq!(b.center, Vec2::new(20.5, 1.5));
        assert_eq!(b.half_size, Vec2::new(9.5, 0.5));

        // 21.4 px: the last covered pixel center is 30.5, so the far edge stays at 31.
        let b = SdfBox::from_raster(Vec2::new(10.0, 0.0), Vec2::new(21.4, 2.0));
        assert_eq!(b.center.x, 20.5);
        assert_eq!(b.half_size.x, 9.5);

        // 21.6 px covers pixel 31 as well.
        let b = SdfBox::from_raster(Vec2::new(10.0, 0.0), Vec2::new(21.6, 2.0));
        assert_eq!(b.center.x, 21.0);
        assert_eq!(b.half_size.x, 10.0);
    }

    #[test]
    fn snap_edge_matches_pixel_center_coverage() {
        assert_eq!(snap_edge(Vec2::new(10.0, 10.4)), Vec2::new(10.0, 10.0));
        assert_eq!(snap_edge(Vec2::new(10.5, 10.6)), Vec2::new(10.0, 11.0));
        assert_eq!(snap_edge(Vec2::new(-90.0, -89.6)), Vec2::new(-90.0, -90.0));
    }

    #[test]
    fn tiny_boxes_collapse_to_zero_half_size() {
        let b = SdfBox::from_raster(Vec2::ZERO, Vec2::new(1.0, 0.5));
        assert_eq!(b.half_size, Vec2::ZERO);
    }

    #[test]
    fn composed_transform_matches_pre_transformed_instance() {
        let t = Transform::IDENTITY
            .translate(Vec2::new(3.0, 5.0))
            .scale(Vec2::splat(2.0));
        let view = Transform::pixels(canvas());

        let inst = RectInstance::from_xywh(2.0, 1.0, 4.0, 3.0, Color::WHITE);
        let moved = RectInstance::new(
            t.apply_point(inst.pos().truncate()).extend(0.0),
            t.apply_vector(inst.size()),
            Color::WHITE,
        );

        let composed = DrawUniforms::new(canvas(), view * t * t);
        let staged = DrawUniforms::new(canvas(), view * t);

        let a = expand_instance(QuadVariant::Antialiased, &composed, &inst);
        let b = expand_instance(QuadVariant::Antialiased, &staged, &moved);
        for (x, y) in a.iter().zip(&b) {
            assert_relative_eq!(x.clip_pos, y.clip_pos, epsilon = 1e-5);
            let (sx, sy) = (x.sdf.unwrap(), y.sdf.unwrap());
            assert_eq!(sx.half_size, sy.half_size);
            assert_relative_eq!(sx.pos, sy.pos, epsilon = 1e-3);
        }
    }

    #[test]
    fn non_finite_inputs_do_not_panic() {
        let inst = RectInstance::new(
            Vec3::new(f32::NAN, 0.0, 0.0),
            Vec2::new(f32::INFINITY, 1.0),
            Color::WHITE,
        );
        let out = expand_instance(QuadVariant::Antialiased, &pixels(), &inst);
        let frag = fragment_stage(&out[0]);
        assert!(frag.w >= 0.0 && frag.w <= 1.0);
    }

    // ── SDF + coverage ────────────────────────────────────────────────────

    #[test]
    fn box_sdf_signs() {
        let half = Vec2::new(4.0, 2.0);
        assert_eq!(box_sdf(Vec2::ZERO, half), -2.0);
        assert_eq!(box_sdf(Vec2::new(4.0, 0.0), half), 0.0);
        assert_eq!(box_sdf(Vec2::new(6.0, 0.0), half), 2.0);
        assert_relative_eq!(box_sdf(Vec2::new(7.0, 6.0), half), 5.0);
    }

    #[test]
    fn coverage_ramps_over_one_pixel() {
        assert_eq!(coverage(-3.0), 1.0);
        assert_eq!(coverage(0.0), 1.0);
        assert_eq!(coverage(0.25), 0.75);
        assert_eq!(coverage(1.0), 0.0);
        assert_eq!(coverage(12.0), 0.0);
        assert_eq!(coverage(f32::NAN), 0.0);
    }

    #[test]
    fn coverage_is_monotonic_and_continuous() {
        let mut prev = coverage(-2.0);
        let step = 1.0 / 256.0;
        let mut d = -2.0;
        while d <= 3.0 {
            let c = coverage(d);
            assert!(c <= prev, "coverage increased at d = {d}");
            assert!(prev - c <= step + 1e-6, "coverage jumped at d = {d}");
            prev = c;
            d += step;
        }
    }

    #[test]
    fn fragment_scales_instance_alpha_by_coverage() {
        let input = VertexOutput {
            clip_pos: Vec4::ZERO,
            color: Vec4::new(0.1, 0.2, 0.3, 0.8),
            sdf: Some(SdfVarying {
                pos: Vec2::new(9.5, 0.0),
                half_size: Vec2::splat(9.0),
            }),
        };
        let out = fragment_stage(&input);
        assert_relative_eq!(out, Vec4::new(0.1, 0.2, 0.3, 0.4), epsilon = 1e-6);
    }

    #[test]
    fn flat_fragment_is_identity() {
        let color = Vec4::new(0.25, 0.5, 0.75, 0.6);
        let input = VertexOutput {
            clip_pos: Vec4::ZERO,
            color,
            sdf: None,
        };
        assert_eq!(fragment_stage(&input), color);
    }

    #[test]
    fn interpolation_uses_first_vertex_half_size() {
        let v = |pos: Vec2, half: f32| VertexOutput {
            clip_pos: pos.extend(0.0).extend(1.0),
            color: Vec4::ONE,
            sdf: Some(SdfVarying {
                pos,
                half_size: Vec2::splat(half),
            }),
        };
        let tri = [v(Vec2::ZERO, 3.0), v(Vec2::X, 4.0), v(Vec2::Y, 5.0)];
        let out = VertexOutput::interpolate(&tri, [0.5, 0.25, 0.25]);
        let sdf = out.sdf.unwrap();
        assert_eq!(sdf.half_size, Vec2::splat(3.0));
        assert_relative_eq!(sdf.pos, Vec2::new(0.25, 0.25));
        assert_relative_eq!(out.clip_pos.truncate().truncate(), Vec2::new(0.25, 0.25));
    }
}
