use glam::Vec2;

/// Vertices emitted per rectangle instance.
pub const VERTICES_PER_INSTANCE: u32 = 6;

/// Unit-square corners for the two triangles of a quad, in emission order.
///
/// Must match `QUAD_TEMPLATE` in `quad_common.wgsl`.
pub const QUAD_TEMPLATE: [Vec2; VERTICES_PER_INSTANCE as usize] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
];

/// Template corner for a vertex ordinal. Ordinals wrap every six vertices.
#[inline]
pub fn template_corner(vertex_index: u32) -> Vec2 {
    QUAD_TEMPLATE[(vertex_index % VERTICES_PER_INSTANCE) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangles_share_the_diagonal() {
        assert_eq!(QUAD_TEMPLATE[0], QUAD_TEMPLATE[3]);
        assert_eq!(QUAD_TEMPLATE[2], QUAD_TEMPLATE[4]);
    }

    #[test]
    fn triangles_have_the_same_winding() {
        let cross = |a: Vec2, b: Vec2, c: Vec2| (b - a).perp_dot(c - a);
        let t1 = cross(QUAD_TEMPLATE[0], QUAD_TEMPLATE[1], QUAD_TEMPLATE[2]);
        let t2 = cross(QUAD_TEMPLATE[3], QUAD_TEMPLATE[4], QUAD_TEMPLATE[5]);
        assert!(t1 > 0.0);
        assert!(t2 > 0.0);
        // Two half-unit triangles cover the unit square.
        assert_eq!(t1 + t2, 2.0);
    }

    #[test]
    fn corner_lookup_wraps() {
        assert_eq!(template_corner(0), Vec2::ZERO);
        assert_eq!(template_corner(5), Vec2::new(0.0, 1.0));
        assert_eq!(template_corner(7), template_corner(1));
    }
}
