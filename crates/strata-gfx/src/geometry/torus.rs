use std::f32::consts::TAU;

use crate::color::Rgba;
use crate::math::Vec3;

use super::mesh::{uniform_color, Geometry};

/// Closed torus around the Y axis.
///
/// `inner_radius` is the tube radius; `outer_radius` is the distance from
/// the torus center to the center of the tube. Rows step around the tube,
/// columns sweep around the Y axis.
///
/// The mesh has exactly `row_segments * column_segments` vertices and wraps
/// in both directions: the last row connects back to the first, and so does
/// the last column. No texture coordinates are produced.
///
/// Fewer than 3 segments in either direction gives a degenerate mesh; it is
/// still returned.
pub fn torus(
    row_segments: u32,
    column_segments: u32,
    inner_radius: f32,
    outer_radius: f32,
    color: Rgba,
) -> Geometry {
    let rows = row_segments as usize;
    let cols = column_segments as usize;
    let vertices = rows * cols;

    let mut position = Vec::with_capacity(vertices * 3);
    let mut normal = Vec::with_capacity(vertices * 3);

    for i in 0..row_segments {
        let (ry, rr) = (TAU / row_segments as f32 * i as f32).sin_cos();

        for j in 0..column_segments {
            let (ts, tc) = (TAU / column_segments as f32 * j as f32).sin_cos();

            let ring = rr * inner_radius + outer_radius;
            let p = Vec3::new(ring * tc, ry * inner_radius, ring * ts);
            let tube_center = Vec3::new(outer_radius * tc, 0.0, outer_radius * ts);
            let n = p.subtract(tube_center).normalize();

            position.extend_from_slice(&p.to_array());
            normal.extend_from_slice(&n.to_array());
        }
    }

    let mut index = Vec::with_capacity(vertices * 6);
    for i in 0..row_segments {
        let next_i = (i + 1) % row_segments;
        for j in 0..column_segments {
            let next_j = (j + 1) % column_segments;

            let a = i * column_segments + j;
            let b = next_i * column_segments + j;
            let c = i * column_segments + next_j;
            let d = next_i * column_segments + next_j;

            index.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }

    Geometry {
        position,
        normal: Some(normal),
        color: uniform_color(color.to_array(), vertices),
        tex_coord: None,
        index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(g: &Geometry, i: u32) -> Vec3 {
        Vec3::from(g.position_at(i as usize).unwrap())
    }

    #[test]
    fn torus_counts_match_segment_product() {
        for (row, col) in [(3, 3), (8, 16), (32, 32), (5, 7)] {
            let g = torus(row, col, 0.25, 1.0, Rgba::white());
            let n = (row * col) as usize;
            assert_eq!(g.vertex_count(), n);
            assert_eq!(g.triangle_count(), n * 2);
            assert_eq!(g.index.len(), n * 6);
            assert!(g.index.iter().all(|&i| (i as usize) < n));
            assert!(g.validate().is_ok());
        }
    }

    #[test]
    fn torus_wraps_in_both_directions() {
        let (row, col) = (4u32, 6u32);
        let g = torus(row, col, 0.25, 1.0, Rgba::white());

        // Last quad of the grid uses the first row and the first column.
        let last = &g.index[g.index.len() - 6..];
        assert!(last.contains(&0));
        assert!(last.contains(&(col - 1)));
        assert!(last.contains(&((row - 1) * col)));
    }

    #[test]
    fn torus_vertices_sit_on_the_tube_surface() {
        let (inner, outer) = (0.3, 1.2);
        let g = torus(12, 24, inner, outer, Rgba::white());
        for i in 0..g.vertex_count() as u32 {
            let p = vertex(&g, i);
            let radial = (p.x * p.x + p.z * p.z).sqrt();
            let dist = ((radial - outer).powi(2) + p.y * p.y).sqrt();
            assert!((dist - inner).abs() < 1e-5, "vertex {i}: {dist}");
        }
    }

    #[test]
    fn torus_normals_are_unit_and_point_away_from_tube_center() {
        let (inner, outer) = (0.3, 1.2);
        let g = torus(8, 8, inner, outer, Rgba::white());
        let normal = g.normal.as_deref().unwrap();
        for (i, n) in normal.chunks(3).enumerate() {
            let n = Vec3::new(n[0], n[1], n[2]);
            assert!((n.length() - 1.0).abs() < 1e-5);

            let p = vertex(&g, i as u32);
            let radial = Vec3::new(p.x, 0.0, p.z).normalize() * outer;
            let expected = (p - radial).normalize();
            assert!((n - expected).length() < 1e-5);
        }
    }

    #[test]
    fn torus_triangles_face_outward() {
        let g = torus(8, 12, 0.25, 1.0, Rgba::white());
        let normal = g.normal.as_deref().unwrap();
        for tri in g.index.chunks(3) {
            let a = vertex(&g, tri[0]);
            let b = vertex(&g, tri[1]);
            let c = vertex(&g, tri[2]);
            let face = (b - a).cross(c - a);
            let s = tri[0] as usize * 3;
            let n = Vec3::new(normal[s], normal[s + 1], normal[s + 2]);
            assert!(face.dot(n) > 0.0);
        }
    }

    #[test]
    fn torus_is_deterministic() {
        let a = torus(7, 9, 0.2, 0.8, Rgba::new(0.1, 0.2, 0.3, 1.0));
        let b = torus(7, 9, 0.2, 0.8, Rgba::new(0.1, 0.2, 0.3, 1.0));
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_segment_counts_are_not_rejected() {
        let g = torus(2, 1, 0.25, 1.0, Rgba::white());
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.index.len(), 12);
        assert!(g.validate().is_ok());
    }
}
