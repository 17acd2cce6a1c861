use std::f32::consts::{PI, TAU};

use crate::color::Rgba;
use crate::math::Vec3;

use super::mesh::{uniform_color, Geometry};

/// UV sphere centered on the origin.
///
/// Rows run from the north pole (+Y) to the south pole, columns around the
/// Y axis. The seam column and the pole rows are duplicated so texture
/// coordinates stay continuous: `(rows + 1) * (columns + 1)` vertices.
/// A zero segment count yields an empty mesh.
pub fn sphere(row_segments: u32, column_segments: u32, radius: f32, color: Rgba) -> Geometry {
    if row_segments == 0 || column_segments == 0 {
        return Geometry {
            normal: Some(Vec::new()),
            tex_coord: Some(Vec::new()),
            ..Geometry::default()
        };
    }

    let vertices = (row_segments as usize + 1) * (column_segments as usize + 1);

    let mut position = Vec::with_capacity(vertices * 3);
    let mut normal = Vec::with_capacity(vertices * 3);
    let mut tex_coord = Vec::with_capacity(vertices * 2);

    for i in 0..=row_segments {
        let polar = PI / row_segments as f32 * i as f32;
        let (ps, pc) = polar.sin_cos();

        for j in 0..=column_segments {
            let azimuth = TAU / column_segments as f32 * j as f32;
            let (az_s, az_c) = azimuth.sin_cos();

            let n = Vec3::new(ps * az_c, pc, ps * az_s);
            position.extend_from_slice(&(n * radius).to_array());
            normal.extend_from_slice(&n.to_array());
            tex_coord.extend_from_slice(&[
                1.0 - j as f32 / column_segments as f32,
                i as f32 / row_segments as f32,
            ]);
        }
    }

    let stride = column_segments + 1;
    let mut index = Vec::with_capacity(row_segments as usize * column_segments as usize * 6);
    for i in 0..row_segments {
        for j in 0..column_segments {
            let a = i * stride + j;
            let b = a + stride;
            index.extend_from_slice(&[a, a + 1, b, b, a + 1, b + 1]);
        }
    }

    Geometry {
        position,
        normal: Some(normal),
        color: uniform_color(color.to_array(), vertices),
        tex_coord: Some(tex_coord),
        index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_counts_and_bounds() {
        let g = sphere(8, 16, 2.0, Rgba::white());
        assert_eq!(g.vertex_count(), 9 * 17);
        assert_eq!(g.index.len(), 8 * 16 * 6);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn zero_segments_give_an_empty_mesh() {
        for (rows, cols) in [(0, 8), (8, 0), (0, 0)] {
            let g = sphere(rows, cols, 1.0, Rgba::white());
            assert_eq!(g.vertex_count(), 0);
            assert!(g.index.is_empty());
            assert!(g.validate().is_ok());
        }
    }

    #[test]
    fn one_segment_counts_stay_finite() {
        let g = sphere(1, 1, 1.0, Rgba::white());
        assert_eq!(g.vertex_count(), 4);
        assert!(g.position.iter().all(|v| v.is_finite()));
        assert!(g.tex_coord.unwrap().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let r = 1.5;
        let g = sphere(10, 10, r, Rgba::white());
        for i in 0..g.vertex_count() {
            let p = Vec3::from(g.position_at(i).unwrap());
            assert!((p.length() - r).abs() < 1e-5);
        }
    }

    #[test]
    fn sphere_starts_at_north_pole() {
        let g = sphere(4, 4, 1.0, Rgba::white());
        let top = Vec3::from(g.position_at(0).unwrap());
        assert!((top - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn sphere_triangles_face_outward() {
        let g = sphere(12, 12, 1.0, Rgba::white());
        for tri in g.index.chunks(3) {
            let a = Vec3::from(g.position_at(tri[0] as usize).unwrap());
            let b = Vec3::from(g.position_at(tri[1] as usize).unwrap());
            let c = Vec3::from(g.position_at(tri[2] as usize).unwrap());
            let face = (b - a).cross(c - a);
            // Pole triangles collapse to zero area; skip them.
            if face.length() < 1e-6 {
                continue;
            }
            let centroid = (a + b + c) * (1.0 / 3.0);
            assert!(face.dot(centroid) > 0.0);
        }
    }
}
