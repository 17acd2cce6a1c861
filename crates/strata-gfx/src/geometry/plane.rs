use crate::color::Rgba;

use super::mesh::{uniform_color, Geometry};

/// Axis-aligned rectangle in the z = 0 plane, centered on the origin.
///
/// Vertex order is top-left, top-right, bottom-left, bottom-right. Both
/// triangles wind counter-clockwise seen from +Z, matching the `(0, 0, 1)`
/// normal.
pub fn plane(width: f32, height: f32, color: Rgba) -> Geometry {
    let w = width * 0.5;
    let h = height * 0.5;

    #[rustfmt::skip]
    let position = vec![
        -w,  h, 0.0,
         w,  h, 0.0,
        -w, -h, 0.0,
         w, -h, 0.0,
    ];

    #[rustfmt::skip]
    let normal = vec![
        0.0, 0.0, 1.0,
        0.0, 0.0, 1.0,
        0.0, 0.0, 1.0,
        0.0, 0.0, 1.0,
    ];

    #[rustfmt::skip]
    let tex_coord = vec![
        0.0, 0.0,
        1.0, 0.0,
        0.0, 1.0,
        1.0, 1.0,
    ];

    Geometry {
        position,
        normal: Some(normal),
        color: uniform_color(color.to_array(), 4),
        tex_coord: Some(tex_coord),
        index: vec![0, 2, 1, 1, 2, 3],
    }
}
