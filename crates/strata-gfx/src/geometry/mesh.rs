use crate::error::{Error, Result};

/// Per-vertex float counts of each attribute array.
pub const POSITION_STRIDE: u32 = 3;
pub const NORMAL_STRIDE: u32 = 3;
pub const COLOR_STRIDE: u32 = 4;
pub const TEX_COORD_STRIDE: u32 = 2;

/// CPU-side mesh as parallel attribute arrays.
///
/// Every generator returns this one type. Arrays are packed, one entry per
/// vertex, with the strides above. `index` holds triangle triples.
///
/// Invariants (checked by [`Geometry::validate`]):
/// - all present per-vertex arrays describe the same vertex count
/// - every index is `< vertex_count()`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub position: Vec<f32>,
    pub normal: Option<Vec<f32>>,
    pub color: Vec<f32>,
    pub tex_coord: Option<Vec<f32>>,
    pub index: Vec<u32>,
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.position.len() / POSITION_STRIDE as usize
    }

    pub fn triangle_count(&self) -> usize {
        self.index.len() / 3
    }

    /// Returns the position of vertex `i` as `[x, y, z]`.
    pub fn position_at(&self, i: usize) -> Option<[f32; 3]> {
        let s = i * POSITION_STRIDE as usize;
        self.position.get(s..s + 3).map(|p| [p[0], p[1], p[2]])
    }

    pub fn validate(&self) -> Result<()> {
        if self.position.len() % POSITION_STRIDE as usize != 0 {
            return Err(Error::InvalidGeometry(format!(
                "position length {} is not a multiple of {POSITION_STRIDE}",
                self.position.len()
            )));
        }
        let vertices = self.vertex_count();

        check_array("color", self.color.len(), COLOR_STRIDE, vertices)?;
        if let Some(normal) = &self.normal {
            check_array("normal", normal.len(), NORMAL_STRIDE, vertices)?;
        }
        if let Some(tex_coord) = &self.tex_coord {
            check_array("tex_coord", tex_coord.len(), TEX_COORD_STRIDE, vertices)?;
        }

        if self.index.len() % 3 != 0 {
            return Err(Error::InvalidGeometry(format!(
                "index length {} is not a multiple of 3",
                self.index.len()
            )));
        }
        if let Some(bad) = self.index.iter().find(|&&i| i as usize >= vertices) {
            return Err(Error::InvalidGeometry(format!(
                "index {bad} out of range for {vertices} vertices"
            )));
        }

        Ok(())
    }
}

fn check_array(name: &str, len: usize, stride: u32, vertices: usize) -> Result<()> {
    let expected = vertices * stride as usize;
    if len != expected {
        return Err(Error::InvalidGeometry(format!(
            "{name} has {len} floats, expected {expected} ({vertices} vertices x {stride})"
        )));
    }
    Ok(())
}

/// Repeats `color` once per vertex.
pub(super) fn uniform_color(color: [f32; 4], vertices: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(vertices * COLOR_STRIDE as usize);
    for _ in 0..vertices {
        out.extend_from_slice(&color);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Geometry {
        Geometry {
            position: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            normal: None,
            color: uniform_color([1.0; 4], 3),
            tex_coord: None,
            index: vec![0, 1, 2],
        }
    }

    #[test]
    fn valid_triangle_passes() {
        let g = triangle();
        assert!(g.validate().is_ok());
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.triangle_count(), 1);
        assert_eq!(g.position_at(1), Some([1.0, 0.0, 0.0]));
        assert_eq!(g.position_at(3), None);
    }

    #[test]
    fn index_past_vertex_count_is_rejected() {
        let mut g = triangle();
        g.index = vec![0, 1, 3];
        assert!(matches!(g.validate(), Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn short_color_array_is_rejected() {
        let mut g = triangle();
        g.color.truncate(8);
        assert!(matches!(g.validate(), Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn mismatched_optional_array_is_rejected() {
        let mut g = triangle();
        g.tex_coord = Some(vec![0.0; 4]);
        assert!(g.validate().is_err());
        g.tex_coord = Some(vec![0.0; 6]);
        assert!(g.validate().is_ok());
    }
}
