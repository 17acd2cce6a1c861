//! Procedural mesh generation.
//!
//! Generators are deterministic: the same parameters always produce the same
//! arrays. Output is a [`Geometry`] ready to hand to the buffer manager.

mod mesh;
mod plane;
mod sphere;
mod torus;

pub use mesh::{Geometry, COLOR_STRIDE, NORMAL_STRIDE, POSITION_STRIDE, TEX_COORD_STRIDE};
pub use plane::plane;
pub use sphere::sphere;
pub use torus::torus;
