//! Numeric library: 3-vectors and 4x4 matrices.
//!
//! Conventions:
//! - right-handed world space, +Y up
//! - matrices are column-major and act on column vectors
//! - clip-space depth is `0..1` (wgpu)
//!
//! Everything here is a pure function over `Copy` values.

mod mat4;
mod vec3;

pub use mat4::Mat4;
pub use vec3::Vec3;
