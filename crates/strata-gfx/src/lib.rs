//! Strata graphics toolkit.
//!
//! A small drawing substrate over wgpu: WGSL program management with
//! reflected attribute/uniform locations, buffer upload and binding,
//! column-major matrix math, procedural meshes and an orbit camera.
//!
//! The render loop owns one [`GraphicsContext`](device::GraphicsContext)
//! plus the [`ProgramManager`](program::ProgramManager) and
//! [`BufferManager`](buffer::BufferManager) and lends the context to the
//! managers by reference. Nothing is shared across threads.

pub mod buffer;
pub mod camera;
pub mod color;
pub mod device;
pub mod error;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod math;
pub mod program;
pub mod time;

pub use error::{Error, Result};
