//! GPU buffer upload and vertex binding.
//!
//! Vertex data goes up as packed `f32` arrays with no stored layout; the
//! layout is supplied again at bind time together with the attribute
//! locations reflected from a linked program.

mod binding;
pub mod layout;
mod manager;

pub use binding::{BufferBinding, VertexSlot};
pub use manager::{BufferHandle, BufferKind, BufferManager};
