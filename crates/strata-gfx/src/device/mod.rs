//! Graphics context: wgpu device and queue, plus a configured surface when
//! rendering to a window. Headless contexts serve tests and offscreen work.

mod context;
mod frame;
mod init;
mod surface;

pub use context::GraphicsContext;
pub use frame::{begin_clear_pass, GpuFrame};
pub use init::ContextInit;
pub use surface::SurfaceErrorAction;
