//! Shader compilation, program linking and pipeline creation.
//!
//! Shaders are WGSL. naga parses, validates and reflects each stage before a
//! module reaches the device, so compile and link failures come back as
//! [`Error`](crate::Error) values with readable diagnostics. Device calls
//! that can still fail validation run inside an error scope.

mod compile;
mod interface;
mod manager;
mod pipeline;
mod stage;

pub use compile::{compile, compile_with, device_capabilities, link, CompiledShader, UniformVar};
pub use interface::{AttributeLocation, IoType, ProgramInterface, StageVar, UniformLocation};
pub use manager::{ProgramHandle, ProgramManager, ShaderHandle, ShaderStatus};
pub use pipeline::{create_depth_view, PipelineOptions};
pub use stage::ShaderStage;
