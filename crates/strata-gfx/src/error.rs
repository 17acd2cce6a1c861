use crate::program::ShaderStage;

/// Errors surfaced by the toolkit.
///
/// Context, compile and link failures are final for the object being built;
/// nothing here is retried internally. Diagnostics are carried verbatim so
/// the caller can show them as-is.
///
/// Missing attributes and uniforms are not errors: lookups return `None`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("graphics context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("context has no surface to present to")]
    NoSurface,

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("{stage} shader failed to compile:\n{log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("program failed to link:\n{log}")]
    ProgramLink { log: String },

    #[error("invalid handle: {0}")]
    InvalidHandle(String),

    #[error("buffer allocation of {size} bytes failed: {reason}")]
    BufferAllocation { size: u64, reason: String },

    #[error("index {index} exceeds the 16-bit index limit of 65534")]
    IndexOutOfRange { index: u32 },

    #[error("binding mismatch: {buffers} buffers, {locations} locations, {strides} strides")]
    BindingMismatch {
        buffers: usize,
        locations: usize,
        strides: usize,
    },

    #[error("attribute location {location} is bound to more than one vertex buffer")]
    DuplicateLocation { location: u32 },

    #[error("unsupported attribute stride {0} (expected 1..=4 floats)")]
    UnsupportedStride(u32),

    #[error("uniform write of {written} bytes exceeds {available} available bytes")]
    UniformOverflow { written: u64, available: u64 },

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

pub type Result<T> = std::result::Result<T, Error>;
