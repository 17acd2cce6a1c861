use std::collections::HashMap;

use crate::buffer::BufferBinding;
use crate::device::GraphicsContext;
use crate::error::{Error, Result};

use super::compile::{self, CompiledShader};
use super::interface::{AttributeLocation, ProgramInterface, UniformLocation};
use super::pipeline::PipelineOptions;
use super::ShaderStage;

/// Opaque handle to a compiled shader owned by a [`ProgramManager`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ShaderHandle(pub(crate) u32);

/// Opaque handle to a linked program owned by a [`ProgramManager`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramHandle(pub(crate) u32);

/// Where a live shader is in its lifecycle.
///
/// Failed compiles never produce a handle, so there is no failed state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStatus {
    Compiled,
    /// Used by at least one successful link.
    Linked,
}

struct ShaderEntry {
    compiled: CompiledShader,
    module: wgpu::ShaderModule,
    status: ShaderStatus,
}

struct ProgramEntry {
    vertex_module: wgpu::ShaderModule,
    vertex_entry: String,
    fragment_module: wgpu::ShaderModule,
    fragment_entry: String,
    interface: ProgramInterface,
}

/// Compiles shaders, links programs and answers location queries.
///
/// Programs keep their own references to the shader modules, so releasing a
/// shader after linking does not affect programs built from it.
#[derive(Default)]
pub struct ProgramManager {
    shaders: HashMap<ShaderHandle, ShaderEntry>,
    programs: HashMap<ProgramHandle, ProgramEntry>,
    next_id: u32,
}

impl ProgramManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles WGSL `source` for `stage`.
    ///
    /// The source is validated by naga against the device's features before
    /// the device sees it, and the device's own validation is captured too.
    /// On failure the error carries the diagnostic text and no handle is
    /// created.
    pub fn compile_shader(
        &mut self,
        ctx: &GraphicsContext<'_>,
        source: &str,
        stage: ShaderStage,
    ) -> Result<ShaderHandle> {
        let capabilities = compile::device_capabilities(ctx.features());
        let compiled = match compile::compile_with(source, stage, capabilities) {
            Ok(c) => c,
            Err(e) => {
                log::debug!("{stage} shader rejected: {e}");
                return Err(e);
            }
        };

        let label = format!("strata {stage} shader");
        let (module, rejected) = ctx.capture_validation(|device| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
        });
        if let Some(e) = rejected {
            log::debug!("{stage} shader rejected by the device: {e}");
            return Err(Error::ShaderCompile {
                stage,
                log: e.to_string(),
            });
        }

        let handle = ShaderHandle(self.alloc_id());
        self.shaders.insert(
            handle,
            ShaderEntry {
                compiled,
                module,
                status: ShaderStatus::Compiled,
            },
        );
        Ok(handle)
    }

    /// Links a vertex and a fragment shader into a program.
    pub fn link_program(
        &mut self,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> Result<ProgramHandle> {
        let vs = self.shader(vertex)?;
        let fs = self.shader(fragment)?;

        let interface = compile::link(&vs.compiled, &fs.compiled)?;
        let entry = ProgramEntry {
            vertex_module: vs.module.clone(),
            vertex_entry: vs.compiled.entry_point.clone(),
            fragment_module: fs.module.clone(),
            fragment_entry: fs.compiled.entry_point.clone(),
            interface,
        };

        for h in [vertex, fragment] {
            if let Some(s) = self.shaders.get_mut(&h) {
                s.status = ShaderStatus::Linked;
            }
        }

        let handle = ProgramHandle(self.alloc_id());
        log::debug!(
            "linked program {} ({} attributes, {} uniform names)",
            handle.0,
            entry.interface.attributes.len(),
            entry.interface.uniforms.len()
        );
        self.programs.insert(handle, entry);
        Ok(handle)
    }

    /// Location of the vertex input `name`, or `None` if the vertex stage
    /// does not declare it.
    pub fn attribute_location(
        &self,
        program: ProgramHandle,
        name: &str,
    ) -> Result<Option<AttributeLocation>> {
        Ok(self.program(program)?.interface.attribute(name))
    }

    /// Location of the uniform (or uniform struct member) `name`, or `None`
    /// if no stage uses it.
    pub fn uniform_location(
        &self,
        program: ProgramHandle,
        name: &str,
    ) -> Result<Option<UniformLocation>> {
        Ok(self.program(program)?.interface.uniform(name))
    }

    pub fn interface(&self, program: ProgramHandle) -> Result<&ProgramInterface> {
        Ok(&self.program(program)?.interface)
    }

    pub fn shader_status(&self, shader: ShaderHandle) -> Option<ShaderStatus> {
        self.shaders.get(&shader).map(|s| s.status)
    }

    /// Builds a render pipeline drawing `program` with the buffers of
    /// `binding`.
    ///
    /// Every vertex input of the program must be an `f32` attribute fed by a
    /// slot of the binding. Bind group layouts are derived from the shaders.
    /// Anything else the device rejects comes back as [`Error::ProgramLink`].
    pub fn create_pipeline(
        &self,
        ctx: &GraphicsContext<'_>,
        program: ProgramHandle,
        binding: &BufferBinding,
        options: &PipelineOptions,
    ) -> Result<wgpu::RenderPipeline> {
        let entry = self.program(program)?;

        let mut problems = Vec::new();
        for (name, loc) in &entry.interface.attributes {
            if !binding.provides(loc.index) {
                problems.push(format!(
                    "attribute `{name}` at location {} has no vertex buffer",
                    loc.index
                ));
            } else if !loc.accepts_f32() {
                problems.push(format!(
                    "attribute `{name}` at location {} is {:?}; vertex buffers carry f32",
                    loc.index, loc.scalar.kind
                ));
            }
        }
        if !problems.is_empty() {
            return Err(Error::ProgramLink {
                log: problems.join("\n"),
            });
        }

        let buffers = binding.vertex_layouts();
        let targets = [Some(options.color_target())];

        let (pipeline, rejected) = ctx.capture_validation(|device| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: options.label.as_deref(),
                layout: None,
                vertex: wgpu::VertexState {
                    module: &entry.vertex_module,
                    entry_point: Some(&entry.vertex_entry),
                    compilation_options: Default::default(),
                    buffers: &buffers,
                },
                fragment: Some(wgpu::FragmentState {
                    module: &entry.fragment_module,
                    entry_point: Some(&entry.fragment_entry),
                    compilation_options: Default::default(),
                    targets: &targets,
                }),
                primitive: options.primitive(),
                depth_stencil: options.depth_stencil(),
                multisample: wgpu::MultisampleState {
                    count: options.sample_count,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview_mask: None,
                cache: None,
            })
        });
        if let Some(e) = rejected {
            return Err(Error::ProgramLink { log: e.to_string() });
        }

        log::debug!("created pipeline for program {}", program.0);
        Ok(pipeline)
    }

    /// Drops a shader. Programs already linked from it keep working.
    pub fn release_shader(&mut self, shader: ShaderHandle) -> Result<()> {
        self.shaders
            .remove(&shader)
            .map(|_| ())
            .ok_or_else(|| Error::InvalidHandle(format!("shader {}", shader.0)))
    }

    pub fn release_program(&mut self, program: ProgramHandle) -> Result<()> {
        self.programs
            .remove(&program)
            .map(|_| ())
            .ok_or_else(|| Error::InvalidHandle(format!("program {}", program.0)))
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn shader(&self, handle: ShaderHandle) -> Result<&ShaderEntry> {
        self.shaders
            .get(&handle)
            .ok_or_else(|| Error::InvalidHandle(format!("shader {}", handle.0)))
    }

    fn program(&self, handle: ProgramHandle) -> Result<&ProgramEntry> {
        self.programs
            .get(&handle)
            .ok_or_else(|| Error::InvalidHandle(format!("program {}", handle.0)))
    }
}
