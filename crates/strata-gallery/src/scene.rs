use anyhow::{Context, Result};

use strata_gfx::buffer::{BufferBinding, BufferHandle, BufferManager};
use strata_gfx::camera::{OrbitCamera, OrbitCameraConfig};
use strata_gfx::color::Rgba;
use strata_gfx::device::{GpuFrame, GraphicsContext};
use strata_gfx::geometry::{self, Geometry, COLOR_STRIDE, POSITION_STRIDE};
use strata_gfx::input::InputEvent;
use strata_gfx::math::{Mat4, Vec3};
use strata_gfx::program::{
    create_depth_view, PipelineOptions, ProgramHandle, ProgramManager, ShaderStage,
    UniformLocation,
};
use strata_gfx::time::FrameTime;

const VERTEX_SOURCE: &str = include_str!("../shaders/main.vert.wgsl");
const FRAGMENT_SOURCE: &str = include_str!("../shaders/main.frag.wgsl");

const CLEAR: Rgba = Rgba::new(0.02, 0.02, 0.04, 1.0);

const FOVY_DEGREES: f32 = 45.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

/// How a mesh moves over time.
#[derive(Debug, Copy, Clone)]
enum Motion {
    /// Spins around `axis` at `speed` radians per second, placed at `offset`.
    Spin { axis: Vec3, speed: f32, offset: Vec3 },
}

impl Motion {
    fn model(&self, elapsed: f32) -> Mat4 {
        match *self {
            Motion::Spin {
                axis,
                speed,
                offset,
            } => {
                let placed = Mat4::translate(&Mat4::identity(), offset);
                Mat4::rotate(&placed, elapsed * speed, axis)
            }
        }
    }
}

/// One drawable: uploaded buffers, its pipeline and its own uniforms.
struct Mesh {
    name: &'static str,
    motion: Motion,
    binding: BufferBinding,
    pipeline: wgpu::RenderPipeline,
    uniforms: BufferHandle,
    bind_group: wgpu::BindGroup,
}

/// Uniform slots reflected from the linked program.
struct UniformSlots {
    block: UniformLocation,
    mvp: UniformLocation,
    /// `None` when the shaders do not read the time.
    time: Option<UniformLocation>,
}

/// Everything the gallery draws, plus the camera looking at it.
pub struct Scene {
    programs: ProgramManager,
    buffers: BufferManager,
    program: ProgramHandle,
    slots: UniformSlots,
    meshes: Vec<Mesh>,
    camera: OrbitCamera,
    projection: Mat4,
    depth: wgpu::TextureView,
}

impl Scene {
    pub fn new(ctx: &GraphicsContext<'_>) -> Result<Self> {
        let (width, height) = ctx.size().context("scene needs a window surface")?;
        let color_format = ctx
            .surface_format()
            .context("scene needs a window surface")?;

        let mut programs = ProgramManager::new();
        let vs = programs.compile_shader(ctx, VERTEX_SOURCE, ShaderStage::Vertex)?;
        let fs = programs.compile_shader(ctx, FRAGMENT_SOURCE, ShaderStage::Fragment)?;
        let program = programs.link_program(vs, fs)?;
        programs.release_shader(vs)?;
        programs.release_shader(fs)?;

        let slots = UniformSlots {
            block: programs
                .uniform_location(program, "uniforms")?
                .context("shader declares no `uniforms` block")?,
            mvp: programs
                .uniform_location(program, "mvp")?
                .context("shader declares no `mvp` uniform")?,
            time: programs.uniform_location(program, "time")?,
        };

        let projection = Mat4::perspective(FOVY_DEGREES, width as f32 / height as f32, NEAR, FAR)
            .context("invalid projection parameters")?;

        let mut scene = Self {
            programs,
            buffers: BufferManager::new(),
            program,
            slots,
            meshes: Vec::new(),
            camera: OrbitCamera::new(OrbitCameraConfig::default()),
            projection,
            depth: create_depth_view(
                ctx.device(),
                (width, height),
                PipelineOptions::DEFAULT_DEPTH_FORMAT,
                1,
            ),
        };

        let base = PipelineOptions::new(color_format);

        scene.add_mesh(
            ctx,
            "torus",
            &geometry::torus(32, 48, 0.25, 0.75, Rgba::new(0.95, 0.55, 0.15, 1.0)),
            Motion::Spin {
                axis: Vec3::new(1.0, 1.0, 0.0),
                speed: 0.6,
                offset: Vec3::ZERO,
            },
            base.clone().with_label("torus pipeline"),
        )?;

        // The plane is seen from both sides while it spins.
        scene.add_mesh(
            ctx,
            "plane",
            &geometry::plane(1.0, 0.5, Rgba::new(1.0, 0.0, 0.0, 1.0)),
            Motion::Spin {
                axis: Vec3::Y,
                speed: 1.0,
                offset: Vec3::new(0.0, -1.25, 0.0),
            },
            base.with_label("plane pipeline").with_cull_mode(None),
        )?;

        Ok(scene)
    }

    fn add_mesh(
        &mut self,
        ctx: &GraphicsContext<'_>,
        name: &'static str,
        geometry: &Geometry,
        motion: Motion,
        options: PipelineOptions,
    ) -> Result<()> {
        geometry.validate()?;

        let position = self.buffers.create_vertex_buffer(ctx, &geometry.position)?;
        let color = self.buffers.create_vertex_buffer(ctx, &geometry.color)?;
        let index = self.buffers.create_index_buffer(ctx, &geometry.index)?;

        let locations = [
            self.programs.attribute_location(self.program, "position")?,
            self.programs.attribute_location(self.program, "color")?,
        ];
        let binding = self.buffers.bind_buffers(
            &[position, color],
            &locations,
            &[POSITION_STRIDE, COLOR_STRIDE],
            Some(index),
        )?;

        let pipeline = self
            .programs
            .create_pipeline(ctx, self.program, &binding, &options)?;

        let block = self.slots.block;
        let uniforms = self
            .buffers
            .create_uniform_buffer(ctx, u64::from(block.size))?;
        let bind_group =
            self.buffers
                .bind_uniforms(ctx, &pipeline, block.group, &[(block.binding, uniforms)])?;

        log::info!(
            "{name}: {} vertices, {} triangles",
            geometry.vertex_count(),
            geometry.triangle_count()
        );

        self.meshes.push(Mesh {
            name,
            motion,
            binding,
            pipeline,
            uniforms,
            bind_group,
        });
        Ok(())
    }

    /// Forwards pointer input to the camera.
    pub fn handle_event(&mut self, event: &InputEvent) {
        self.camera.handle_event(event);
    }

    /// Writes this frame's uniforms and records the draw into `frame`.
    pub fn render(
        &mut self,
        ctx: &GraphicsContext<'_>,
        frame: &mut GpuFrame,
        time: FrameTime,
    ) -> Result<()> {
        let view = self.camera.update();
        let view_projection = Mat4::multiply(&self.projection, &view);

        for mesh in &self.meshes {
            let model = mesh.motion.model(time.elapsed);
            let mvp = Mat4::multiply(&view_projection, &model);

            self.buffers
                .write_uniform(ctx, mesh.uniforms, &self.slots.mvp, mvp.as_slice())
                .with_context(|| format!("updating {} uniforms", mesh.name))?;
            if let Some(slot) = &self.slots.time {
                self.buffers
                    .write_uniform(ctx, mesh.uniforms, slot, &[time.elapsed])?;
            }
        }

        let mut pass = frame.clear_pass(CLEAR, Some(&self.depth));
        for mesh in &self.meshes {
            pass.set_pipeline(&mesh.pipeline);
            pass.set_bind_group(self.slots.block.group, &mesh.bind_group, &[]);
            mesh.binding.draw(&mut pass);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spin_places_then_rotates() {
        let motion = Motion::Spin {
            axis: Vec3::Y,
            speed: 1.0,
            offset: Vec3::new(0.0, -1.0, 0.0),
        };
        let m = motion.model(std::f32::consts::FRAC_PI_2);
        let p = m.transform_point(Vec3::X);
        // +X rotates to -Z about Y, then moves down.
        assert!((p - Vec3::new(0.0, -1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn motion_at_time_zero_is_a_pure_offset() {
        let offset = Vec3::new(2.0, 0.0, 0.0);
        let motion = Motion::Spin {
            axis: Vec3::Z,
            speed: 3.0,
            offset,
        };
        let p = motion.model(0.0).transform_point(Vec3::ZERO);
        assert!((p - offset).length() < 1e-6);
    }

    #[test]
    fn bundled_shaders_link() {
        use strata_gfx::program::{compile, link};

        let vs = compile(VERTEX_SOURCE, ShaderStage::Vertex).unwrap();
        let fs = compile(FRAGMENT_SOURCE, ShaderStage::Fragment).unwrap();
        let interface = link(&vs, &fs).unwrap();
        assert!(interface.attribute("position").is_some());
        assert!(interface.uniform("time").is_some());
    }
}
