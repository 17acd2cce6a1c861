use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::device::GraphicsContext;
use crate::error::{Error, Result};
use crate::program::{AttributeLocation, UniformLocation};

use super::binding::{BufferBinding, VertexSlot};
use super::layout;

/// What a buffer was created for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferKind {
    Vertex,
    Index,
    Uniform,
}

/// Opaque handle to a buffer owned by a [`BufferManager`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferHandle {
    pub(crate) id: u32,
    pub(crate) kind: BufferKind,
}

impl BufferHandle {
    pub fn kind(&self) -> BufferKind {
        self.kind
    }
}

struct BufferEntry {
    buffer: wgpu::Buffer,
    /// Size of the uploaded data in bytes, before any copy padding.
    size: u64,
    /// Floats for vertex buffers, indices for index buffers.
    elements: u64,
}

/// Owns every GPU buffer of a rendering session.
///
/// Vertex and index buffers are immutable after upload; a change needs a
/// fresh upload. Uniform buffers are written in place with
/// [`BufferManager::write_uniform`].
#[derive(Default)]
pub struct BufferManager {
    buffers: HashMap<BufferHandle, BufferEntry>,
    next_id: u32,
}

impl BufferManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn contains(&self, handle: BufferHandle) -> bool {
        self.buffers.contains_key(&handle)
    }

    /// Uploads packed vertex floats.
    ///
    /// No stride is recorded: the stride given to [`bind_buffers`] must match
    /// the packing used here.
    ///
    /// [`bind_buffers`]: BufferManager::bind_buffers
    pub fn create_vertex_buffer(
        &mut self,
        ctx: &GraphicsContext<'_>,
        data: &[f32],
    ) -> Result<BufferHandle> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        self.upload(
            ctx,
            BufferKind::Vertex,
            bytes,
            data.len() as u64,
            wgpu::BufferUsages::VERTEX,
        )
    }

    /// Uploads triangle indices as 16-bit values.
    pub fn create_index_buffer(
        &mut self,
        ctx: &GraphicsContext<'_>,
        data: &[u32],
    ) -> Result<BufferHandle> {
        let packed = layout::pack_indices(data)?;
        self.upload(
            ctx,
            BufferKind::Index,
            bytemuck::cast_slice(&packed),
            packed.len() as u64,
            wgpu::BufferUsages::INDEX,
        )
    }

    /// Creates a zeroed uniform buffer of at least `size` bytes.
    ///
    /// The size is rounded up to 16 bytes, the uniform alignment of WGSL
    /// structs.
    pub fn create_uniform_buffer(
        &mut self,
        ctx: &GraphicsContext<'_>,
        size: u64,
    ) -> Result<BufferHandle> {
        let padded = wgpu::util::align_to(size, 16);
        layout::check_allocation(padded, ctx.limits().max_buffer_size)?;
        if padded > u64::from(ctx.limits().max_uniform_buffer_binding_size) {
            return Err(Error::BufferAllocation {
                size: padded,
                reason: "exceeds the uniform binding limit".into(),
            });
        }

        let buffer = ctx.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("strata uniform buffer"),
            size: padded,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(self.insert(BufferKind::Uniform, buffer, padded, padded / 4))
    }

    /// Writes `data` at the reflected `location` of a uniform buffer.
    ///
    /// The write lands in the queue and takes effect at the next submit.
    pub fn write_uniform(
        &self,
        ctx: &GraphicsContext<'_>,
        handle: BufferHandle,
        location: &UniformLocation,
        data: &[f32],
    ) -> Result<()> {
        let entry = self.get(handle, BufferKind::Uniform)?;

        let written = std::mem::size_of_val(data) as u64;
        let available = u64::from(location.size)
            .min(entry.size.saturating_sub(u64::from(location.offset)));
        if written > available {
            return Err(Error::UniformOverflow { written, available });
        }

        ctx.queue().write_buffer(
            &entry.buffer,
            u64::from(location.offset),
            bytemuck::cast_slice(data),
        );
        Ok(())
    }

    /// Creates the bind group for `group` of `pipeline` from uniform buffers.
    ///
    /// `entries` pairs each `@binding` index with the buffer bound there.
    pub fn bind_uniforms(
        &self,
        ctx: &GraphicsContext<'_>,
        pipeline: &wgpu::RenderPipeline,
        group: u32,
        entries: &[(u32, BufferHandle)],
    ) -> Result<wgpu::BindGroup> {
        let mut bind_entries = Vec::with_capacity(entries.len());
        for (binding, handle) in entries {
            let entry = self.get(*handle, BufferKind::Uniform)?;
            bind_entries.push(wgpu::BindGroupEntry {
                binding: *binding,
                resource: entry.buffer.as_entire_binding(),
            });
        }

        let layout = pipeline.get_bind_group_layout(group);
        Ok(ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("strata uniform bind group"),
            layout: &layout,
            entries: &bind_entries,
        }))
    }

    /// Pairs vertex buffers with attribute locations and per-vertex strides.
    ///
    /// `handles`, `locations` and `strides` are parallel. A `None` location
    /// means the shader does not use that attribute; its buffer and stride
    /// are skipped unchecked. Strides are float counts (1 to 4). Each
    /// location may be fed by one buffer only.
    pub fn bind_buffers(
        &self,
        handles: &[BufferHandle],
        locations: &[Option<AttributeLocation>],
        strides: &[u32],
        index: Option<BufferHandle>,
    ) -> Result<BufferBinding> {
        if handles.len() != locations.len() || handles.len() != strides.len() {
            return Err(Error::BindingMismatch {
                buffers: handles.len(),
                locations: locations.len(),
                strides: strides.len(),
            });
        }

        let mut slots = Vec::with_capacity(handles.len());
        for ((handle, location), &stride) in handles.iter().zip(locations).zip(strides) {
            let Some(location) = location else {
                log::trace!("buffer {} has no attribute location; not bound", handle.id);
                continue;
            };

            let entry = self.get(*handle, BufferKind::Vertex)?;
            let format = layout::vertex_format(stride)?;
            if slots.iter().any(|s: &VertexSlot| s.shader_location() == location.index) {
                return Err(Error::DuplicateLocation {
                    location: location.index,
                });
            }

            if location.components != stride {
                log::warn!(
                    "attribute at location {} declares {} components but is bound with stride {}",
                    location.index,
                    location.components,
                    stride
                );
            }

            slots.push(VertexSlot {
                buffer: entry.buffer.clone(),
                attributes: [wgpu::VertexAttribute {
                    format,
                    offset: 0,
                    shader_location: location.index,
                }],
                array_stride: format.size(),
                vertex_count: layout::vertex_count(entry.elements, stride),
            });
        }

        let index = match index {
            Some(handle) => {
                let entry = self.get(handle, BufferKind::Index)?;
                Some((entry.buffer.clone(), entry.elements as u32))
            }
            None => None,
        };

        Ok(BufferBinding { slots, index })
    }

    /// Destroys the buffer behind `handle`.
    ///
    /// Bindings made earlier keep the GPU memory alive until they drop.
    pub fn release(&mut self, handle: BufferHandle) -> Result<()> {
        let entry = self
            .buffers
            .remove(&handle)
            .ok_or_else(|| Error::InvalidHandle(format!("buffer {}", handle.id)))?;
        log::debug!("released {:?} buffer {} ({} bytes)", handle.kind, handle.id, entry.size);
        Ok(())
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn upload(
        &mut self,
        ctx: &GraphicsContext<'_>,
        kind: BufferKind,
        bytes: &[u8],
        elements: u64,
        usage: wgpu::BufferUsages,
    ) -> Result<BufferHandle> {
        let size = bytes.len() as u64;
        layout::check_allocation(size, ctx.limits().max_buffer_size)?;

        let buffer = ctx
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(match kind {
                    BufferKind::Vertex => "strata vertex buffer",
                    BufferKind::Index => "strata index buffer",
                    BufferKind::Uniform => "strata uniform buffer",
                }),
                contents: bytes,
                usage,
            });

        Ok(self.insert(kind, buffer, size, elements))
    }

    fn insert(&mut self, kind: BufferKind, buffer: wgpu::Buffer, size: u64, elements: u64) -> BufferHandle {
        let handle = BufferHandle {
            id: self.next_id,
            kind,
        };
        self.next_id += 1;
        self.buffers.insert(
            handle,
            BufferEntry {
                buffer,
                size,
                elements,
            },
        );
        log::debug!("uploaded {kind:?} buffer {} ({size} bytes)", handle.id);
        handle
    }

    fn get(&self, handle: BufferHandle, expected: BufferKind) -> Result<&BufferEntry> {
        if handle.kind != expected {
            return Err(Error::InvalidHandle(format!(
                "buffer {} is a {:?} buffer, expected {:?}",
                handle.id, handle.kind, expected
            )));
        }
        self.buffers
            .get(&handle)
            .ok_or_else(|| Error::InvalidHandle(format!("buffer {}", handle.id)))
    }
}
