/// One vertex buffer feeding one shader location.
#[derive(Debug, Clone)]
pub struct VertexSlot {
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) attributes: [wgpu::VertexAttribute; 1],
    pub(crate) array_stride: u64,
    pub(crate) vertex_count: u32,
}

impl VertexSlot {
    pub fn shader_location(&self) -> u32 {
        self.attributes[0].shader_location
    }

    pub fn format(&self) -> wgpu::VertexFormat {
        self.attributes[0].format
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

/// Resolved draw inputs produced by [`BufferManager::bind_buffers`].
///
/// Holds its own references to the GPU buffers, so releasing a handle does
/// not invalidate a binding made before the release. Slot `i` of the
/// binding is vertex buffer slot `i` of the pipeline.
///
/// [`BufferManager::bind_buffers`]: super::BufferManager::bind_buffers
#[derive(Debug, Clone, Default)]
pub struct BufferBinding {
    pub(crate) slots: Vec<VertexSlot>,
    pub(crate) index: Option<(wgpu::Buffer, u32)>,
}

impl BufferBinding {
    pub fn slots(&self) -> &[VertexSlot] {
        &self.slots
    }

    /// Vertex buffer layouts in slot order, for pipeline creation.
    pub fn vertex_layouts(&self) -> Vec<wgpu::VertexBufferLayout<'_>> {
        self.slots
            .iter()
            .map(|s| wgpu::VertexBufferLayout {
                array_stride: s.array_stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &s.attributes,
            })
            .collect()
    }

    /// Whether some slot feeds `location`.
    pub fn provides(&self, location: u32) -> bool {
        self.slots.iter().any(|s| s.shader_location() == location)
    }

    /// Vertices every bound buffer can supply.
    pub fn vertex_count(&self) -> u32 {
        self.slots.iter().map(|s| s.vertex_count).min().unwrap_or(0)
    }

    pub fn index_count(&self) -> Option<u32> {
        self.index.as_ref().map(|(_, n)| *n)
    }

    /// Sets the vertex buffers and the index buffer on `pass`.
    pub fn apply(&self, pass: &mut wgpu::RenderPass<'_>) {
        for (slot, s) in self.slots.iter().enumerate() {
            pass.set_vertex_buffer(slot as u32, s.buffer.slice(..));
        }
        if let Some((buffer, _)) = &self.index {
            pass.set_index_buffer(buffer.slice(..), wgpu::IndexFormat::Uint16);
        }
    }

    /// Applies the binding and issues one draw covering all of it.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.apply(pass);
        match self.index_count() {
            Some(n) => pass.draw_indexed(0..n, 0, 0..1),
            None => pass.draw(0..self.vertex_count(), 0..1),
        }
    }
}
