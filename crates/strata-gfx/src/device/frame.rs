use crate::color::Rgba;

/// One acquired surface frame and the encoder recording into it.
///
/// Hand it back to [`GraphicsContext::submit`] promptly: while it is alive
/// the next surface texture cannot be acquired.
///
/// [`GraphicsContext::submit`]: super::GraphicsContext::submit
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl GpuFrame {
    /// Begins a pass that clears the frame to `clear` and, when a depth view
    /// is given, clears depth to 1.0.
    pub fn clear_pass<'a>(
        &'a mut self,
        clear: Rgba,
        depth: Option<&'a wgpu::TextureView>,
    ) -> wgpu::RenderPass<'a> {
        begin_clear_pass(&mut self.encoder, &self.view, clear, depth)
    }
}

/// Begins a clearing render pass on any color target.
///
/// Offscreen rendering uses this with its own texture view.
pub fn begin_clear_pass<'a>(
    encoder: &'a mut wgpu::CommandEncoder,
    color: &'a wgpu::TextureView,
    clear: Rgba,
    depth: Option<&'a wgpu::TextureView>,
) -> wgpu::RenderPass<'a> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("strata clear pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: color,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear.into()),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: depth.map(|view| wgpu::RenderPassDepthStencilAttachment {
            view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}
