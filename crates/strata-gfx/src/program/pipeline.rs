/// Fixed-function state for [`ProgramManager::create_pipeline`].
///
/// Defaults draw opaque, depth-tested triangle lists with back faces culled
/// and counter-clockwise front faces.
///
/// [`ProgramManager::create_pipeline`]: super::ProgramManager::create_pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub label: Option<String>,
    pub color_format: wgpu::TextureFormat,
    pub blend: Option<wgpu::BlendState>,
    /// `None` disables the depth test.
    pub depth_format: Option<wgpu::TextureFormat>,
    pub depth_compare: wgpu::CompareFunction,
    pub topology: wgpu::PrimitiveTopology,
    pub front_face: wgpu::FrontFace,
    pub cull_mode: Option<wgpu::Face>,
    pub sample_count: u32,
}

impl PipelineOptions {
    pub const DEFAULT_DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    pub fn new(color_format: wgpu::TextureFormat) -> Self {
        Self {
            label: None,
            color_format,
            blend: Some(wgpu::BlendState::REPLACE),
            depth_format: Some(Self::DEFAULT_DEPTH_FORMAT),
            depth_compare: wgpu::CompareFunction::Less,
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            sample_count: 1,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_depth(mut self, format: Option<wgpu::TextureFormat>) -> Self {
        self.depth_format = format;
        self
    }

    pub fn with_cull_mode(mut self, cull_mode: Option<wgpu::Face>) -> Self {
        self.cull_mode = cull_mode;
        self
    }

    pub fn with_blend(mut self, blend: Option<wgpu::BlendState>) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_topology(mut self, topology: wgpu::PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    pub(crate) fn primitive(&self) -> wgpu::PrimitiveState {
        let strip_index_format = match self.topology {
            wgpu::PrimitiveTopology::LineStrip | wgpu::PrimitiveTopology::TriangleStrip => {
                Some(wgpu::IndexFormat::Uint16)
            }
            _ => None,
        };
        wgpu::PrimitiveState {
            topology: self.topology,
            strip_index_format,
            front_face: self.front_face,
            cull_mode: self.cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        }
    }

    pub(crate) fn depth_stencil(&self) -> Option<wgpu::DepthStencilState> {
        self.depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: self.depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        })
    }

    pub(crate) fn color_target(&self) -> wgpu::ColorTargetState {
        wgpu::ColorTargetState {
            format: self.color_format,
            blend: self.blend,
            write_mask: wgpu::ColorWrites::ALL,
        }
    }
}

/// Creates a depth attachment matching a drawable of `size` pixels.
pub fn create_depth_view(
    device: &wgpu::Device,
    size: (u32, u32),
    format: wgpu::TextureFormat,
    sample_count: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("strata depth texture"),
        size: wgpu::Extent3d {
            width: size.0.max(1),
            height: size.1.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cull_back_faces_and_test_depth() {
        let o = PipelineOptions::new(wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!(o.cull_mode, Some(wgpu::Face::Back));
        assert_eq!(o.front_face, wgpu::FrontFace::Ccw);
        let depth = o.depth_stencil().unwrap();
        assert_eq!(depth.format, wgpu::TextureFormat::Depth24Plus);
        assert_eq!(depth.depth_compare, wgpu::CompareFunction::Less);
        assert_eq!(o.primitive().strip_index_format, None);
    }

    #[test]
    fn builders_override_defaults() {
        let o = PipelineOptions::new(wgpu::TextureFormat::Rgba8Unorm)
            .with_depth(None)
            .with_cull_mode(None)
            .with_topology(wgpu::PrimitiveTopology::TriangleStrip)
            .with_label("grid");
        assert!(o.depth_stencil().is_none());
        assert_eq!(o.primitive().cull_mode, None);
        assert_eq!(o.primitive().strip_index_format, Some(wgpu::IndexFormat::Uint16));
        assert_eq!(o.label.as_deref(), Some("grid"));
        assert_eq!(o.color_target().format, wgpu::TextureFormat::Rgba8Unorm);
    }
}
