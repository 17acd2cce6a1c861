use crate::error::{Error, Result};

use super::surface;
use super::{ContextInit, GpuFrame, SurfaceErrorAction};

/// Surface bound to a drawable, plus its active configuration.
struct SurfaceState<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
}

/// Owns the wgpu core objects for one rendering session.
///
/// This type is the low-level rendering context:
/// - creates and stores Instance/Adapter/Device/Queue
/// - optionally creates and configures a Surface (swapchain)
/// - acquires frames and provides an encoder + view for rendering
///
/// The render loop owns it exclusively and lends `&GraphicsContext` to the
/// program and buffer managers.
pub struct GraphicsContext<'w> {
    /// Kept alive for the surface's sake.
    #[allow(dead_code)]
    instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: Option<SurfaceState<'w>>,
}

impl<'w> GraphicsContext<'w> {
    /// Creates a context bound to a drawable surface (a window, a canvas).
    ///
    /// `size` is the drawable size in physical pixels. Every failure on the
    /// way (surface, adapter, device, surface formats) is reported as
    /// [`Error::ContextUnavailable`].
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'w>>,
        size: (u32, u32),
        init: ContextInit,
    ) -> Result<Self> {
        let (width, height) = size;
        if width == 0 || height == 0 {
            return Err(Error::ContextUnavailable("surface has zero size".into()));
        }

        let instance = create_instance(&init);

        let surface = instance
            .create_surface(target)
            .map_err(|e| Error::ContextUnavailable(format!("failed to create surface: {e}")))?;

        let (adapter, device, queue) = request_device(&instance, Some(&surface), &init).await?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps, init.prefer_srgb).ok_or_else(|| {
            Error::ContextUnavailable("surface reports no supported formats".into())
        })?;
        let alpha_mode = surface::choose_alpha_mode(&caps, init.alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);
        log::debug!("surface configured: {width}x{height} {format:?} {alpha_mode:?}");

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            surface: Some(SurfaceState { surface, config }),
        })
    }

    /// Returns the adapter description.
    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Limits the device was created with.
    pub fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }

    /// Features the device was created with.
    pub fn features(&self) -> wgpu::Features {
        self.device.features()
    }

    /// Runs `f` with validation errors captured instead of raised.
    ///
    /// Returns the value built by `f` and the first validation error the
    /// device reported while it ran. Without the scope, wgpu hands such
    /// errors to its uncaptured-error handler, which panics.
    pub fn capture_validation<T>(
        &self,
        f: impl FnOnce(&wgpu::Device) -> T,
    ) -> (T, Option<wgpu::Error>) {
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = f(&self.device);
        let error = pollster::block_on(scope.pop());
        (value, error)
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Returns the surface format, or `None` for a headless context.
    pub fn surface_format(&self) -> Option<wgpu::TextureFormat> {
        self.surface.as_ref().map(|s| s.config.format)
    }

    /// Returns the drawable size in physical pixels, or `None` when headless.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.surface
            .as_ref()
            .map(|s| (s.config.width, s.config.height))
    }

    /// Acquires the next surface texture and creates an encoder.
    ///
    /// The returned frame owns the surface texture; hand it back to
    /// [`GraphicsContext::submit`] to present it.
    pub fn begin_frame(&self) -> Result<GpuFrame> {
        let state = self.surface.as_ref().ok_or(Error::NoSurface)?;

        let surface_texture = state.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("strata frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands for the given frame and presents it.
    pub fn submit(&self, frame: GpuFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        drop(frame.view);
        frame.surface_texture.present();
    }

    /// Converts a `SurfaceError` into a higher-level action.
    ///
    /// Headless contexts have nothing to recover and report `Fatal`.
    pub fn handle_surface_error(&self, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        match &self.surface {
            Some(state) => {
                surface::map_surface_error(&state.surface, &self.device, &state.config, err)
            }
            None => SurfaceErrorAction::Fatal,
        }
    }
}

impl GraphicsContext<'static> {
    /// Creates a context without a surface.
    ///
    /// Used for offscreen work and tests; [`GraphicsContext::begin_frame`]
    /// returns [`Error::NoSurface`].
    pub async fn headless(init: ContextInit) -> Result<Self> {
        let instance = create_instance(&init);
        let (adapter, device, queue) = request_device(&instance, None, &init).await?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            surface: None,
        })
    }
}

fn create_instance(init: &ContextInit) -> wgpu::Instance {
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: init.backends,
        ..Default::default()
    })
}

async fn request_device(
    instance: &wgpu::Instance,
    compatible_surface: Option<&wgpu::Surface<'_>>,
    init: &ContextInit,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: init.power_preference,
            compatible_surface,
            force_fallback_adapter: init.force_fallback_adapter,
        })
        .await
        .map_err(|e| Error::ContextUnavailable(format!("no suitable GPU adapter: {e}")))?;

    let info = adapter.get_info();
    log::info!("using adapter {} ({:?})", info.name, info.backend);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("strata device"),
            required_features: init.required_features,
            required_limits: init.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .map_err(|e| Error::ContextUnavailable(format!("failed to create device: {e}")))?;

    Ok((adapter, device, queue))
}
