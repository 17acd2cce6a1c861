use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowId};

use strata_gfx::device::{ContextInit, GraphicsContext, SurfaceErrorAction};
use strata_gfx::input::platform::winit::translate_window_event;
use strata_gfx::input::InputState;
use strata_gfx::time::FrameClock;
use strata_gfx::Error;

use crate::scene::Scene;

/// Window settings. The window is not resizable.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub size: LogicalSize<f64>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "strata gallery".to_string(),
            size: LogicalSize::new(960.0, 640.0),
        }
    }
}

/// The rendering session: window, context and everything drawn into it.
struct Session {
    window: Arc<Window>,
    ctx: GraphicsContext<'static>,
    scene: Scene,
    input: InputState,
    clock: FrameClock,
}

impl Session {
    fn create(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.size)
            .with_resizable(false);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let ctx = pollster::block_on(GraphicsContext::new(
            window.clone(),
            (size.width, size.height),
            ContextInit::default(),
        ))?;

        let scene = Scene::new(&ctx).context("failed to build the scene")?;

        Ok(Self {
            window,
            ctx,
            scene,
            input: InputState::default(),
            clock: FrameClock::new(),
        })
    }

    /// Draws one frame. Returns `false` when rendering must stop.
    fn redraw(&mut self) -> Result<bool> {
        let time = self.clock.tick();

        let mut frame = match self.ctx.begin_frame() {
            Ok(frame) => frame,
            Err(Error::Surface(e)) => {
                return match self.ctx.handle_surface_error(e.clone()) {
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => Ok(true),
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface lost for good: {e}");
                        Ok(false)
                    }
                };
            }
            Err(e) => return Err(e.into()),
        };

        self.scene.render(&self.ctx, &mut frame, time)?;
        self.ctx.submit(frame);
        Ok(true)
    }
}

/// winit application driving a single gallery window.
pub struct GalleryApp {
    config: WindowConfig,
    session: Option<Session>,
    error: Option<anyhow::Error>,
}

impl GalleryApp {
    pub fn new(config: WindowConfig) -> Self {
        Self {
            config,
            session: None,
            error: None,
        }
    }

    /// The first error that stopped the loop, if any.
    pub fn into_result(self) -> Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error.get_or_insert(error);
        self.session = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for GalleryApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }

        match Session::create(event_loop, &self.config) {
            Ok(session) => {
                session.window.request_redraw();
                self.session = Some(session);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw for the animation.
        if let Some(session) = &self.session {
            session.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.window.id() != window_id {
            return;
        }

        let scale = session.window.scale_factor();
        if let Some(ev) = translate_window_event(scale, &session.input, &event) {
            session.input.apply_event(&ev);
            session.scene.handle_event(&ev);
        }

        match event {
            WindowEvent::CloseRequested => {
                self.session = None;
                event_loop.exit();
            }

            WindowEvent::RedrawRequested => match session.redraw() {
                Ok(true) => {}
                Ok(false) => {
                    self.session = None;
                    event_loop.exit();
                }
                Err(e) => self.fail(event_loop, e),
            },

            _ => {}
        }
    }
}
