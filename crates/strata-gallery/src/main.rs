//! Orbitable gallery of procedural meshes drawn with strata-gfx.
//!
//! Drag with the left mouse button to orbit, scroll to zoom.

mod app;
mod scene;

use anyhow::{Context, Result};
use winit::event_loop::EventLoop;

use strata_gfx::logging::{init_logging, LoggingConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut app = app::GalleryApp::new(app::WindowConfig::default());

    event_loop
        .run_app(&mut app)
        .context("winit event loop terminated with error")?;

    app.into_result()
}
