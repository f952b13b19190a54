//! Viewer bootstrap and lifecycle

use std::path::Path;

use thiserror::Error;

use crate::assets::AssetError;
use crate::config::{ConfigError, ViewerConfig};
use crate::foundation::time::FrameClock;
use crate::input::InputReducer;
use crate::render::backend::Viewport;
use crate::render::context::RenderContext;
use crate::render::frame::{dispatch_events, FrameComposer, ScenePasses};
use crate::render::opengl::{GlBackend, GlCubemap, GlModel, GlShaderProgram, ShaderError};
use crate::render::window::{GlWindow, WindowError};
use crate::render::RenderError;

/// Viewer-level errors
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Window or context creation failed
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// A shader program failed to build
    #[error("Shader error: {0}")]
    Shader(#[from] ShaderError),

    /// The model or a skybox face failed to load
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A frame failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Result type for viewer operations
pub type ViewerResult<T> = Result<T, ViewerError>;

const FPS_LOG_INTERVAL: u64 = 600;

/// A running gallery viewer
///
/// GL resources are declared before the window so they are released while
/// the context still exists.
pub struct Viewer {
    composer: FrameComposer,
    ctx: RenderContext,
    reducer: InputReducer,
    lit_shader: GlShaderProgram,
    skybox_shader: GlShaderProgram,
    model: GlModel,
    skybox: GlCubemap,
    backend: GlBackend,
    window: GlWindow,
}

impl Viewer {
    /// Open the window and load every resource the scene needs
    pub fn start(config: &ViewerConfig) -> ViewerResult<Self> {
        config.validate()?;

        let window = GlWindow::new(&config.window.title, config.window.width, config.window.height)?;
        let viewport = window.framebuffer_size();
        let backend = GlBackend::new(viewport);
        log::info!("OpenGL driver: {}", GlBackend::driver_info());

        let lit_shader = GlShaderProgram::from_sources(&config.shaders.lit)?;
        let skybox_shader = GlShaderProgram::from_sources(&config.shaders.skybox)?;

        let model = GlModel::load(
            &config.scene.model_path,
            config.scene.diffuse_texture.as_deref().map(Path::new),
            config.render.upload_material,
        )?;
        let skybox = GlCubemap::load(&config.scene.skybox_faces)?;

        let lights = config.light_registry();
        log::info!("Registered {} lights", lights.count());

        let ctx = RenderContext::new(config.camera.build(), viewport)
            .with_lights(lights)
            .with_material(config.material())
            .with_clock(FrameClock::starting_at(window.time()));

        // Cursor coordinates are in screen units, not framebuffer pixels.
        let reducer = InputReducer::new(Viewport::new(config.window.width, config.window.height));

        log::info!("Viewer ready");

        Ok(Self {
            composer: FrameComposer::new(config.frame_settings()),
            ctx,
            reducer,
            lit_shader,
            skybox_shader,
            model,
            skybox,
            backend,
            window,
        })
    }

    /// Render frames until the window is asked to close or a frame fails
    pub fn run(&mut self) -> ViewerResult<()> {
        while !self.window.should_close() {
            if let Err(error) = self.update() {
                log::error!("Frame {} failed: {}", self.ctx.clock.frame_count(), error);
                return Err(error);
            }
        }

        log::info!(
            "Viewer closed after {} frames ({:.1}s)",
            self.ctx.clock.frame_count(),
            self.ctx.clock.total_time()
        );
        Ok(())
    }

    /// Run one frame: draw, present, then dispatch window events
    pub fn update(&mut self) -> ViewerResult<()> {
        let now = self.window.time();
        let mut passes = ScenePasses {
            lit_shader: &mut self.lit_shader,
            skybox_shader: &mut self.skybox_shader,
            model: &mut self.model,
            skybox: &mut self.skybox,
        };

        let report = self.composer.run_frame(
            &mut self.ctx,
            now,
            &self.window,
            &mut self.reducer,
            &mut self.backend,
            &mut passes,
        )?;

        self.window.swap_buffers();

        let events = self.window.poll_events();
        let close_from_events = dispatch_events(events, &mut self.ctx, &mut self.reducer, &mut self.backend);

        if report.close_requested || close_from_events {
            self.window.set_should_close(true);
        }

        if self.ctx.clock.frame_count() % FPS_LOG_INTERVAL == 0 {
            log::debug!("{:.1} fps", self.ctx.clock.current_fps());
        }

        Ok(())
    }

    /// Current render state
    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }
}
