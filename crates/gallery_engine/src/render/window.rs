//! Window management using GLFW
//!
//! Creates the OpenGL 3.3 core context, loads the GL function pointers and
//! translates GLFW events into [`ViewerEvent`]s.

use glfw::{Action, Context, Key};
use thiserror::Error;

use crate::input::{InputSource, KeyCode, ViewerEvent};
use crate::render::backend::Viewport;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// GLFW itself could not start
    #[error("GLFW initialization failed: {0}")]
    InitializationFailed(String),

    /// No window with the requested context could be created
    #[error("Window creation failed ({width}x{height} OpenGL 3.3 core)")]
    CreationFailed {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// A required GL entry point did not resolve
    #[error("OpenGL function loading failed: {0} is unavailable")]
    LoaderFailed(&'static str),
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// GLFW window owning the OpenGL context
pub struct GlWindow {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

impl GlWindow {
    /// Create the window, make its context current and load GL
    ///
    /// The cursor is captured for mouse look.
    pub fn new(title: &str, width: u32, height: u32) -> WindowResult<Self> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|e| WindowError::InitializationFailed(format!("{e:?}")))?;

        glfw.window_hint(glfw::WindowHint::ContextVersion(3, 3));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
        #[cfg(target_os = "macos")]
        glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));

        let (mut window, events) = glfw
            .create_window(width, height, title, glfw::WindowMode::Windowed)
            .ok_or(WindowError::CreationFailed { width, height })?;

        window.make_current();
        window.set_framebuffer_size_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_scroll_polling(true);
        window.set_key_polling(true);
        window.set_close_polling(true);
        window.set_cursor_mode(glfw::CursorMode::Disabled);

        gl::load_with(|symbol| window.get_proc_address(symbol) as *const _);
        if !gl::Clear::is_loaded() {
            return Err(WindowError::LoaderFailed("glClear"));
        }

        log::info!("Created {}x{} window \"{}\"", width, height, title);

        Ok(Self { glfw, window, events })
    }

    /// Seconds since GLFW was initialized
    pub fn time(&self) -> f64 {
        self.glfw.get_time()
    }

    /// Whether the window was asked to close
    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// Ask the window to close after the current frame
    pub fn set_should_close(&mut self, should_close: bool) {
        self.window.set_should_close(should_close);
    }

    /// Current framebuffer size in pixels
    pub fn framebuffer_size(&self) -> Viewport {
        let (width, height) = self.window.get_framebuffer_size();
        Viewport::new(
            u32::try_from(width).unwrap_or(0),
            u32::try_from(height).unwrap_or(0),
        )
    }

    /// Present the back buffer
    pub fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    /// Process pending window-system events and return the ones the viewer handles
    pub fn poll_events(&mut self) -> Vec<ViewerEvent> {
        self.glfw.poll_events();
        glfw::flush_messages(&self.events)
            .filter_map(|(_, event)| translate_event(&event))
            .collect()
    }
}

impl InputSource for GlWindow {
    fn is_pressed(&self, key: KeyCode) -> bool {
        self.window.get_key(glfw_key(key)) == Action::Press
    }
}

fn glfw_key(key: KeyCode) -> Key {
    match key {
        KeyCode::W => Key::W,
        KeyCode::A => Key::A,
        KeyCode::S => Key::S,
        KeyCode::D => Key::D,
        KeyCode::M => Key::M,
        KeyCode::N => Key::N,
        KeyCode::B => Key::B,
        KeyCode::Escape => Key::Escape,
    }
}

fn translate_event(event: &glfw::WindowEvent) -> Option<ViewerEvent> {
    match *event {
        glfw::WindowEvent::FramebufferSize(width, height) => Some(ViewerEvent::Resized(
            u32::try_from(width).unwrap_or(0),
            u32::try_from(height).unwrap_or(0),
        )),
        glfw::WindowEvent::CursorPos(x, y) => Some(ViewerEvent::CursorMoved(x, y)),
        glfw::WindowEvent::Scroll(x, y) => Some(ViewerEvent::Scrolled(x, y)),
        glfw::WindowEvent::Close => Some(ViewerEvent::CloseRequested),
        _ => None,
    }
}
