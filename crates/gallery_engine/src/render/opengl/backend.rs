//! Raw OpenGL pipeline state

use gl::types::{GLenum, GLsizei};

use crate::foundation::math::Vec4;
use crate::render::backend::{BackendResult, PolygonMode, RenderBackend, Viewport};
use crate::render::RenderError;

/// OpenGL implementation of [`RenderBackend`]
///
/// Requires a current context with loaded function pointers.
#[derive(Debug)]
pub struct GlBackend {
    polygon_mode: Option<PolygonMode>,
}

impl GlBackend {
    /// Enable depth testing and alpha blending and set the viewport
    pub fn new(viewport: Viewport) -> Self {
        unsafe {
            gl::Enable(gl::DEPTH_TEST);
            gl::Enable(gl::BLEND);
            gl::BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
            // RGB faces are tightly packed.
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
        }

        let mut backend = Self { polygon_mode: None };
        backend.set_viewport(viewport);
        backend
    }

    /// Driver vendor, renderer and version strings
    pub fn driver_info() -> String {
        let read = |name: GLenum| unsafe {
            let ptr = gl::GetString(name);
            if ptr.is_null() {
                String::from("unknown")
            } else {
                std::ffi::CStr::from_ptr(ptr.cast()).to_string_lossy().into_owned()
            }
        };
        format!("{} / {} / {}", read(gl::VENDOR), read(gl::RENDERER), read(gl::VERSION))
    }
}

impl RenderBackend for GlBackend {
    fn clear(&mut self, color: Vec4) {
        unsafe {
            gl::ClearColor(color.x, color.y, color.z, color.w);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) {
        if self.polygon_mode == Some(mode) {
            return;
        }
        let gl_mode = match mode {
            PolygonMode::Fill => gl::FILL,
            PolygonMode::Line => gl::LINE,
            PolygonMode::Point => gl::POINT,
        };
        unsafe { gl::PolygonMode(gl::FRONT_AND_BACK, gl_mode) };
        log::debug!("Polygon mode set to {:?}", mode);
        self.polygon_mode = Some(mode);
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        let width = GLsizei::try_from(viewport.width).unwrap_or(GLsizei::MAX);
        let height = GLsizei::try_from(viewport.height).unwrap_or(GLsizei::MAX);
        unsafe { gl::Viewport(0, 0, width, height) };
        log::debug!("Viewport set to {}x{}", viewport.width, viewport.height);
    }

    fn unbind_program(&mut self) {
        unsafe { gl::UseProgram(0) };
    }

    fn check_errors(&mut self) -> BackendResult<()> {
        let error = unsafe { gl::GetError() };
        if error == gl::NO_ERROR {
            return Ok(());
        }

        // Drain the remaining flags so the next frame starts clean.
        let mut extra = 0;
        while unsafe { gl::GetError() } != gl::NO_ERROR && extra < 16 {
            extra += 1;
        }

        Err(RenderError::RenderingFailed(format!(
            "{} (0x{error:04X}){}",
            error_name(error),
            if extra > 0 { format!(" and {extra} more") } else { String::new() }
        )))
    }
}

fn error_name(error: GLenum) -> &'static str {
    match error {
        gl::INVALID_ENUM => "GL_INVALID_ENUM",
        gl::INVALID_VALUE => "GL_INVALID_VALUE",
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        _ => "unknown GL error",
    }
}
