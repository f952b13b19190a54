//! Backend abstraction traits for the rendering system
//!
//! This module defines the collaborator traits the frame composer draws
//! through. The OpenGL implementations live in [`crate::render::opengl`];
//! tests substitute recording doubles.

use crate::foundation::math::{Mat4, Vec4};
use crate::render::shader::ShaderProgram;
use crate::render::RenderError;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Rasterization mode for polygon faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolygonMode {
    /// Filled triangles
    #[default]
    Fill,
    /// Wireframe edges
    Line,
    /// Vertices only
    Point,
}

/// Framebuffer size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero (minimized window)
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height, or `None` for an empty viewport
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.is_empty() {
            None
        } else {
            Some(self.width as f32 / self.height as f32)
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1024, 768)
    }
}

/// Raw pipeline state the composer touches between draws
pub trait RenderBackend {
    /// Clear color and depth buffers to `color`
    fn clear(&mut self, color: Vec4);

    /// Set the rasterization mode for front and back faces
    fn set_polygon_mode(&mut self, mode: PolygonMode);

    /// Resize the drawable region
    fn set_viewport(&mut self, viewport: Viewport);

    /// Leave no program bound
    fn unbind_program(&mut self);

    /// Report the first pending pipeline error, if any
    ///
    /// Called once per frame after all draws.
    fn check_errors(&mut self) -> BackendResult<()> {
        Ok(())
    }
}

/// Scene geometry that can draw itself with a bound program
pub trait Drawable {
    /// Issue the draw calls for this model
    ///
    /// The program is already current and carries the frame's uniforms; the
    /// model only binds its own textures and vertex arrays.
    fn draw(&mut self, shader: &mut dyn ShaderProgram);
}

/// Environment background drawn behind all geometry
pub trait Skybox {
    /// Draw the background with the frame's projection and view
    ///
    /// Implementations strip translation from `view` and draw at the far
    /// plane so geometry always occludes the background.
    fn draw(&mut self, shader: &mut dyn ShaderProgram, projection: &Mat4, view: &Mat4);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_viewport_is_gallery_window() {
        let viewport = Viewport::default();
        assert_eq!((viewport.width, viewport.height), (1024, 768));
        assert_relative_eq!(viewport.aspect_ratio().unwrap_or_default(), 4.0 / 3.0);
    }

    #[test]
    fn test_empty_viewport_has_no_aspect() {
        assert_eq!(Viewport::new(0, 768).aspect_ratio(), None);
        assert_eq!(Viewport::new(640, 0).aspect_ratio(), None);
        assert!(Viewport::new(0, 0).is_empty());
    }

    #[test]
    fn test_polygon_mode_defaults_to_fill() {
        assert_eq!(PolygonMode::default(), PolygonMode::Fill);
    }
}
