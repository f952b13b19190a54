//! # Rendering System
//!
//! Per-frame composition of camera, light and material state into shader
//! inputs, and the two draw passes that consume them.
//!
//! ## Architecture
//!
//! - **Core** (`camera`, `lighting`, `material`, `context`, `frame`): pure
//!   state and the ordered pass logic, independent of any graphics API
//! - **Seams** (`shader`, `backend`): the traits the frame composer draws
//!   through
//! - **OpenGL** (`opengl`, `window`): GLFW context creation and the GL
//!   implementations of every seam

pub mod backend;
pub mod camera;
pub mod context;
pub mod frame;
pub mod lighting;
pub mod material;
pub mod mesh;
pub mod shader;

#[allow(unsafe_code)]
pub mod opengl;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{BackendResult, Drawable, PolygonMode, RenderBackend, Skybox, Viewport};
pub use camera::{Camera, CameraMovement};
pub use context::RenderContext;
pub use frame::{dispatch_events, FrameComposer, FrameReport, FrameSettings, FrameUniforms, ScenePasses};
pub use lighting::{Light, LightRegistry};
pub use material::Material;
pub use mesh::{Mesh, Vertex};
pub use shader::{ShaderProgram, ShaderSources};

use thiserror::Error;

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// A rendering operation failed during execution
    ///
    /// Raised when the pipeline reports an error after a frame's draws.
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),
}
