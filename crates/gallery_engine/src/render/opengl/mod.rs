//! OpenGL 3.3 core implementations of the render collaborators
//!
//! Everything here assumes a current context whose function pointers were
//! loaded by [`crate::render::window::GlWindow`]. GL object names are freed in
//! `Drop`, so these values must be dropped before the window.

pub mod backend;
pub mod cubemap;
pub mod model;
pub mod shader;
pub mod texture;

pub use backend::GlBackend;
pub use cubemap::GlCubemap;
pub use model::GlModel;
pub use shader::{GlShaderProgram, ShaderError};
pub use texture::GlTexture;
