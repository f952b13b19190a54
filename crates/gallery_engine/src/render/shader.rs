//! Shading-program interface
//!
//! The frame composer only talks to shading programs through this trait: make
//! the program current and push named uniform values. Names are flat keys
//! into the program's uniform table; writing a name the program doesn't
//! declare is a silent no-op at the graphics-API level and is not reported.

use std::path::Path;

use crate::foundation::math::{Mat4, Vec3, Vec4};

/// A compiled shading program that accepts named uniforms
pub trait ShaderProgram {
    /// Make this program the active one for subsequent draws
    fn use_program(&mut self);

    /// Set an `int` (or sampler) uniform
    fn set_int(&mut self, name: &str, value: i32);

    /// Set a `float` uniform
    fn set_float(&mut self, name: &str, value: f32);

    /// Set a `vec3` uniform
    fn set_vec3(&mut self, name: &str, value: &Vec3);

    /// Set a `vec4` uniform
    fn set_vec4(&mut self, name: &str, value: &Vec4);

    /// Set a `mat4` uniform (column-major)
    fn set_mat4(&mut self, name: &str, value: &Mat4);
}

/// Vertex/fragment source locations for one program
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShaderSources {
    /// Path to the GLSL vertex shader
    pub vertex_path: String,
    /// Path to the GLSL fragment shader
    pub fragment_path: String,
}

impl ShaderSources {
    /// Create a new source pair
    pub fn new(vertex_path: impl Into<String>, fragment_path: impl Into<String>) -> Self {
        Self {
            vertex_path: vertex_path.into(),
            fragment_path: fragment_path.into(),
        }
    }

    /// Resolve both paths against the usual resource locations
    ///
    /// The viewer may be launched from the workspace root or from a crate
    /// directory, so a path that doesn't exist as given is retried under
    /// `resources/shaders/` and `../resources/shaders/` by file name.
    pub fn resolved(&self) -> Self {
        Self {
            vertex_path: resolve_shader_path(&self.vertex_path),
            fragment_path: resolve_shader_path(&self.fragment_path),
        }
    }
}

fn resolve_shader_path(base_path: &str) -> String {
    if Path::new(base_path).exists() {
        return base_path.to_string();
    }

    let Some(file_name) = Path::new(base_path).file_name().and_then(|name| name.to_str()) else {
        return base_path.to_string();
    };

    ["resources/shaders", "../resources/shaders", "../../resources/shaders"]
        .iter()
        .map(|dir| format!("{dir}/{file_name}"))
        .find(|candidate| Path::new(candidate).exists())
        .unwrap_or_else(|| base_path.to_string())
}
