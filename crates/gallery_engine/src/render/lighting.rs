//! Point-light registry and its shader upload
//!
//! Lights are kept in insertion order; a light's index in the registry is the
//! slot it occupies in the lit program's `allLights[]` uniform array. The
//! program declares a fixed-size array ([`MAX_SHADER_LIGHTS`]). Registering
//! more lights than that is allowed and every light is still uploaded; the
//! extra writes land on uniform names the program doesn't have.

use crate::foundation::math::{Vec3, Vec4};
use crate::render::shader::ShaderProgram;
use serde::{Deserialize, Serialize};

/// Size of the `allLights[]` array compiled into the lit program
pub const MAX_SHADER_LIGHTS: usize = 10;

/// Uniform array holding per-light data
pub const LIGHT_ARRAY_UNIFORM: &str = "allLights";

/// Uniform holding the number of active lights
pub const LIGHT_COUNT_UNIFORM: &str = "numLights";

/// Per-light position field
pub const LIGHT_POSITION_FIELD: &str = "Position";

/// Per-light color field
pub const LIGHT_COLOR_FIELD: &str = "Color";

/// Build the uniform name of one field of one array element
///
/// `uniform_path("allLights", 1, "Color")` is `"allLights[1].Color"`.
pub fn uniform_path(array_name: &str, index: usize, field_name: &str) -> String {
    format!("{array_name}[{index}].{field_name}")
}

/// Point light source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Light position in world space
    pub position: Vec3,
    /// Light color (RGBA)
    pub color: Vec4,
}

impl Light {
    /// Create a point light
    pub fn point(position: Vec3, color: Vec4) -> Self {
        Self { position, color }
    }
}

/// Ordered collection of point lights
#[derive(Debug, Clone, Default)]
pub struct LightRegistry {
    lights: Vec<Light>,
}

impl LightRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a light; its index is the current count
    pub fn add(&mut self, light: Light) {
        self.lights.push(light);
        if self.lights.len() > MAX_SHADER_LIGHTS {
            log::warn!(
                "Light {} exceeds the shader's capacity of {} lights; it will not be shaded",
                self.lights.len() - 1,
                MAX_SHADER_LIGHTS
            );
        }
    }

    /// Number of registered lights
    pub fn count(&self) -> usize {
        self.lights.len()
    }

    /// Whether no lights are registered
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Light at `index`, if any
    pub fn get(&self, index: usize) -> Option<&Light> {
        self.lights.get(index)
    }

    /// Iterate lights in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Light> + '_ {
        self.lights.iter()
    }

    /// Visit every light with its slot index
    pub fn for_each(&self, mut visit: impl FnMut(usize, &Light)) {
        for (index, light) in self.lights.iter().enumerate() {
            visit(index, light);
        }
    }

    /// Write the light count and every light's position and color
    pub fn upload(&self, shader: &mut dyn ShaderProgram) {
        let count = i32::try_from(self.count()).unwrap_or(i32::MAX);
        shader.set_int(LIGHT_COUNT_UNIFORM, count);

        self.for_each(|index, light| {
            shader.set_vec3(
                &uniform_path(LIGHT_ARRAY_UNIFORM, index, LIGHT_POSITION_FIELD),
                &light.position,
            );
            shader.set_vec4(
                &uniform_path(LIGHT_ARRAY_UNIFORM, index, LIGHT_COLOR_FIELD),
                &light.color,
            );
        });
    }
}

impl FromIterator<Light> for LightRegistry {
    fn from_iter<I: IntoIterator<Item = Light>>(iter: I) -> Self {
        let mut registry = Self::new();
        for light in iter {
            registry.add(light);
        }
        registry
    }
}
