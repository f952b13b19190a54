//! Surface reflectance parameters

use crate::foundation::math::Vec4;
use crate::render::shader::ShaderProgram;
use serde::{Deserialize, Serialize};

/// Phong material properties for one surface group
///
/// The lit program shades from the model's own textures, so the frame
/// composer leaves these values off the program unless material upload is
/// switched on in the frame settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Ambient reflectance (RGBA)
    pub ambient: Vec4,

    /// Diffuse reflectance (RGBA)
    pub diffuse: Vec4,

    /// Specular reflectance (RGBA)
    pub specular: Vec4,

    /// Opacity (0.0 = fully transparent, 1.0 = opaque)
    pub transparency: f32,
}

impl Material {
    /// Create a new material with the gallery's default properties
    pub fn new() -> Self {
        Self {
            ambient: Vec4::new(0.1, 0.1, 0.1, 1.0),
            diffuse: Vec4::new(0.8, 0.8, 0.8, 1.0),
            specular: Vec4::new(0.5, 0.5, 0.5, 1.0),
            transparency: 1.0,
        }
    }

    /// Set the ambient color
    pub fn with_ambient(mut self, ambient: Vec4) -> Self {
        self.ambient = ambient;
        self
    }

    /// Set the diffuse color
    pub fn with_diffuse(mut self, diffuse: Vec4) -> Self {
        self.diffuse = diffuse;
        self
    }

    /// Set the specular color
    pub fn with_specular(mut self, specular: Vec4) -> Self {
        self.specular = specular;
        self
    }

    /// Set the transparency, clamped to `[0, 1]`
    pub fn with_transparency(mut self, transparency: f32) -> Self {
        self.transparency = transparency.clamp(0.0, 1.0);
        self
    }

    /// Write the material uniforms to the active program
    pub fn upload(&self, shader: &mut dyn ShaderProgram) {
        shader.set_vec4("MaterialAmbientColor", &self.ambient);
        shader.set_vec4("MaterialDiffuseColor", &self.diffuse);
        shader.set_vec4("MaterialSpecularColor", &self.specular);
        shader.set_float("transparency", self.transparency);
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{CallLog, RecordingShader, UniformValue};

    #[test]
    fn test_transparency_is_clamped() {
        assert_eq!(Material::new().with_transparency(1.7).transparency, 1.0);
        assert_eq!(Material::new().with_transparency(-0.2).transparency, 0.0);
        assert_eq!(Material::new().with_transparency(0.25).transparency, 0.25);
    }

    #[test]
    fn test_defaults_match_gallery_surface() {
        let material = Material::default();
        assert_eq!(material.ambient, Vec4::new(0.1, 0.1, 0.1, 1.0));
        assert_eq!(material.diffuse, Vec4::new(0.8, 0.8, 0.8, 1.0));
        assert_eq!(material.specular, Vec4::new(0.5, 0.5, 0.5, 1.0));
        assert_eq!(material.transparency, 1.0);
    }

    #[test]
    fn test_upload_writes_four_uniforms() {
        let log = CallLog::default();
        let mut shader = RecordingShader::new("lit", &log);
        let material = Material::new().with_diffuse(Vec4::new(1.0, 0.0, 0.0, 1.0));

        material.upload(&mut shader);

        let uniforms = log.uniforms("lit");
        assert_eq!(uniforms.len(), 4);
        assert_eq!(
            uniforms[1],
            ("MaterialDiffuseColor".to_string(), UniformValue::Vec4(Vec4::new(1.0, 0.0, 0.0, 1.0)))
        );
        assert_eq!(uniforms[3], ("transparency".to_string(), UniformValue::Float(1.0)));
    }
}
