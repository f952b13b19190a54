//! Configuration system
//!
//! Every setting has a built-in default matching the stock gallery scene, so
//! the viewer runs without any file. A `.toml` or `.ron` file may override
//! any subset of fields.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

use crate::foundation::math::{Transform, Vec3, Vec4};
use crate::render::camera::Camera;
use crate::render::frame::FrameSettings;
use crate::render::lighting::{Light, LightRegistry};
use crate::render::material::Material;
use crate::render::shader::ShaderSources;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is outside its valid range
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Window creation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Initial width in screen coordinates
    pub width: u32,
    /// Initial height in screen coordinates
    pub height: u32,
    /// Title bar text
    pub title: String,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Gallery".to_string(),
        }
    }
}

/// Shader program sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderSettings {
    /// Multi-light Phong program for the model
    pub lit: ShaderSources,
    /// Cubemap program for the background
    pub skybox: ShaderSources,
}

impl Default for ShaderSettings {
    fn default() -> Self {
        Self {
            lit: ShaderSources::new(
                "resources/shaders/phong_multi_light.vert",
                "resources/shaders/phong_multi_light.frag",
            ),
            skybox: ShaderSources::new("resources/shaders/cubemap.vert", "resources/shaders/cubemap.frag"),
        }
    }
}

/// Scene content and placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Gallery model (Wavefront OBJ)
    pub model_path: String,

    /// Diffuse texture overriding the one named by the model's MTL file
    pub diffuse_texture: Option<String>,

    /// Cubemap faces in +X, -X, +Y, -Y, +Z, -Z order
    pub skybox_faces: [String; 6],

    /// Model translation
    pub model_position: Vec3,

    /// Model rotation axis
    pub model_rotation_axis: Vec3,

    /// Model rotation angle in degrees
    pub model_rotation_degrees: f32,

    /// Model scale per axis
    pub model_scale: Vec3,
}

impl Default for SceneSettings {
    fn default() -> Self {
        let face = |name: &str| format!("resources/textures/cubemap/{name}.png");
        Self {
            model_path: "resources/models/gallery.obj".to_string(),
            diffuse_texture: None,
            skybox_faces: [face("posx"), face("negx"), face("posy"), face("negy"), face("posz"), face("negz")],
            model_position: Vec3::zeros(),
            model_rotation_axis: Vec3::y(),
            model_rotation_degrees: 0.0,
            model_scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl SceneSettings {
    /// Model placement as a transform
    pub fn model_transform(&self) -> Transform {
        Transform::from_axis_angle_degrees(
            self.model_position,
            self.model_rotation_axis,
            self.model_rotation_degrees,
            self.model_scale,
        )
    }
}

/// Per-frame render parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Background clear color
    pub clear_color: Vec4,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
    /// Write the material uniforms every frame, and each OBJ group's MTL
    /// colors before that group is drawn
    pub upload_material: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_color: Vec4::new(0.1, 0.1, 0.1, 1.0),
            near: 0.1,
            far: 10000.0,
            upload_material: false,
        }
    }
}

/// Camera start state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Start position
    pub position: Vec3,
    /// Start heading in degrees
    pub yaw: f32,
    /// Start elevation in degrees
    pub pitch: f32,
    /// Movement speed in units per second
    pub speed: f32,
    /// Degrees per unit of cursor motion
    pub sensitivity: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 10.0),
            yaw: Camera::YAW,
            pitch: Camera::PITCH,
            speed: Camera::SPEED,
            sensitivity: Camera::SENSITIVITY,
        }
    }
}

impl CameraSettings {
    /// Build the camera these settings describe
    pub fn build(&self) -> Camera {
        let mut camera = Camera::with_orientation(self.position, Vec3::y(), self.yaw, self.pitch);
        camera.movement_speed = self.speed;
        camera.mouse_sensitivity = self.sensitivity;
        camera
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Window settings
    pub window: WindowSettings,
    /// Shader sources
    pub shaders: ShaderSettings,
    /// Scene content
    pub scene: SceneSettings,
    /// Frame parameters
    pub render: RenderSettings,
    /// Camera start state
    pub camera: CameraSettings,
    /// Point lights in shader slot order
    pub lights: Vec<Light>,
    /// Model material
    pub material: Material,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let gallery_light = Vec4::new(0.3, 0.3, 0.3, 1.0);
        Self {
            window: WindowSettings::default(),
            shaders: ShaderSettings::default(),
            scene: SceneSettings::default(),
            render: RenderSettings::default(),
            camera: CameraSettings::default(),
            lights: vec![
                Light::point(Vec3::new(5.0, 2.0, 5.0), gallery_light),
                Light::point(Vec3::new(-5.0, 2.0, 5.0), gallery_light),
            ],
            material: Material::default(),
        }
    }
}

impl Config for ViewerConfig {}

impl ViewerConfig {
    /// Load `path` if it exists, otherwise fall back to the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            log::info!("Loading configuration from {}", path.display());
            Self::load_from_file(path)
        } else {
            log::info!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Reject settings the viewer cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid {
                field: "window",
                reason: format!("size {}x{} has a zero dimension", self.window.width, self.window.height),
            });
        }
        if !self.render.near.is_finite() || self.render.near <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "render.near",
                reason: format!("{} is not a finite positive distance", self.render.near),
            });
        }
        if !self.render.far.is_finite() || self.render.far <= self.render.near {
            return Err(ConfigError::Invalid {
                field: "render.far",
                reason: format!("{} is not a finite distance beyond the near plane {}", self.render.far, self.render.near),
            });
        }
        check_positive("camera.speed", self.camera.speed)?;
        check_positive("camera.sensitivity", self.camera.sensitivity)?;
        Ok(())
    }

    /// Light registry in configured order
    pub fn light_registry(&self) -> LightRegistry {
        self.lights.iter().copied().collect()
    }

    /// Material with its transparency clamped to `[0, 1]`
    pub fn material(&self) -> Material {
        self.material.clone().with_transparency(self.material.transparency)
    }

    /// Fixed frame parameters
    pub fn frame_settings(&self) -> FrameSettings {
        FrameSettings {
            clear_color: self.render.clear_color,
            near: self.render.near,
            far: self.render.far,
            model: self.scene.model_transform(),
            upload_material: self.render.upload_material,
        }
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is not a finite positive value"),
        })
    }
}
