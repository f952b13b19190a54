//! Mutable per-session render state

use crate::foundation::time::FrameClock;
use crate::render::backend::{PolygonMode, Viewport};
use crate::render::camera::Camera;
use crate::render::lighting::LightRegistry;
use crate::render::material::Material;

/// Everything the composer and the input reducer read or write across frames
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// First-person camera
    pub camera: Camera,

    /// Scene lights, in shader slot order
    pub lights: LightRegistry,

    /// Surface parameters of the gallery model
    pub material: Material,

    /// Frame timing
    pub clock: FrameClock,

    /// Current framebuffer size
    pub viewport: Viewport,

    /// Current rasterization mode
    pub polygon_mode: PolygonMode,

    aspect_ratio: f32,
}

impl RenderContext {
    /// Create a context with no lights, the default material and a fill mode
    pub fn new(camera: Camera, viewport: Viewport) -> Self {
        Self {
            camera,
            lights: LightRegistry::new(),
            material: Material::default(),
            clock: FrameClock::new(),
            viewport,
            polygon_mode: PolygonMode::Fill,
            aspect_ratio: viewport.aspect_ratio().unwrap_or(4.0 / 3.0),
        }
    }

    /// Replace the light registry
    pub fn with_lights(mut self, lights: LightRegistry) -> Self {
        self.lights = lights;
        self
    }

    /// Replace the material
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Replace the frame clock
    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    /// Record a new framebuffer size
    ///
    /// An empty viewport keeps the previous aspect ratio.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        match viewport.aspect_ratio() {
            Some(aspect) => self.aspect_ratio = aspect,
            None => log::debug!("Viewport {}x{} is empty, keeping aspect {:.3}", viewport.width, viewport.height, self.aspect_ratio),
        }
    }

    /// Aspect ratio of the last non-empty viewport
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }
}
