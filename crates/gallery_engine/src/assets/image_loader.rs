//! Image loading utilities for texture data
//!
//! Provides PNG and JPEG loading for the model's diffuse map and the six
//! skybox faces.

use std::path::Path;

use crate::assets::AssetError;

/// Loaded image data ready for GPU upload
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Raw pixel data, row-major, `channels` bytes per pixel
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of color channels (3 for RGB, 4 for RGBA)
    pub channels: u8,
}

impl ImageData {
    /// Load an image from a file path as RGBA
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let img = Self::open(path.as_ref())?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
            channels: 4,
        })
    }

    /// Load an image from a file path as RGB
    ///
    /// Cubemap faces are opaque, so the alpha channel is dropped.
    pub fn rgb_from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let img = Self::open(path.as_ref())?;
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        Ok(Self {
            data: rgb.into_raw(),
            width,
            height,
            channels: 3,
        })
    }

    /// Create a solid color image (used as the fallback diffuse texture)
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = width as usize * height as usize;
        let data = color.repeat(pixel_count);

        Self {
            data,
            width,
            height,
            channels: 4,
        }
    }

    fn open(path: &Path) -> Result<image::DynamicImage, AssetError> {
        log::debug!("Loading image from: {:?}", path);

        if !path.exists() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }

        let img = image::open(path)
            .map_err(|e| AssetError::LoadFailed(format!("Failed to load image {}: {e}", path.display())))?;

        log::info!("Loaded image {}x{} from {:?}", img.width(), img.height(), path);
        Ok(img)
    }
}
