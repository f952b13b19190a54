//! 2D and cubemap texture uploads

use gl::types::{GLenum, GLint, GLsizei, GLuint};

use crate::assets::{AssetError, ImageData};

/// Owned OpenGL texture name
#[derive(Debug)]
pub struct GlTexture {
    id: GLuint,
    target: GLenum,
}

impl GlTexture {
    /// Upload an image as a mipmapped, repeating 2D texture
    pub fn from_image(image: &ImageData) -> Result<Self, AssetError> {
        let format = pixel_format(image)?;
        let (width, height) = dimensions(image)?;

        let mut id = 0;
        unsafe {
            gl::GenTextures(1, &mut id);
            gl::BindTexture(gl::TEXTURE_2D, id);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                format as GLint,
                width,
                height,
                0,
                format,
                gl::UNSIGNED_BYTE,
                image.data.as_ptr().cast(),
            );
            gl::GenerateMipmap(gl::TEXTURE_2D);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::REPEAT as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::REPEAT as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::LINEAR_MIPMAP_LINEAR as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
        }

        Ok(Self {
            id,
            target: gl::TEXTURE_2D,
        })
    }

    /// Upload six faces as a cubemap, in +X, -X, +Y, -Y, +Z, -Z order
    pub fn cubemap(faces: &[ImageData; 6]) -> Result<Self, AssetError> {
        let mut id = 0;
        unsafe {
            gl::GenTextures(1, &mut id);
            gl::BindTexture(gl::TEXTURE_CUBE_MAP, id);
        }
        // Take ownership before uploading so a bad face still frees the name.
        let texture = Self {
            id,
            target: gl::TEXTURE_CUBE_MAP,
        };

        for (offset, face) in (0..).zip(faces) {
            let format = pixel_format(face)?;
            let (width, height) = dimensions(face)?;
            unsafe {
                gl::TexImage2D(
                    gl::TEXTURE_CUBE_MAP_POSITIVE_X + offset,
                    0,
                    format as GLint,
                    width,
                    height,
                    0,
                    format,
                    gl::UNSIGNED_BYTE,
                    face.data.as_ptr().cast(),
                );
            }
        }

        unsafe {
            gl::TexParameteri(gl::TEXTURE_CUBE_MAP, gl::TEXTURE_MIN_FILTER, gl::LINEAR as GLint);
            gl::TexParameteri(gl::TEXTURE_CUBE_MAP, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
            gl::TexParameteri(gl::TEXTURE_CUBE_MAP, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as GLint);
            gl::TexParameteri(gl::TEXTURE_CUBE_MAP, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as GLint);
            gl::TexParameteri(gl::TEXTURE_CUBE_MAP, gl::TEXTURE_WRAP_R, gl::CLAMP_TO_EDGE as GLint);
        }

        Ok(texture)
    }

    /// Bind to texture unit `unit`
    pub fn bind(&self, unit: u32) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(self.target, self.id);
        }
    }
}

impl Drop for GlTexture {
    fn drop(&mut self) {
        unsafe { gl::DeleteTextures(1, &self.id) };
    }
}

fn pixel_format(image: &ImageData) -> Result<GLenum, AssetError> {
    match image.channels {
        1 => Ok(gl::RED),
        3 => Ok(gl::RGB),
        4 => Ok(gl::RGBA),
        other => Err(AssetError::InvalidData(format!("unsupported channel count {other}"))),
    }
}

fn dimensions(image: &ImageData) -> Result<(GLsizei, GLsizei), AssetError> {
    let width = GLsizei::try_from(image.width);
    let height = GLsizei::try_from(image.height);
    match (width, height) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(AssetError::InvalidData(format!(
            "image {}x{} is too large to upload",
            image.width, image.height
        ))),
    }
}
