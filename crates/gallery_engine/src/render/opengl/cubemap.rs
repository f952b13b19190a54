//! Cubemap skybox

use std::path::Path;

use gl::types::{GLsizei, GLsizeiptr, GLuint};

use crate::assets::{AssetError, ImageData};
use crate::foundation::math::{Mat4, Mat4Ext};
use crate::render::backend::Skybox;
use crate::render::opengl::texture::GlTexture;
use crate::render::shader::ShaderProgram;

/// Sampler uniform the cubemap program reads from
pub const SKYBOX_SAMPLER_UNIFORM: &str = "skybox";

#[rustfmt::skip]
const CUBE_POSITIONS: [f32; 108] = [
    -1.0,  1.0, -1.0,  -1.0, -1.0, -1.0,   1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,   1.0,  1.0, -1.0,  -1.0,  1.0, -1.0,

    -1.0, -1.0,  1.0,  -1.0, -1.0, -1.0,  -1.0,  1.0, -1.0,
    -1.0,  1.0, -1.0,  -1.0,  1.0,  1.0,  -1.0, -1.0,  1.0,

     1.0, -1.0, -1.0,   1.0, -1.0,  1.0,   1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,   1.0,  1.0, -1.0,   1.0, -1.0, -1.0,

    -1.0, -1.0,  1.0,  -1.0,  1.0,  1.0,   1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,   1.0, -1.0,  1.0,  -1.0, -1.0,  1.0,

    -1.0,  1.0, -1.0,   1.0,  1.0, -1.0,   1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,  -1.0,  1.0,  1.0,  -1.0,  1.0, -1.0,

    -1.0, -1.0, -1.0,  -1.0, -1.0,  1.0,   1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,  -1.0, -1.0,  1.0,   1.0, -1.0,  1.0,
];

/// Unit cube textured with a six-face cubemap
#[derive(Debug)]
pub struct GlCubemap {
    vao: GLuint,
    vbo: GLuint,
    texture: GlTexture,
}

impl GlCubemap {
    /// Load six faces in +X, -X, +Y, -Y, +Z, -Z order
    pub fn load<P: AsRef<Path>>(faces: &[P; 6]) -> Result<Self, AssetError> {
        let mut images = Vec::with_capacity(6);
        for face in faces {
            images.push(ImageData::rgb_from_file(face)?);
        }
        let images: [ImageData; 6] = images
            .try_into()
            .map_err(|_| AssetError::InvalidData("cubemap needs exactly six faces".to_string()))?;

        let texture = GlTexture::cubemap(&images)?;

        let (mut vao, mut vbo) = (0, 0);
        let bytes: &[u8] = bytemuck::cast_slice(&CUBE_POSITIONS);
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);
            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(gl::ARRAY_BUFFER, bytes.len() as GLsizeiptr, bytes.as_ptr().cast(), gl::STATIC_DRAW);
            gl::EnableVertexAttribArray(0);
            gl::VertexAttribPointer(0, 3, gl::FLOAT, gl::FALSE, (3 * std::mem::size_of::<f32>()) as GLsizei, std::ptr::null());
            gl::BindVertexArray(0);
        }

        log::info!("Loaded cubemap from {} faces", faces.len());

        Ok(Self { vao, vbo, texture })
    }
}

impl Skybox for GlCubemap {
    fn draw(&mut self, shader: &mut dyn ShaderProgram, projection: &Mat4, view: &Mat4) {
        // The cube's depth is forced to 1.0 in the vertex stage; LEQUAL lets
        // it pass against the cleared depth buffer.
        unsafe { gl::DepthFunc(gl::LEQUAL) };

        shader.use_program();
        shader.set_mat4("view", &view.without_translation());
        shader.set_mat4("projection", projection);
        shader.set_int(SKYBOX_SAMPLER_UNIFORM, 0);

        self.texture.bind(0);
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawArrays(gl::TRIANGLES, 0, 36);
            gl::BindVertexArray(0);
            gl::DepthFunc(gl::LESS);
        }
    }
}

impl Drop for GlCubemap {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
        }
    }
}
