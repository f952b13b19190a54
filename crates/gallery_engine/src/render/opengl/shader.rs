//! GLSL program compiled from vertex and fragment source files

use std::collections::HashMap;
use std::ffi::CString;
use std::path::{Path, PathBuf};

use gl::types::{GLchar, GLenum, GLint, GLuint};
use thiserror::Error;

use crate::foundation::math::{Mat4, Vec3, Vec4};
use crate::render::shader::{ShaderProgram, ShaderSources};

/// Shader compilation and linking errors
#[derive(Error, Debug)]
pub enum ShaderError {
    /// A source file could not be read
    #[error("Failed to read shader {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Source text contained an interior NUL byte
    #[error("Shader source {0} contains a NUL byte")]
    InvalidSource(PathBuf),

    /// A stage failed to compile
    #[error("{stage} shader {path} failed to compile:\n{log}")]
    Compile {
        /// "vertex" or "fragment"
        stage: &'static str,
        /// Source file
        path: PathBuf,
        /// Driver info log
        log: String,
    },

    /// The program failed to link
    #[error("Program failed to link:\n{0}")]
    Link(String),
}

/// Linked OpenGL program with a uniform location cache
#[derive(Debug)]
pub struct GlShaderProgram {
    id: GLuint,
    locations: HashMap<String, GLint>,
}

impl GlShaderProgram {
    /// Compile and link the program described by `sources`
    pub fn from_sources(sources: &ShaderSources) -> Result<Self, ShaderError> {
        let sources = sources.resolved();
        Self::from_files(&sources.vertex_path, &sources.fragment_path)
    }

    /// Compile and link a vertex/fragment pair
    pub fn from_files(vertex_path: impl AsRef<Path>, fragment_path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let vertex_path = vertex_path.as_ref();
        let fragment_path = fragment_path.as_ref();

        let vertex = compile_stage(gl::VERTEX_SHADER, "vertex", vertex_path)?;
        let fragment = match compile_stage(gl::FRAGMENT_SHADER, "fragment", fragment_path) {
            Ok(fragment) => fragment,
            Err(error) => {
                unsafe { gl::DeleteShader(vertex) };
                return Err(error);
            }
        };

        let id = unsafe {
            let id = gl::CreateProgram();
            gl::AttachShader(id, vertex);
            gl::AttachShader(id, fragment);
            gl::LinkProgram(id);
            gl::DeleteShader(vertex);
            gl::DeleteShader(fragment);
            id
        };

        let mut success = GLint::from(gl::FALSE);
        unsafe { gl::GetProgramiv(id, gl::LINK_STATUS, &mut success) };
        if success == GLint::from(gl::FALSE) {
            let log = program_info_log(id);
            unsafe { gl::DeleteProgram(id) };
            return Err(ShaderError::Link(log));
        }

        log::info!("Linked shader program {} from {:?} and {:?}", id, vertex_path, fragment_path);

        Ok(Self {
            id,
            locations: HashMap::new(),
        })
    }

    /// Raw program name
    pub fn id(&self) -> GLuint {
        self.id
    }

    fn location(&mut self, name: &str) -> GLint {
        if let Some(&location) = self.locations.get(name) {
            return location;
        }

        let location = CString::new(name).map_or(-1, |c_name| unsafe {
            gl::GetUniformLocation(self.id, c_name.as_ptr())
        });
        if location < 0 {
            log::trace!("Uniform {} is not active in program {}", name, self.id);
        }
        self.locations.insert(name.to_string(), location);
        location
    }
}

impl ShaderProgram for GlShaderProgram {
    fn use_program(&mut self) {
        unsafe { gl::UseProgram(self.id) };
    }

    fn set_int(&mut self, name: &str, value: i32) {
        let location = self.location(name);
        unsafe { gl::Uniform1i(location, value) };
    }

    fn set_float(&mut self, name: &str, value: f32) {
        let location = self.location(name);
        unsafe { gl::Uniform1f(location, value) };
    }

    fn set_vec3(&mut self, name: &str, value: &Vec3) {
        let location = self.location(name);
        unsafe { gl::Uniform3fv(location, 1, value.as_ptr()) };
    }

    fn set_vec4(&mut self, name: &str, value: &Vec4) {
        let location = self.location(name);
        unsafe { gl::Uniform4fv(location, 1, value.as_ptr()) };
    }

    fn set_mat4(&mut self, name: &str, value: &Mat4) {
        let location = self.location(name);
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr()) };
    }
}

impl Drop for GlShaderProgram {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) };
    }
}

fn compile_stage(kind: GLenum, stage: &'static str, path: &Path) -> Result<GLuint, ShaderError> {
    let source = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let source = CString::new(source).map_err(|_| ShaderError::InvalidSource(path.to_path_buf()))?;

    let id = unsafe {
        let id = gl::CreateShader(kind);
        gl::ShaderSource(id, 1, &source.as_ptr(), std::ptr::null());
        gl::CompileShader(id);
        id
    };

    let mut success = GLint::from(gl::FALSE);
    unsafe { gl::GetShaderiv(id, gl::COMPILE_STATUS, &mut success) };
    if success == GLint::from(gl::FALSE) {
        let log = shader_info_log(id);
        unsafe { gl::DeleteShader(id) };
        return Err(ShaderError::Compile {
            stage,
            path: path.to_path_buf(),
            log,
        });
    }

    Ok(id)
}

fn shader_info_log(id: GLuint) -> String {
    let mut length: GLint = 0;
    unsafe { gl::GetShaderiv(id, gl::INFO_LOG_LENGTH, &mut length) };
    let mut buffer = vec![0u8; usize::try_from(length).unwrap_or(0).max(1)];
    let mut written: GLint = 0;
    unsafe {
        gl::GetShaderInfoLog(id, length, &mut written, buffer.as_mut_ptr().cast::<GLchar>());
    }
    buffer.truncate(usize::try_from(written).unwrap_or(0));
    String::from_utf8_lossy(&buffer).into_owned()
}

fn program_info_log(id: GLuint) -> String {
    let mut length: GLint = 0;
    unsafe { gl::GetProgramiv(id, gl::INFO_LOG_LENGTH, &mut length) };
    let mut buffer = vec![0u8; usize::try_from(length).unwrap_or(0).max(1)];
    let mut written: GLint = 0;
    unsafe {
        gl::GetProgramInfoLog(id, length, &mut written, buffer.as_mut_ptr().cast::<GLchar>());
    }
    buffer.truncate(usize::try_from(written).unwrap_or(0));
    String::from_utf8_lossy(&buffer).into_owned()
}
