//! Recording collaborator doubles for unit tests
//!
//! Every double appends to one shared [`CallLog`], so a test can assert on
//! the relative order of clears, program switches, uniform writes and draws
//! without a graphics context.

use std::cell::RefCell;
use std::collections::HashSet;
use std::ops::Range;
use std::rc::Rc;

use crate::foundation::math::{Mat4, Vec3, Vec4};
use crate::input::{InputSource, KeyCode};
use crate::render::backend::{BackendResult, Drawable, PolygonMode, RenderBackend, Skybox, Viewport};
use crate::render::shader::ShaderProgram;

/// A recorded uniform value
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

/// One observed collaborator call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    UseProgram(&'static str),
    Uniform(&'static str, String, UniformValue),
    Clear(Vec4),
    PolygonMode(PolygonMode),
    Viewport(Viewport),
    UnbindProgram,
    DrawSkybox { projection: Mat4, view: Mat4 },
    DrawModel,
    DrawRange { indices: Range<usize>, texture: usize },
}

/// Shared, ordered list of calls
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    /// Uniform writes made through the program labelled `label`
    pub fn uniforms(&self, label: &str) -> Vec<(String, UniformValue)> {
        self.0
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Uniform(owner, name, value) if *owner == label => Some((name.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }

    /// Last value written to `name` on program `label`
    pub fn uniform(&self, label: &str, name: &str) -> Option<UniformValue> {
        self.uniforms(label)
            .into_iter()
            .rev()
            .find(|(written, _)| written == name)
            .map(|(_, value)| value)
    }

    /// Index of the first call matching `predicate`
    pub fn position(&self, predicate: impl Fn(&Call) -> bool) -> Option<usize> {
        self.0.borrow().iter().position(predicate)
    }
}

pub struct RecordingShader {
    label: &'static str,
    log: CallLog,
}

impl RecordingShader {
    pub fn new(label: &'static str, log: &CallLog) -> Self {
        Self { label, log: log.clone() }
    }

    fn record(&self, name: &str, value: UniformValue) {
        self.log.push(Call::Uniform(self.label, name.to_string(), value));
    }
}

impl ShaderProgram for RecordingShader {
    fn use_program(&mut self) {
        self.log.push(Call::UseProgram(self.label));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.record(name, UniformValue::Int(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.record(name, UniformValue::Float(value));
    }

    fn set_vec3(&mut self, name: &str, value: &Vec3) {
        self.record(name, UniformValue::Vec3(*value));
    }

    fn set_vec4(&mut self, name: &str, value: &Vec4) {
        self.record(name, UniformValue::Vec4(*value));
    }

    fn set_mat4(&mut self, name: &str, value: &Mat4) {
        self.record(name, UniformValue::Mat4(*value));
    }
}

pub struct RecordingModel {
    log: CallLog,
}

impl RecordingModel {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}

impl Drawable for RecordingModel {
    fn draw(&mut self, _shader: &mut dyn ShaderProgram) {
        self.log.push(Call::DrawModel);
    }
}

pub struct RecordingSkybox {
    log: CallLog,
}

impl RecordingSkybox {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}

impl Skybox for RecordingSkybox {
    fn draw(&mut self, shader: &mut dyn ShaderProgram, projection: &Mat4, view: &Mat4) {
        shader.use_program();
        self.log.push(Call::DrawSkybox {
            projection: *projection,
            view: *view,
        });
    }
}

pub struct RecordingBackend {
    log: CallLog,
    pending_error: Option<String>,
}

impl RecordingBackend {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            pending_error: None,
        }
    }

    /// Make the next error check fail with `message`
    pub fn fail_next_check(&mut self, message: &str) {
        self.pending_error = Some(message.to_string());
    }
}

impl RenderBackend for RecordingBackend {
    fn clear(&mut self, color: Vec4) {
        self.log.push(Call::Clear(color));
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) {
        self.log.push(Call::PolygonMode(mode));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.log.push(Call::Viewport(viewport));
    }

    fn unbind_program(&mut self) {
        self.log.push(Call::UnbindProgram);
    }

    fn check_errors(&mut self) -> BackendResult<()> {
        match self.pending_error.take() {
            Some(message) => Err(crate::render::RenderError::RenderingFailed(message)),
            None => Ok(()),
        }
    }
}

/// Fixed set of held keys
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn with(keys: &[KeyCode]) -> Self {
        Self {
            held: keys.iter().copied().collect(),
        }
    }
}

impl InputSource for KeyboardState {
    fn is_pressed(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }
}
