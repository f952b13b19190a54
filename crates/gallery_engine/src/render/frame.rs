//! # Frame Composition
//!
//! One iteration of the render loop, split into a pure uniform computation
//! and the ordered sequence of collaborator calls that consumes it.
//!
//! ## Pass Order
//! 1. Apply the polygon mode chosen by the input reducer
//! 2. Clear color and depth
//! 3. Background pass: the skybox with the frame's projection and view
//! 4. Geometry pass: lit program, transform and light uniforms, model draw
//! 5. Unbind the program and check for pipeline errors
//!
//! The background always goes first. The skybox writes depth at the far
//! plane with a `LEQUAL` test, so geometry drawn afterwards occludes it.

use crate::foundation::math::{Mat4, Transform, Vec3, Vec4};
use crate::input::{InputReducer, InputSource, ViewerEvent};
use crate::render::backend::{BackendResult, Drawable, RenderBackend, Skybox};
use crate::render::context::RenderContext;
use crate::render::shader::ShaderProgram;

/// Fixed per-session parameters of the frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSettings {
    /// Background clear color
    pub clear_color: Vec4,

    /// Near clip plane distance
    pub near: f32,

    /// Far clip plane distance
    pub far: f32,

    /// Placement of the gallery model
    pub model: Transform,

    /// Also write the material uniforms in the geometry pass
    pub upload_material: bool,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            clear_color: Vec4::new(0.1, 0.1, 0.1, 1.0),
            near: 0.1,
            far: 10000.0,
            model: Transform::identity(),
            upload_material: false,
        }
    }
}

/// Transform uniforms shared by both passes of a frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUniforms {
    /// Camera to clip space
    pub projection: Mat4,
    /// World to camera space
    pub view: Mat4,
    /// Model to world space
    pub model: Mat4,
    /// Camera position in world space
    pub eye: Vec3,
}

impl FrameUniforms {
    /// Derive the frame's matrices from the camera and settings
    pub fn compute(ctx: &RenderContext, settings: &FrameSettings) -> Self {
        Self {
            projection: ctx
                .camera
                .projection_matrix(ctx.aspect_ratio(), settings.near, settings.far),
            view: ctx.camera.view_matrix(),
            model: settings.model.to_matrix(),
            eye: ctx.camera.position,
        }
    }
}

/// The collaborators one frame draws with
pub struct ScenePasses<'a> {
    /// Multi-light Phong program for the model
    pub lit_shader: &'a mut dyn ShaderProgram,
    /// Cubemap program for the background
    pub skybox_shader: &'a mut dyn ShaderProgram,
    /// Gallery geometry
    pub model: &'a mut dyn Drawable,
    /// Environment background
    pub skybox: &'a mut dyn Skybox,
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    /// Seconds since the previous frame
    pub delta_time: f32,
    /// The input asked to close the viewer
    pub close_requested: bool,
}

/// Issues the background and geometry passes in order
#[derive(Debug, Clone, Default)]
pub struct FrameComposer {
    settings: FrameSettings,
}

impl FrameComposer {
    /// Create a composer with fixed frame settings
    pub fn new(settings: FrameSettings) -> Self {
        Self { settings }
    }

    /// Frame settings in use
    pub fn settings(&self) -> &FrameSettings {
        &self.settings
    }

    /// Advance the clock, apply held keys and draw one frame
    ///
    /// Presentation and event dispatch are left to the caller, which owns
    /// the window.
    pub fn run_frame(
        &self,
        ctx: &mut RenderContext,
        now: f64,
        input: &dyn InputSource,
        reducer: &mut InputReducer,
        backend: &mut dyn RenderBackend,
        passes: &mut ScenePasses<'_>,
    ) -> BackendResult<FrameReport> {
        let delta_time = ctx.clock.tick(now);
        let outcome = reducer.poll(input, ctx, delta_time);

        self.compose(ctx, backend, passes)?;

        Ok(FrameReport {
            delta_time,
            close_requested: outcome.close_requested,
        })
    }

    /// Clear, draw the background, then draw the lit model
    pub fn compose(
        &self,
        ctx: &RenderContext,
        backend: &mut dyn RenderBackend,
        passes: &mut ScenePasses<'_>,
    ) -> BackendResult<()> {
        let uniforms = FrameUniforms::compute(ctx, &self.settings);

        backend.set_polygon_mode(ctx.polygon_mode);
        backend.clear(self.settings.clear_color);

        passes
            .skybox
            .draw(passes.skybox_shader, &uniforms.projection, &uniforms.view);

        let shader = &mut *passes.lit_shader;
        shader.use_program();
        shader.set_mat4("projection", &uniforms.projection);
        shader.set_mat4("view", &uniforms.view);
        shader.set_mat4("model", &uniforms.model);
        ctx.lights.upload(shader);
        shader.set_vec3("eye", &uniforms.eye);
        if self.settings.upload_material {
            ctx.material.upload(shader);
        }
        passes.model.draw(shader);

        backend.unbind_program();

        log::trace!(
            "Frame composed - eye: {:?}, lights: {}, mode: {:?}",
            uniforms.eye,
            ctx.lights.count(),
            ctx.polygon_mode
        );

        backend.check_errors()
    }
}

/// Dispatch the events gathered after presenting a frame
///
/// Resizes are forwarded to the backend viewport. Returns `true` when any
/// event asks the viewer to close.
pub fn dispatch_events(
    events: impl IntoIterator<Item = ViewerEvent>,
    ctx: &mut RenderContext,
    reducer: &mut InputReducer,
    backend: &mut dyn RenderBackend,
) -> bool {
    let mut close_requested = false;
    for event in events {
        close_requested |= reducer.handle_event(event, ctx);
        if let ViewerEvent::Resized(..) = event {
            backend.set_viewport(ctx.viewport);
        }
    }
    close_requested
}
