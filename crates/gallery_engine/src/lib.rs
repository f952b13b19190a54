//! # Gallery Engine
//!
//! A small OpenGL viewer core: a first-person camera walks through a static
//! model lit by a handful of point lights, in front of a cubemap background.
//!
//! ## Features
//!
//! - **Frame Composition**: background pass, then the lit geometry pass, with
//!   every shader input recomputed each frame
//! - **Point Lights**: ordered registry uploaded into an indexed uniform array
//! - **FPS Camera**: yaw/pitch mouse look, WASD movement, scroll zoom
//! - **Configuration**: built-in defaults, optional TOML/RON overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gallery_engine::prelude::*;
//!
//! fn main() -> Result<(), ViewerError> {
//!     gallery_engine::foundation::logging::init();
//!     let config = ViewerConfig::load_or_default("gallery.toml")?;
//!     let mut viewer = Viewer::start(&config)?;
//!     viewer.run()
//! }
//! ```

pub mod assets;
pub mod config;
pub mod foundation;
pub mod input;
pub mod render;

mod app;

pub use app::{Viewer, ViewerError, ViewerResult};

/// Common imports for viewer users
pub mod prelude {
    pub use crate::{
        config::{Config, ViewerConfig},
        foundation::math::{Mat4, Transform, Vec3, Vec4},
        input::{InputReducer, InputSource, KeyCode, ViewerEvent},
        render::{
            Camera, CameraMovement, FrameComposer, FrameSettings, Light, LightRegistry, Material, PolygonMode,
            RenderContext, ShaderProgram, Viewport,
        },
        Viewer, ViewerError, ViewerResult,
    };
}
