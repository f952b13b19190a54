//! Input management system
//!
//! Keyboard state is polled once per frame (level-triggered): a key held for
//! several frames acts on every one of them. Cursor and scroll input arrive
//! as [`ViewerEvent`]s after the frame is presented and are dispatched to the
//! camera here as well.

use crate::render::backend::{PolygonMode, Viewport};
use crate::render::camera::CameraMovement;
use crate::render::context::RenderContext;

/// Key codes the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// W key
    W,
    /// A key
    A,
    /// S key
    S,
    /// D key
    D,
    /// M key
    M,
    /// N key
    N,
    /// B key
    B,
    /// Escape key
    Escape,
}

/// Anything that can answer "is this key held right now"
pub trait InputSource {
    /// Whether `key` is currently pressed
    fn is_pressed(&self, key: KeyCode) -> bool;
}

/// Window events forwarded to the viewer after each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    /// Framebuffer resized to the given pixel size
    Resized(u32, u32),
    /// Cursor moved to an absolute window position
    CursorMoved(f64, f64),
    /// Scroll wheel moved
    Scrolled(f64, f64),
    /// The window's close button was pressed
    CloseRequested,
}

const MOVEMENT_KEYS: [(KeyCode, CameraMovement); 4] = [
    (KeyCode::W, CameraMovement::Forward),
    (KeyCode::S, CameraMovement::Backward),
    (KeyCode::A, CameraMovement::Left),
    (KeyCode::D, CameraMovement::Right),
];

// Checked in order; the last held key wins.
const POLYGON_MODE_KEYS: [(KeyCode, PolygonMode); 3] = [
    (KeyCode::M, PolygonMode::Line),
    (KeyCode::N, PolygonMode::Fill),
    (KeyCode::B, PolygonMode::Point),
];

/// Converts absolute cursor positions into look offsets
#[derive(Debug, Clone, PartialEq)]
pub struct MouseTracker {
    last_x: f64,
    last_y: f64,
    first_sample: bool,
}

impl MouseTracker {
    /// Start tracking from the given position (normally the window centre)
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            last_x: x,
            last_y: y,
            first_sample: true,
        }
    }

    /// Start tracking from the centre of `viewport`
    pub fn centered(viewport: Viewport) -> Self {
        Self::new(f64::from(viewport.width) / 2.0, f64::from(viewport.height) / 2.0)
    }

    /// Record a new cursor position and return the offset since the last one
    ///
    /// The first sample only seeds the position and yields `(0, 0)`. The y
    /// offset is inverted because window coordinates grow downwards.
    #[allow(clippy::cast_possible_truncation)]
    pub fn sample(&mut self, x: f64, y: f64) -> (f32, f32) {
        if self.first_sample {
            self.last_x = x;
            self.last_y = y;
            self.first_sample = false;
        }

        let xoffset = x - self.last_x;
        let yoffset = self.last_y - y;
        self.last_x = x;
        self.last_y = y;

        (xoffset as f32, yoffset as f32)
    }
}

/// Result of a keyboard poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputOutcome {
    /// Escape was held this frame
    pub close_requested: bool,
}

/// Translates input into camera, polygon-mode and close requests
#[derive(Debug, Clone)]
pub struct InputReducer {
    mouse: MouseTracker,
}

impl InputReducer {
    /// Create a reducer whose mouse tracker starts at the viewport centre
    pub fn new(viewport: Viewport) -> Self {
        Self {
            mouse: MouseTracker::centered(viewport),
        }
    }

    /// Apply the currently held keys for one frame
    pub fn poll(&mut self, input: &dyn InputSource, ctx: &mut RenderContext, delta_time: f32) -> InputOutcome {
        let close_requested = input.is_pressed(KeyCode::Escape);
        if close_requested {
            log::info!("Escape pressed, requesting close");
        }

        for (key, movement) in MOVEMENT_KEYS {
            if input.is_pressed(key) {
                ctx.camera.process_keyboard(movement, delta_time);
            }
        }

        for (key, mode) in POLYGON_MODE_KEYS {
            if input.is_pressed(key) {
                ctx.polygon_mode = mode;
            }
        }

        InputOutcome { close_requested }
    }

    /// Dispatch one window event
    ///
    /// Returns `true` when the event asks the viewer to close.
    pub fn handle_event(&mut self, event: ViewerEvent, ctx: &mut RenderContext) -> bool {
        match event {
            ViewerEvent::Resized(width, height) => {
                ctx.resize(Viewport::new(width, height));
                false
            }
            ViewerEvent::CursorMoved(x, y) => {
                let (xoffset, yoffset) = self.mouse.sample(x, y);
                ctx.camera.process_mouse_movement(xoffset, yoffset);
                false
            }
            #[allow(clippy::cast_possible_truncation)]
            ViewerEvent::Scrolled(_, yoffset) => {
                ctx.camera.process_mouse_scroll(yoffset as f32);
                false
            }
            ViewerEvent::CloseRequested => true,
        }
    }
}
