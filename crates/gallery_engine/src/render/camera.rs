//! # First-Person Camera
//!
//! Yaw/pitch fly camera producing the view and projection matrices consumed
//! by the frame composer.
//!
//! ## Coordinate System
//! Right-handed, Y-up world. With the default yaw of -90° the camera looks
//! down -Z. Angles are stored in degrees; the basis vectors (`front`,
//! `right`, `up`) are recomputed whenever the angles change.
//!
//! ## Invariants
//! - Pitch stays within [`Camera::PITCH_LIMIT`] in both directions, so the
//!   front vector never becomes parallel to world up.
//! - Zoom (the vertical field of view in degrees) stays within
//!   [`Camera::ZOOM_MIN`], [`Camera::ZOOM_MAX`], so the projection matrix is
//!   always well-defined.

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Movement intents produced by the input reducer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    /// Along the front vector
    Forward,
    /// Against the front vector
    Backward,
    /// Against the right vector
    Left,
    /// Along the right vector
    Right,
}

/// First-person camera
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Unit view direction
    pub front: Vec3,

    /// Unit camera up vector
    pub up: Vec3,

    /// Unit camera right vector
    pub right: Vec3,

    /// World up used to rebuild the basis
    pub world_up: Vec3,

    /// Heading in degrees
    pub yaw: f32,

    /// Elevation in degrees
    pub pitch: f32,

    /// Units per second
    pub movement_speed: f32,

    /// Degrees per unit of cursor motion
    pub mouse_sensitivity: f32,

    /// Vertical field of view in degrees
    pub zoom: f32,
}

impl Camera {
    /// Default heading, looking down -Z
    pub const YAW: f32 = -90.0;
    /// Default elevation
    pub const PITCH: f32 = 0.0;
    /// Default movement speed
    pub const SPEED: f32 = 2.5;
    /// Default mouse sensitivity
    pub const SENSITIVITY: f32 = 0.1;
    /// Default (and widest) field of view
    pub const ZOOM: f32 = 45.0;

    /// Largest absolute pitch in degrees
    pub const PITCH_LIMIT: f32 = 89.0;
    /// Narrowest field of view in degrees
    pub const ZOOM_MIN: f32 = 1.0;
    /// Widest field of view in degrees
    pub const ZOOM_MAX: f32 = 45.0;

    /// Create a camera at `position` with default orientation and zoom
    pub fn new(position: Vec3) -> Self {
        Self::with_orientation(position, Vec3::y(), Self::YAW, Self::PITCH)
    }

    /// Create a camera with explicit world up and angles
    ///
    /// The pitch is clamped like any later mouse input.
    pub fn with_orientation(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::new(0.0, 0.0, -1.0),
            up: world_up,
            right: Vec3::x(),
            world_up,
            yaw,
            pitch: pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT),
            movement_speed: Self::SPEED,
            mouse_sensitivity: Self::SENSITIVITY,
            zoom: Self::ZOOM,
        };
        camera.update_camera_vectors();
        camera
    }

    /// View matrix: look-at from `position` towards `position + front`
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection using the current zoom as vertical FOV
    pub fn projection_matrix(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective(utils::deg_to_rad(self.zoom), aspect, near, far)
    }

    /// Move along the front/right axes by `movement_speed * delta_time`
    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    /// Turn by cursor offsets; positive `yoffset` looks up
    pub fn process_mouse_movement(&mut self, xoffset: f32, yoffset: f32) {
        if !xoffset.is_finite() || !yoffset.is_finite() {
            log::warn!("Ignoring non-finite mouse offset ({xoffset}, {yoffset})");
            return;
        }

        self.yaw += xoffset * self.mouse_sensitivity;
        self.pitch = (self.pitch + yoffset * self.mouse_sensitivity)
            .clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);

        self.update_camera_vectors();
    }

    /// Zoom by a scroll offset; positive `yoffset` narrows the view
    pub fn process_mouse_scroll(&mut self, yoffset: f32) {
        if !yoffset.is_finite() {
            log::warn!("Ignoring non-finite scroll offset {yoffset}");
            return;
        }

        self.zoom = (self.zoom - yoffset).clamp(Self::ZOOM_MIN, Self::ZOOM_MAX);
    }

    fn update_camera_vectors(&mut self) {
        let yaw = utils::deg_to_rad(self.yaw);
        let pitch = utils::deg_to_rad(self.pitch);

        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(&self.world_up).normalize();
        self.up = self.right.cross(&self.front).normalize();

        log::trace!("Camera basis updated - front: {:?}, yaw: {:.2}, pitch: {:.2}", self.front, self.yaw, self.pitch);
    }
}

impl Default for Camera {
    /// Gallery entrance: two units up, ten units back from the origin
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 2.0, 10.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_default_orientation_looks_down_negative_z() {
        let camera = Camera::default();
        assert_relative_eq!(camera.front, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
        assert_relative_eq!(camera.right, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(camera.up, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_view_matrix_equals_look_at_of_position_and_front() {
        let mut camera = Camera::new(Vec3::new(1.0, -3.0, 7.5));
        camera.process_mouse_movement(123.0, -37.0);

        let eye = Point3::from(camera.position);
        let target = Point3::from(camera.position + camera.front);
        let expected = Mat4::look_at_rh(&eye, &target, &camera.up);

        assert_relative_eq!(camera.view_matrix(), expected, epsilon = 1e-5);
    }

    #[test]
    fn test_forward_for_one_second_moves_by_speed_along_front() {
        let mut camera = Camera::new(Vec3::new(0.0, 2.0, 10.0));
        let front = camera.front;

        camera.process_keyboard(CameraMovement::Forward, 1.0);

        let expected = Vec3::new(0.0, 2.0, 10.0) + front * Camera::SPEED;
        assert_relative_eq!(camera.position, expected, epsilon = 1e-6);
        assert_relative_eq!(camera.position, Vec3::new(0.0, 2.0, 7.5), epsilon = 1e-6);
    }

    #[test]
    fn test_strafe_and_backward_use_right_and_front() {
        let mut camera = Camera::default();
        camera.process_keyboard(CameraMovement::Right, 2.0);
        assert_relative_eq!(camera.position, Vec3::new(5.0, 2.0, 10.0), epsilon = 1e-5);

        camera.process_keyboard(CameraMovement::Left, 2.0);
        camera.process_keyboard(CameraMovement::Backward, 0.4);
        assert_relative_eq!(camera.position, Vec3::new(0.0, 2.0, 11.0), epsilon = 1e-5);
    }

    #[test]
    fn test_zero_delta_does_not_move() {
        let mut camera = Camera::default();
        camera.process_keyboard(CameraMovement::Forward, 0.0);
        assert_eq!(camera.position, Vec3::new(0.0, 2.0, 10.0));
    }

    #[test]
    fn test_pitch_converges_to_upper_bound() {
        let mut camera = Camera::default();
        for _ in 0..100 {
            camera.process_mouse_movement(0.0, 1000.0 / Camera::SENSITIVITY);
            assert!(camera.pitch <= Camera::PITCH_LIMIT);
        }
        assert_eq!(camera.pitch, Camera::PITCH_LIMIT);
        assert!(camera.front.y < 1.0);
        assert!(camera.right.norm() > 0.99);
    }

    #[test]
    fn test_pitch_stays_within_bounds_for_mixed_input() {
        let mut camera = Camera::default();
        let offsets = [5000.0, -12000.0, 3.0, -0.5, 99999.0, -99999.0, 17.0];
        for offset in offsets {
            camera.process_mouse_movement(offset, offset);
            assert!(camera.pitch.abs() <= Camera::PITCH_LIMIT, "pitch {} out of range", camera.pitch);
        }
    }

    #[test]
    fn test_zoom_stays_within_bounds() {
        let mut camera = Camera::default();
        for _ in 0..50 {
            camera.process_mouse_scroll(10.0);
            assert!(camera.zoom >= Camera::ZOOM_MIN);
        }
        assert_eq!(camera.zoom, Camera::ZOOM_MIN);

        for _ in 0..50 {
            camera.process_mouse_scroll(-10.0);
            assert!(camera.zoom <= Camera::ZOOM_MAX);
        }
        assert_eq!(camera.zoom, Camera::ZOOM_MAX);

        camera.process_mouse_scroll(2.5);
        assert_relative_eq!(camera.zoom, 42.5);
    }

    #[test]
    fn test_non_finite_input_is_ignored() {
        let mut camera = Camera::default();
        let before = camera.clone();

        camera.process_mouse_movement(f32::NAN, 1.0);
        camera.process_mouse_scroll(f32::INFINITY);

        assert_eq!(camera, before);
    }

    #[test]
    fn test_yaw_turns_front_vector() {
        let mut camera = Camera::default();
        // 900 units * 0.1 sensitivity = 90 degrees, from -Z to +X.
        camera.process_mouse_movement(900.0, 0.0);
        assert_relative_eq!(camera.front, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_projection_uses_zoom_as_fov() {
        let mut camera = Camera::default();
        camera.process_mouse_scroll(15.0);
        let expected = Mat4::new_perspective(4.0 / 3.0, utils::deg_to_rad(30.0), 0.1, 10000.0);
        assert_relative_eq!(camera.projection_matrix(4.0 / 3.0, 0.1, 10000.0), expected, epsilon = 1e-4);
    }
}
