//! Math utilities and types
//!
//! Provides the nalgebra aliases and OpenGL-convention matrix builders used by
//! the camera, the frame composer and the skybox pass.

use nalgebra::{Matrix3, Matrix4, Point3, Unit, UnitQuaternion, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform from a translation, an axis-angle rotation and a scale
    ///
    /// A zero-length axis yields no rotation.
    pub fn from_axis_angle_degrees(position: Vec3, axis: Vec3, degrees: f32, scale: Vec3) -> Self {
        let rotation = Unit::try_new(axis, f32::EPSILON)
            .map_or_else(Quat::identity, |axis| {
                Quat::from_axis_angle(&axis, utils::deg_to_rad(degrees))
            });

        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Convert to a transformation matrix
    ///
    /// Scale is applied first, then rotation, then translation (`T * R * S`).
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
}

/// Extension trait for Mat4 with the matrix builders the viewer needs
pub trait Mat4Ext {
    /// Create an OpenGL perspective projection matrix (clip depth in `[-1, 1]`)
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// Keep only the rotational 3x3 block, dropping translation
    ///
    /// Used by the skybox so the background stays infinitely distant.
    fn without_translation(&self) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }

    fn without_translation(&self) -> Mat4 {
        let rotation: Mat3 = self.fixed_view::<3, 3>(0, 0).into_owned();
        rotation.to_homogeneous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perspective_maps_near_and_far_to_clip_bounds() {
        let projection = Mat4::perspective(utils::deg_to_rad(45.0), 1024.0 / 768.0, 0.1, 10000.0);

        let near = projection.transform_point(&Point3::new(0.0, 0.0, -0.1));
        let far = projection.transform_point(&Point3::new(0.0, 0.0, -10000.0));
        assert_relative_eq!(near.z, -1.0, epsilon = 1e-4);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-4);

        // Wider than tall, so x is squeezed by the aspect ratio.
        assert_relative_eq!(projection[(1, 1)] / projection[(0, 0)], 1024.0 / 768.0, epsilon = 1e-5);
    }

    #[test]
    fn test_look_at_puts_target_down_negative_z() {
        let eye = Vec3::new(0.0, 2.0, 10.0);
        let target = Vec3::new(0.0, 2.0, 3.0);
        let view = Mat4::look_at(eye, target, Vec3::y());

        assert_relative_eq!(view.transform_point(&Point3::from(eye)), Point3::origin(), epsilon = 1e-5);
        assert_relative_eq!(
            view.transform_point(&Point3::from(target)),
            Point3::new(0.0, 0.0, -7.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_without_translation_keeps_rotation_only() {
        let view = Mat4::look_at(Vec3::new(3.0, 4.0, 5.0), Vec3::zeros(), Vec3::y());
        let stripped = view.without_translation();

        for row in 0..3 {
            for col in 0..3 {
                assert_relative_eq!(stripped[(row, col)], view[(row, col)]);
            }
            assert_eq!(stripped[(row, 3)], 0.0);
            assert_eq!(stripped[(3, row)], 0.0);
        }
        assert_eq!(stripped[(3, 3)], 1.0);
    }

    #[test]
    fn test_transform_applies_scale_then_rotation_then_translation() {
        let transform = Transform::from_axis_angle_degrees(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::y(),
            90.0,
            Vec3::new(2.0, 2.0, 2.0),
        );
        let expected = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0))
            * Mat4::from_axis_angle(&Vec3::y_axis(), utils::deg_to_rad(90.0))
            * Mat4::new_scaling(2.0);

        assert_relative_eq!(transform.to_matrix(), expected, epsilon = 1e-5);

        // A unit X point: scaled to 2, rotated onto -Z, then translated.
        let moved = transform.to_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved, Point3::new(1.0, 2.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_zero_axis_means_no_rotation() {
        let transform = Transform::from_axis_angle_degrees(Vec3::zeros(), Vec3::zeros(), 45.0, Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(transform.to_matrix(), Mat4::identity());
    }
}
