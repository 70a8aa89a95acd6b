//! Transform component for spatial positioning.

use glam::{Mat4, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
///
/// Used for the tracked viewpoint (the landed ship) and for the descriptors
/// handed to the object-instantiation layer when structures are placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the right direction (positive X).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Rotate this transform around a pivot point by `rotation`, moving the
    /// position along the orbit and composing the rotation. The surface/orbit
    /// hand-off pivots the viewpoint 90° about the X axis this way.
    pub fn rotate_around(&mut self, pivot: Vec3, rotation: Quat) {
        self.position = pivot + rotation * (self.position - pivot);
        self.rotation = rotation * self.rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_around_orbits_the_pivot() {
        let mut t = Transform::from_position(Vec3::new(1.0, 0.0, 0.0));
        t.rotate_around(Vec3::ZERO, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        // +X rotated 90° about Y lands on -Z
        assert!(t.position.distance(Vec3::new(0.0, 0.0, -1.0)) < 1e-5);
    }

    #[test]
    fn basis_vectors_are_orthonormal() {
        let t = Transform::from_position_rotation(
            Vec3::ZERO,
            Quat::from_euler(glam::EulerRot::YXZ, 0.7, -0.3, 0.1),
        );
        assert!(t.forward().dot(t.right()).abs() < 1e-5);
        assert!(t.forward().dot(t.up()).abs() < 1e-5);
        assert!((t.up().length() - 1.0).abs() < 1e-5);
    }
}
