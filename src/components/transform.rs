//! World-space pose for 3D entities.
//!
//! [`Transform3D`] carries translation, rotation and scale. For door leaves
//! the translation is interpreted as an offset local to the owning door
//! container; every other entity stores its world pose directly.

use bevy_ecs::prelude::*;
use glam::{Mat4, Quat, Vec3};

/// Translation, rotation and scale of an entity.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform3D {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform3D {
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_translation(Vec3::new(x, y, z))
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Rotate around the vertical axis by `degrees`.
    pub fn with_yaw_degrees(mut self, degrees: f32) -> Self {
        self.rotation = Quat::from_rotation_y(degrees.to_radians());
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local-to-world matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Map a point expressed in this transform's local space to world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.matrix().transform_point3(local)
    }

    /// Distance to `other` on the horizontal plane (Y ignored).
    pub fn horizontal_distance(&self, other: Vec3) -> f32 {
        let dx = self.translation.x - other.x;
        let dz = self.translation.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }
}

/// Linear velocity in world units per second.
///
/// Integrated into [`Transform3D::translation`] by
/// [`crate::systems::movement::movement_system`].
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity3D(pub Vec3);
