//! Components every scene entity can carry.

use bevy_ecs::prelude::*;
use glam::{Mat4, Vec3};
use sge_physics::Transform;
use sge_render::{Camera3D, ModelHandle};

/// Human-readable entity name.
#[derive(Component, Clone, Debug, PartialEq, Eq, Default)]
pub struct Tag(pub String);

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Position, Euler rotation (radians) and scale of an entity.
///
/// For entities with a [`RigidBody`](sge_physics::RigidBody) the position is
/// written back from the body after every physics step.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct TransformComponent {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl TransformComponent {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn to_physics(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        let orientation = self.to_physics().orientation();
        Mat4::from_scale_rotation_translation(self.scale, orientation, self.position)
    }
}

impl From<Transform> for TransformComponent {
    fn from(t: Transform) -> Self {
        Self {
            position: t.position,
            rotation: t.rotation,
            scale: t.scale,
        }
    }
}

/// Static model drawn at the entity's transform.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshRenderer {
    pub model: ModelHandle,
}

/// Animated model drawn at the entity's transform. Animation playback is not
/// simulated; only the draw submission differs.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkinnedMeshRenderer {
    pub model: ModelHandle,
}

/// A camera attached to an entity. The primary camera drives picking.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct CameraComponent {
    pub camera: Camera3D,
    pub primary: bool,
}

impl CameraComponent {
    pub fn primary(camera: Camera3D) -> Self {
        Self {
            camera,
            primary: true,
        }
    }
}
