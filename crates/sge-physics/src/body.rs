use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{Collider, Transform};

/// Opaque identifier of a body inside a [`PhysicsWorld`](crate::PhysicsWorld).
///
/// In the scene this is the owning entity's bits, so a handle doubles as the
/// owner id reported in collision events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u64);

impl BodyHandle {
    /// Handle that never refers to a body.
    pub const INVALID: Self = Self(u64::MAX);
}

impl Default for BodyHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

/// How a body responds to integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyType {
    /// Never moves.
    #[default]
    Static,
    /// Integrates force and gravity.
    Dynamic,
    /// Integrates force only.
    Kinematic,
}

/// A rigid body. `force` accumulates impulses until the next step.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub transform: Transform,
    pub velocity: Vec3,
    pub force: Vec3,
    pub mass: f32,
    pub body_type: BodyType,
    pub collider: Option<Collider>,
    owner: BodyHandle,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            mass: 1.0,
            body_type: BodyType::Static,
            collider: None,
            owner: BodyHandle::INVALID,
        }
    }
}

impl Body {
    pub fn new(body_type: BodyType) -> Self {
        Self {
            body_type,
            ..Self::default()
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Whether `mass` can be divided by during integration.
    pub fn is_valid_mass(mass: f32) -> bool {
        mass.is_finite() && mass != 0.0
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        debug_assert!(Self::is_valid_mass(mass), "body mass must be finite and non-zero");
        self.mass = mass;
        self
    }

    /// Like [`with_mass`](Self::with_mass), but `None` for a zero or
    /// non-finite mass.
    pub fn try_with_mass(self, mass: f32) -> Option<Self> {
        Self::is_valid_mass(mass).then(|| self.with_mass(mass))
    }

    pub fn with_collider(mut self, collider: impl Into<Collider>) -> Self {
        self.collider = Some(collider.into());
        self
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    pub fn owner(&self) -> BodyHandle {
        self.owner
    }

    pub fn set_owner(&mut self, owner: BodyHandle) {
        self.owner = owner;
    }

    /// Add to the accumulated force. Consumed by the next integration.
    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Semi-implicit Euler step.
    ///
    /// Static bodies are untouched. Force is cleared afterwards and the body
    /// is clamped to `floor` without touching its velocity.
    pub fn integrate(&mut self, gravity: Vec3, floor: f32, dt: f32) {
        let acceleration = match self.body_type {
            BodyType::Static => return,
            BodyType::Dynamic => self.force / self.mass + gravity,
            BodyType::Kinematic => self.force / self.mass,
        };

        self.velocity += acceleration * dt;
        self.transform.position += self.velocity * dt;
        self.force = Vec3::ZERO;

        if self.transform.position.y < floor {
            self.transform.position.y = floor;
        }
    }
}
