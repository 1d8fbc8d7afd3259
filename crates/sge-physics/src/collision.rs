use glam::Vec3;

use crate::BodyHandle;

/// Result of a single pair test.
///
/// `did_collide` is the only field callers may rely on for a miss; the other
/// fields of a miss are unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionPoints {
    /// Deepest point of `b` inside `a` (or the hit point for rays).
    pub a: Vec3,
    /// Deepest point of `a` inside `b`.
    pub b: Vec3,
    /// Normalized `b - a`.
    pub normal: Vec3,
    /// Distance between `a` and `b`.
    pub depth: f32,
    pub did_collide: bool,
}

impl CollisionPoints {
    /// A miss with every field zeroed.
    pub const NONE: Self = Self {
        a: Vec3::ZERO,
        b: Vec3::ZERO,
        normal: Vec3::ZERO,
        depth: 0.0,
        did_collide: false,
    };

    /// A contact at a single point, as reported by ray tests.
    pub fn at_point(point: Vec3, did_collide: bool) -> Self {
        Self {
            a: point,
            b: point,
            did_collide,
            ..Self::NONE
        }
    }
}

/// A collision notification produced by [`PhysicsWorld::step_with`](crate::PhysicsWorld::step_with).
///
/// `a` and `b` are the *owners* of the two bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionEvent {
    /// The pair overlaps during this step. Reported on every overlapping step.
    Enter {
        points: CollisionPoints,
        a: BodyHandle,
        b: BodyHandle,
    },
    /// The pair overlapped in the previous step and no longer does.
    Exit {
        points: CollisionPoints,
        a: BodyHandle,
        b: BodyHandle,
    },
}

impl CollisionEvent {
    /// Owners of the two bodies in pair order.
    pub fn owners(&self) -> (BodyHandle, BodyHandle) {
        match *self {
            Self::Enter { a, b, .. } | Self::Exit { a, b, .. } => (a, b),
        }
    }

    pub fn points(&self) -> &CollisionPoints {
        match self {
            Self::Enter { points, .. } | Self::Exit { points, .. } => points,
        }
    }

    pub fn is_enter(&self) -> bool {
        matches!(self, Self::Enter { .. })
    }
}
