//! Collider shapes and the pair dispatch table.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::{CollisionPoints, Ray, Transform, algorithms};

/// Infinite plane used for picking. `bounds` is carried for rendering and
/// serialization but does not limit intersection tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneCollider {
    /// Offset from the owning body's position.
    pub origin: Vec3,
    pub normal: Vec3,
    pub bounds: Vec2,
}

impl Default for PlaneCollider {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            normal: Vec3::Y,
            bounds: Vec2::ZERO,
        }
    }
}

impl PlaneCollider {
    pub fn new(origin: Vec3, normal: Vec3, bounds: Vec2) -> Self {
        Self {
            origin,
            normal,
            bounds,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereCollider {
    /// Offset from the owning body's position.
    pub center: Vec3,
    pub radius: f32,
}

impl Default for SphereCollider {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 1.0,
        }
    }
}

impl SphereCollider {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Discriminant of a [`Collider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderKind {
    Plane,
    Sphere,
    Ray,
}

/// Closed set of collision shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Plane(PlaneCollider),
    Sphere(SphereCollider),
    Ray(Ray),
}

impl Collider {
    pub fn kind(&self) -> ColliderKind {
        match self {
            Self::Plane(_) => ColliderKind::Plane,
            Self::Sphere(_) => ColliderKind::Sphere,
            Self::Ray(_) => ColliderKind::Ray,
        }
    }

    /// Test this collider (placed at `transform`) against `other`.
    pub fn test(
        &self,
        transform: &Transform,
        other: &Collider,
        other_transform: &Transform,
    ) -> CollisionPoints {
        test_collision(self, transform, other, other_transform)
    }
}

impl From<PlaneCollider> for Collider {
    fn from(plane: PlaneCollider) -> Self {
        Self::Plane(plane)
    }
}

impl From<SphereCollider> for Collider {
    fn from(sphere: SphereCollider) -> Self {
        Self::Sphere(sphere)
    }
}

impl From<Ray> for Collider {
    fn from(ray: Ray) -> Self {
        Self::Ray(ray)
    }
}

/// Dispatch a pair of colliders to the matching intersection routine.
///
/// Both orders of a shape pair reach the same routine with the arguments
/// swapped into its canonical order. Pairs with no routine (plane/plane,
/// ray/ray) never collide.
pub fn test_collision(
    a: &Collider,
    ta: &Transform,
    b: &Collider,
    tb: &Transform,
) -> CollisionPoints {
    use Collider::{Plane, Ray, Sphere};

    match (a, b) {
        (Ray(ray), Plane(plane)) => algorithms::ray_plane(ray, plane, tb),
        (Plane(plane), Ray(ray)) => algorithms::ray_plane(ray, plane, ta),
        (Ray(ray), Sphere(sphere)) => algorithms::ray_sphere(ray, sphere, tb),
        (Sphere(sphere), Ray(ray)) => algorithms::ray_sphere(ray, sphere, ta),
        (Sphere(sa), Sphere(sb)) => algorithms::sphere_sphere(sa, ta, sb, tb),
        (Sphere(sphere), Plane(plane)) => algorithms::sphere_plane(sphere, ta, plane, tb),
        (Plane(plane), Sphere(sphere)) => algorithms::plane_sphere(plane, ta, sphere, tb),
        (Plane(_), Plane(_)) | (Ray(_), Ray(_)) => CollisionPoints::NONE,
    }
}
