//! Pairwise intersection routines.
//!
//! Every function takes the shapes together with the transform of the body
//! that owns them. Rays are always in world space.

use glam::Vec3;

use crate::{CollisionPoints, PlaneCollider, Ray, SphereCollider, Transform};

/// Ray against an infinite plane through `transform.position + plane.origin`.
///
/// A ray starting exactly on the plane origin hits at its own origin. A ray
/// parallel to the plane misses. Intersections behind the ray origin report
/// the point with `did_collide == false`.
pub fn ray_plane(ray: &Ray, plane: &PlaneCollider, transform: &Transform) -> CollisionPoints {
    let origin = transform.position + plane.origin;
    if ray.origin == origin {
        return CollisionPoints::at_point(ray.origin, true);
    }

    let denom = plane.normal.dot(ray.direction);
    if denom == 0.0 {
        return CollisionPoints::NONE;
    }

    let t = (origin - ray.origin).dot(plane.normal) / denom;
    CollisionPoints::at_point(ray.point_at(t), t > 0.0)
}

/// Ray against a sphere, reporting the farther of the two intersections.
///
/// This is the legacy pick behavior: with a unit direction, a ray that hits
/// a sphere from outside reports the exit point. The root is used as-is, so
/// spheres behind the ray origin can still be reported.
pub fn ray_sphere(ray: &Ray, sphere: &SphereCollider, transform: &Transform) -> CollisionPoints {
    let center = transform.position + sphere.center;
    let oc = ray.origin - center;

    let a = ray.direction.dot(ray.direction);
    let b = ray.direction.dot(oc);
    let c = oc.dot(oc) - sphere.radius * sphere.radius;
    let discriminant = b * b - c;

    if discriminant < 0.0 || a == 0.0 {
        return CollisionPoints::NONE;
    }

    let t = (-b + discriminant.sqrt()) / a;
    CollisionPoints::at_point(ray.point_at(t), true)
}

/// Ray against a sphere, reporting the nearest intersection in front of the
/// ray origin.
pub fn ray_sphere_nearest(
    ray: &Ray,
    sphere: &SphereCollider,
    transform: &Transform,
) -> CollisionPoints {
    let center = transform.position + sphere.center;
    let oc = ray.origin - center;

    let a = ray.direction.dot(ray.direction);
    let b = ray.direction.dot(oc);
    let c = oc.dot(oc) - sphere.radius * sphere.radius;
    let discriminant = b * b - a * c;

    if discriminant < 0.0 || a == 0.0 {
        return CollisionPoints::NONE;
    }

    let root = discriminant.sqrt();
    let near = (-b - root) / a;
    let far = (-b + root) / a;
    let t = if near >= 0.0 {
        near
    } else if far >= 0.0 {
        far
    } else {
        return CollisionPoints::NONE;
    };

    CollisionPoints::at_point(ray.point_at(t), true)
}

/// Sphere against sphere.
///
/// `a` is the center of `a` minus the center of `b`, halved. The other
/// contact fields are left zeroed. Touching spheres (distance equal to the
/// radius sum) do not collide.
pub fn sphere_sphere(
    a: &SphereCollider,
    ta: &Transform,
    b: &SphereCollider,
    tb: &Transform,
) -> CollisionPoints {
    let ca = ta.position + a.center;
    let cb = tb.position + b.center;
    let distance = ca.distance(cb);

    if distance >= a.radius + b.radius {
        return CollisionPoints::NONE;
    }

    CollisionPoints {
        a: (ca - cb) / 2.0,
        did_collide: true,
        ..CollisionPoints::NONE
    }
}

/// Sphere against plane. Not simulated; always a miss.
pub fn sphere_plane(
    _a: &SphereCollider,
    _ta: &Transform,
    _b: &PlaneCollider,
    _tb: &Transform,
) -> CollisionPoints {
    CollisionPoints::NONE
}

/// Plane against sphere. Not simulated; always a miss.
pub fn plane_sphere(
    _a: &PlaneCollider,
    _ta: &Transform,
    _b: &SphereCollider,
    _tb: &Transform,
) -> CollisionPoints {
    CollisionPoints::NONE
}

/// Distance from the ray origin to `point`.
pub(crate) fn distance_along(ray: &Ray, point: Vec3) -> f32 {
    (point - ray.origin).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    fn floor_plane() -> PlaneCollider {
        PlaneCollider::new(Vec3::ZERO, Vec3::Y, glam::Vec2::splat(10.0))
    }

    #[test]
    fn test_ray_plane_hit_from_above() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        let points = ray_plane(&ray, &floor_plane(), &Transform::default());
        assert!(points.did_collide);
        assert!(approx(points.a, Vec3::ZERO));
    }

    #[test]
    fn test_ray_plane_parallel_misses() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::X);
        let points = ray_plane(&ray, &floor_plane(), &Transform::default());
        assert!(!points.did_collide);
    }

    #[test]
    fn test_ray_plane_behind_origin_misses() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
        let points = ray_plane(&ray, &floor_plane(), &Transform::default());
        assert!(!points.did_collide);
    }

    #[test]
    fn test_ray_plane_origin_on_plane_origin() {
        let ray = Ray::new(Vec3::new(2.0, 0.0, 3.0), Vec3::X);
        let transform = Transform::from_position(Vec3::new(2.0, 0.0, 3.0));
        let points = ray_plane(&ray, &floor_plane(), &transform);
        assert!(points.did_collide);
        assert_eq!(points.a, ray.origin);
    }

    #[test]
    fn test_ray_plane_uses_body_position() {
        let ray = Ray::new(Vec3::new(1.0, 10.0, 1.0), Vec3::NEG_Y);
        let transform = Transform::from_position(Vec3::new(0.0, 2.0, 0.0));
        let points = ray_plane(&ray, &floor_plane(), &transform);
        assert!(points.did_collide);
        assert!(approx(points.a, Vec3::new(1.0, 2.0, 1.0)));
    }

    #[test]
    fn test_ray_sphere_reports_far_side() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
        let sphere = SphereCollider::new(Vec3::ZERO, 1.0);
        let points = ray_sphere(&ray, &sphere, &Transform::default());
        assert!(points.did_collide);
        assert!(approx(points.a, Vec3::new(0.0, 0.0, 1.0)), "got {}", points.a);
    }

    #[test]
    fn test_ray_sphere_nearest_reports_near_side() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
        let sphere = SphereCollider::new(Vec3::ZERO, 1.0);
        let points = ray_sphere_nearest(&ray, &sphere, &Transform::default());
        assert!(points.did_collide);
        assert!(approx(points.a, Vec3::new(0.0, 0.0, -1.0)), "got {}", points.a);
    }

    #[test]
    fn test_ray_sphere_nearest_handles_scaled_direction() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 4.0));
        let sphere = SphereCollider::new(Vec3::ZERO, 1.0);
        let points = ray_sphere_nearest(&ray, &sphere, &Transform::default());
        assert!(points.did_collide);
        assert!(approx(points.a, Vec3::new(0.0, 0.0, -1.0)), "got {}", points.a);
    }

    #[test]
    fn test_ray_sphere_nearest_ignores_spheres_behind() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        let sphere = SphereCollider::new(Vec3::ZERO, 1.0);
        let points = ray_sphere_nearest(&ray, &sphere, &Transform::default());
        assert!(!points.did_collide);
    }

    #[test]
    fn test_ray_sphere_miss() {
        let ray = Ray::new(Vec3::new(5.0, 0.0, -10.0), Vec3::Z);
        let sphere = SphereCollider::new(Vec3::ZERO, 1.0);
        assert!(!ray_sphere(&ray, &sphere, &Transform::default()).did_collide);
        assert!(!ray_sphere_nearest(&ray, &sphere, &Transform::default()).did_collide);
    }

    #[test]
    fn test_sphere_sphere_overlap() {
        let sphere = SphereCollider::new(Vec3::ZERO, 1.0);
        let ta = Transform::from_position(Vec3::new(1.5, 0.0, 0.0));
        let tb = Transform::default();
        let points = sphere_sphere(&sphere, &ta, &sphere, &tb);
        assert!(points.did_collide);
        assert!(approx(points.a, Vec3::new(0.75, 0.0, 0.0)));
        assert_eq!(points.b, Vec3::ZERO);
        assert_eq!(points.normal, Vec3::ZERO);
        assert_eq!(points.depth, 0.0);
    }

    #[test]
    fn test_sphere_sphere_touching_does_not_collide() {
        let sphere = SphereCollider::new(Vec3::ZERO, 1.0);
        let ta = Transform::from_position(Vec3::new(2.0, 0.0, 0.0));
        let points = sphere_sphere(&sphere, &ta, &sphere, &Transform::default());
        assert!(!points.did_collide);
    }

    #[test]
    fn test_sphere_plane_never_collides() {
        let sphere = SphereCollider::new(Vec3::ZERO, 100.0);
        let t = Transform::default();
        assert!(!sphere_plane(&sphere, &t, &floor_plane(), &t).did_collide);
        assert!(!plane_sphere(&floor_plane(), &t, &sphere, &t).did_collide);
    }
}
