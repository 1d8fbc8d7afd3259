//! The physics world: body registry, collision detection, integration and
//! raycasting.
//!
//! The world never owns bodies. Each call resolves handles through a
//! [`BodyView`] (read) or [`BodySet`] (write), so the same world drives both
//! an ECS `World` and a plain map of bodies.

use std::collections::HashMap;
use std::hash::BuildHasher;

use bevy_ecs::prelude::*;
use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::algorithms::{distance_along, ray_sphere_nearest};
use crate::{Body, BodyHandle, Collider, CollisionEvent, CollisionPoints, Ray, Transform};

/// Lowest Y a simulated body may reach.
pub const DEFAULT_FLOOR_HEIGHT: f32 = 1.4;

pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Reach used by picking when the caller has no better bound.
pub const DEFAULT_RAYCAST_DISTANCE: f32 = 1000.0;

/// Read access to bodies by handle.
pub trait BodyView {
    fn body(&self, handle: BodyHandle) -> Option<&Body>;
}

/// Write access to bodies by handle.
pub trait BodySet: BodyView {
    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body>;
}

impl<S: BuildHasher> BodyView for HashMap<BodyHandle, Body, S> {
    fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.get(&handle)
    }
}

impl<S: BuildHasher> BodySet for HashMap<BodyHandle, Body, S> {
    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.get_mut(&handle)
    }
}

/// Which hit [`PhysicsWorld::raycast`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RaycastMode {
    /// First body in registration order whose collider is hit. Spheres
    /// report the far intersection.
    #[default]
    FirstRegistered,
    /// Closest hit in front of the ray origin.
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsWorldProperties {
    pub gravity: Vec3,
    pub floor_height: f32,
    pub raycast_mode: RaycastMode,
}

impl Default for PhysicsWorldProperties {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            floor_height: DEFAULT_FLOOR_HEIGHT,
            raycast_mode: RaycastMode::default(),
        }
    }
}

/// A successful raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub point: Vec3,
    /// Handle the body is registered under.
    pub body: BodyHandle,
    /// Owner recorded on the body.
    pub owner: BodyHandle,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
}

/// Collision callback: `(points, owner_a, owner_b)`.
pub type CollisionCallback = Box<dyn FnMut(&CollisionPoints, BodyHandle, BodyHandle) + Send + Sync>;

/// Registry of simulated bodies plus world properties.
#[derive(Resource, Default)]
pub struct PhysicsWorld {
    bodies: Vec<BodyHandle>,
    properties: PhysicsWorldProperties,
    on_enter: Option<CollisionCallback>,
    on_exit: Option<CollisionCallback>,
    /// Pairs overlapping after the last detection pass, keyed by handle and
    /// mapped to their owners.
    contacts: FxHashMap<(BodyHandle, BodyHandle), (BodyHandle, BodyHandle)>,
    /// Owners of contacts ended by `remove_body`, reported on the next pass.
    removed_contacts: Vec<(BodyHandle, BodyHandle)>,
}

impl std::fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("bodies", &self.bodies)
            .field("properties", &self.properties)
            .field("contacts", &self.contacts.len())
            .finish_non_exhaustive()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_properties(properties: PhysicsWorldProperties) -> Self {
        Self {
            properties,
            ..Self::default()
        }
    }

    pub fn properties(&self) -> &PhysicsWorldProperties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PhysicsWorldProperties {
        &mut self.properties
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.properties.gravity = gravity;
    }

    /// Registered handles in registration order.
    pub fn bodies(&self) -> &[BodyHandle] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(&handle)
    }

    /// Register a body. Registering the same handle twice is a caller bug.
    pub fn add_body(&mut self, handle: BodyHandle) {
        let duplicate = self.contains(handle);
        debug_assert!(!duplicate, "body {handle:?} registered twice");
        if duplicate {
            tracing::warn!("Ignoring duplicate registration of body {:?}", handle);
            return;
        }
        self.bodies.push(handle);
        tracing::trace!("Registered body {:?} ({} total)", handle, self.bodies.len());
    }

    /// Unregister a body. Unknown handles are ignored.
    ///
    /// Contacts the body was part of end with an `Exit` on the next
    /// detection pass.
    pub fn remove_body(&mut self, handle: BodyHandle) {
        self.bodies.retain(|&h| h != handle);

        let mut ended: Vec<_> = self
            .contacts
            .iter()
            .filter(|(pair, _)| pair.0 == handle || pair.1 == handle)
            .map(|(&pair, &owners)| (pair, owners))
            .collect();
        ended.sort_unstable_by_key(|&(pair, _)| pair);
        for (pair, owners) in ended {
            self.contacts.remove(&pair);
            self.removed_contacts.push(owners);
        }
    }

    /// Drop every registration and remembered contact.
    pub fn clear(&mut self) {
        tracing::debug!("Clearing physics world ({} bodies)", self.bodies.len());
        self.bodies.clear();
        self.contacts.clear();
        self.removed_contacts.clear();
    }

    pub fn set_on_collision_enter(
        &mut self,
        callback: impl FnMut(&CollisionPoints, BodyHandle, BodyHandle) + Send + Sync + 'static,
    ) {
        self.on_enter = Some(Box::new(callback));
    }

    pub fn set_on_collision_exit(
        &mut self,
        callback: impl FnMut(&CollisionPoints, BodyHandle, BodyHandle) + Send + Sync + 'static,
    ) {
        self.on_exit = Some(Box::new(callback));
    }

    /// Test every unordered pair of registered bodies with colliders.
    ///
    /// Pairs are visited as `(later, earlier)` in registration order. Every
    /// overlapping pair yields an `Enter`; pairs that overlapped on the
    /// previous pass and no longer do yield one `Exit` each, after all enters.
    /// Contacts ended by [`remove_body`](Self::remove_body) are reported first
    /// among the exits.
    pub fn detect_collisions<V: BodyView + ?Sized>(&mut self, bodies: &V) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        let mut current = FxHashMap::default();

        for (i, &ha) in self.bodies.iter().enumerate() {
            let Some(body_a) = bodies.body(ha) else {
                continue;
            };
            let Some(collider_a) = body_a.collider.as_ref() else {
                continue;
            };

            for &hb in &self.bodies[..i] {
                let Some(body_b) = bodies.body(hb) else {
                    continue;
                };
                let Some(collider_b) = body_b.collider.as_ref() else {
                    continue;
                };

                let points = collider_a.test(&body_a.transform, collider_b, &body_b.transform);
                if points.did_collide {
                    let (a, b) = (body_a.owner(), body_b.owner());
                    current.insert((ha, hb), (a, b));
                    events.push(CollisionEvent::Enter { points, a, b });
                }
            }
        }

        events.extend(
            self.removed_contacts
                .drain(..)
                .map(|(a, b)| CollisionEvent::Exit {
                    points: CollisionPoints::NONE,
                    a,
                    b,
                }),
        );

        let mut ended: Vec<_> = self
            .contacts
            .iter()
            .filter(|(pair, _)| !current.contains_key(*pair))
            .map(|(&pair, &owners)| (pair, owners))
            .collect();
        ended.sort_unstable_by_key(|&(pair, _)| pair);
        events.extend(ended.into_iter().map(|(_, (a, b))| CollisionEvent::Exit {
            points: CollisionPoints::NONE,
            a,
            b,
        }));

        self.contacts = current;
        events
    }

    /// Integrate every registered body, in registration order.
    pub fn integrate<S: BodySet + ?Sized>(&self, bodies: &mut S, dt: f32) {
        let PhysicsWorldProperties {
            gravity,
            floor_height,
            ..
        } = self.properties;

        for &handle in &self.bodies {
            match bodies.body_mut(handle) {
                Some(body) => body.integrate(gravity, floor_height, dt),
                None => tracing::trace!("Skipping stale body {:?}", handle),
            }
        }
    }

    /// Advance the simulation by `dt`: detect collisions, notify the installed
    /// callbacks, then integrate.
    pub fn step<S: BodySet + ?Sized>(&mut self, bodies: &mut S, dt: f32) {
        self.step_with(bodies, dt, |_, _| {});
    }

    /// Like [`step`](Self::step), additionally handing each event to
    /// `listener` with mutable access to the bodies. Events are delivered
    /// before integration.
    pub fn step_with<S, F>(&mut self, bodies: &mut S, dt: f32, mut listener: F)
    where
        S: BodySet + ?Sized,
        F: FnMut(&mut S, &CollisionEvent),
    {
        let events = self.detect_collisions(&*bodies);
        for event in &events {
            self.notify(event);
            listener(bodies, event);
        }
        self.integrate(bodies, dt);
    }

    fn notify(&mut self, event: &CollisionEvent) {
        let (callback, points, a, b) = match event {
            CollisionEvent::Enter { points, a, b } => (self.on_enter.as_mut(), points, *a, *b),
            CollisionEvent::Exit { points, a, b } => (self.on_exit.as_mut(), points, *a, *b),
        };
        if let Some(callback) = callback {
            callback(points, a, b);
        }
    }

    /// Cast `ray` against every registered body with a collider.
    ///
    /// Hits farther than `max_distance` from the ray origin are ignored.
    pub fn raycast<V: BodyView + ?Sized>(
        &self,
        bodies: &V,
        ray: &Ray,
        max_distance: f32,
    ) -> Option<RaycastHit> {
        let ray_collider = Collider::Ray(*ray);
        let identity = Transform::default();

        let mut hits = self.bodies.iter().filter_map(|&handle| {
            let body = bodies.body(handle)?;
            let collider = body.collider.as_ref()?;
            let points = match (self.properties.raycast_mode, collider) {
                (RaycastMode::Nearest, Collider::Sphere(sphere)) => {
                    ray_sphere_nearest(ray, sphere, &body.transform)
                }
                _ => collider.test(&body.transform, &ray_collider, &identity),
            };
            if !points.did_collide {
                return None;
            }
            let distance = distance_along(ray, points.a);
            (distance <= max_distance).then_some(RaycastHit {
                point: points.a,
                body: handle,
                owner: body.owner(),
                distance,
            })
        });

        match self.properties.raycast_mode {
            RaycastMode::FirstRegistered => hits.next(),
            RaycastMode::Nearest => hits.min_by(|a, b| a.distance.total_cmp(&b.distance)),
        }
    }

    /// Whether the pair is currently remembered as overlapping.
    pub fn in_contact(&self, a: BodyHandle, b: BodyHandle) -> bool {
        self.contacts.contains_key(&(a, b)) || self.contacts.contains_key(&(b, a))
    }
}

#[cfg(test)]
#[path = "world_tests.rs"]
mod tests;
