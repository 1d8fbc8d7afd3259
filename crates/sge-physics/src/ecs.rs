//! ECS glue: body and collider components, and `World` as a body store.
//!
//! A body registered with the [`PhysicsWorld`](crate::PhysicsWorld) uses its
//! entity's bits as its [`BodyHandle`], so the handle resolves straight back
//! to the entity that carries the [`RigidBody`] component.

use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::{Body, BodyHandle, BodySet, BodyType, BodyView, PlaneCollider, SphereCollider};

/// Rigid body attached to an entity.
#[derive(Component, Debug, Clone, Default)]
pub struct RigidBody {
    pub body: Body,
    /// Whether the body is currently registered with the physics world.
    pub registered: bool,
}

impl RigidBody {
    pub fn new(body_type: BodyType) -> Self {
        Self {
            body: Body::new(body_type),
            registered: false,
        }
    }

    /// Queue an impulse for the next physics step.
    pub fn add_impulse(&mut self, impulse: Vec3) {
        self.body.add_force(impulse);
    }

    pub fn position(&self) -> Vec3 {
        self.body.position()
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.body.set_position(position);
    }

    pub fn body_type(&self) -> BodyType {
        self.body.body_type
    }

    pub fn set_body_type(&mut self, body_type: BodyType) {
        self.body.body_type = body_type;
    }
}

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlaneColliderComponent {
    pub collider: PlaneCollider,
}

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SphereColliderComponent {
    pub collider: SphereCollider,
}

impl SphereColliderComponent {
    pub fn new(radius: f32) -> Self {
        Self {
            collider: SphereCollider::new(Vec3::ZERO, radius),
        }
    }
}

/// Handle under which `entity`'s body is registered.
pub fn entity_handle(entity: Entity) -> BodyHandle {
    BodyHandle(entity.to_bits())
}

/// Entity a handle was made from, if the bits form a valid entity.
pub fn handle_entity(handle: BodyHandle) -> Option<Entity> {
    Entity::try_from_bits(handle.0).ok()
}

impl BodyView for World {
    fn body(&self, handle: BodyHandle) -> Option<&Body> {
        let entity = handle_entity(handle)?;
        self.get::<RigidBody>(entity).map(|rb| &rb.body)
    }
}

impl BodySet for World {
    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        let entity = handle_entity(handle)?;
        self.get_mut::<RigidBody>(entity)
            .map(|rb| &mut rb.into_inner().body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PhysicsWorld, Ray};

    fn spawn_body(world: &mut World, physics: &mut PhysicsWorld, body: Body) -> Entity {
        let entity = world.spawn_empty().id();
        let handle = entity_handle(entity);
        let mut rb = RigidBody { body, registered: true };
        rb.body.set_owner(handle);
        world.entity_mut(entity).insert(rb);
        physics.add_body(handle);
        entity
    }

    #[test]
    fn test_handle_roundtrip() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        assert_eq!(handle_entity(entity_handle(entity)), Some(entity));
    }

    #[test]
    fn test_add_impulse_accumulates() {
        let mut rb = RigidBody::new(BodyType::Dynamic);
        rb.add_impulse(Vec3::X);
        rb.add_impulse(Vec3::Y);
        assert_eq!(rb.body.force, Vec3::new(1.0, 1.0, 0.0));
        assert!(!rb.registered);
    }

    #[test]
    fn test_world_steps_components() {
        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        let entity = spawn_body(
            &mut world,
            &mut physics,
            Body::new(BodyType::Dynamic).with_position(Vec3::new(0.0, 10.0, 0.0)),
        );

        physics.step(&mut world, 0.1);
        let rb = world.get::<RigidBody>(entity).unwrap();
        assert!(rb.position().y < 10.0);
    }

    #[test]
    fn test_despawned_entity_is_skipped() {
        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        let entity = spawn_body(
            &mut world,
            &mut physics,
            Body::new(BodyType::Dynamic).with_collider(SphereCollider::new(Vec3::ZERO, 1.0)),
        );
        world.despawn(entity);

        assert!(world.body(entity_handle(entity)).is_none());
        physics.step(&mut world, 0.1);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!(physics.raycast(&world, &ray, 100.0).is_none());
    }

    #[test]
    fn test_collision_owners_are_entities() {
        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        let sphere = SphereCollider::new(Vec3::ZERO, 1.0);
        let a = spawn_body(&mut world, &mut physics, Body::default().with_collider(sphere));
        let b = spawn_body(
            &mut world,
            &mut physics,
            Body::default().with_position(Vec3::X).with_collider(sphere),
        );

        let mut seen = Vec::new();
        physics.step_with(&mut world, 0.1, |_, event| {
            let (first, second) = event.owners();
            seen.push((handle_entity(first), handle_entity(second)));
        });
        assert_eq!(seen, vec![(Some(b), Some(a))]);
    }
}
