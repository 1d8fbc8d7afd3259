//! Tiny rigid-body physics: shapes, pairwise collision detection, integration,
//! and raycasting.
//!
//! Bodies live wherever the caller keeps them (normally the [`RigidBody`] ECS
//! component). The [`PhysicsWorld`] only stores [`BodyHandle`]s and resolves
//! them through the [`BodyView`] / [`BodySet`] traits on every call.

pub mod algorithms;
mod body;
mod collider;
mod collision;
pub mod ecs;
mod geometry;
mod world;

pub use body::{Body, BodyHandle, BodyType};
pub use collider::{Collider, ColliderKind, PlaneCollider, SphereCollider, test_collision};
pub use collision::{CollisionEvent, CollisionPoints};
pub use ecs::{PlaneColliderComponent, RigidBody, SphereColliderComponent, entity_handle, handle_entity};
pub use geometry::{Ray, Transform};
pub use world::{
    BodySet, BodyView, CollisionCallback, DEFAULT_FLOOR_HEIGHT, DEFAULT_GRAVITY,
    DEFAULT_RAYCAST_DISTANCE, PhysicsWorld, PhysicsWorldProperties, RaycastHit, RaycastMode,
};
