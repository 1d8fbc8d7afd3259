//! Per-frame passes the scene runs over its world.

use bevy_ecs::prelude::*;
use sge_ecs::{CameraComponent, MeshRenderer, SkinnedMeshRenderer, TransformComponent};
use sge_physics::{
    Collider, PhysicsWorld, PlaneColliderComponent, RigidBody, SphereColliderComponent,
    entity_handle,
};

use crate::{SceneData, SceneRenderers};

/// Register every `RigidBody` + `TransformComponent` entity not yet known to
/// the physics world. Returns how many were added.
pub(crate) fn register_bodies(world: &mut World) -> usize {
    let mut query = world.query::<(
        Entity,
        &TransformComponent,
        &mut RigidBody,
        Option<&PlaneColliderComponent>,
        Option<&SphereColliderComponent>,
    )>();

    let mut added = Vec::new();
    for (entity, transform, mut rb, plane, sphere) in query.iter_mut(world) {
        if rb.registered {
            continue;
        }
        let handle = entity_handle(entity);
        let physics_transform = transform.to_physics();

        rb.body.transform = physics_transform;
        rb.body.set_owner(handle);
        rb.body.collider = match (plane, sphere) {
            (_, Some(sphere)) => Some(Collider::Sphere(sphere.collider)),
            (Some(plane), None) => {
                let mut collider = plane.collider;
                collider.normal = physics_transform.up();
                Some(Collider::Plane(collider))
            }
            (None, None) => None,
        };
        rb.registered = true;
        added.push(handle);
    }

    if added.is_empty() {
        return 0;
    }
    let mut physics = world.resource_mut::<PhysicsWorld>();
    for &handle in &added {
        physics.add_body(handle);
    }
    tracing::trace!("Registered {} bodies", added.len());
    added.len()
}

/// Copy simulated body positions back into transforms.
pub(crate) fn sync_transforms(world: &mut World) {
    let mut query = world.query::<(&RigidBody, &mut TransformComponent)>();
    for (rb, mut transform) in query.iter_mut(world) {
        if rb.registered && transform.position != rb.position() {
            transform.position = rb.position();
        }
    }
}

/// Mark every body unregistered.
pub(crate) fn unregister_bodies(world: &mut World) {
    let mut query = world.query::<&mut RigidBody>();
    for mut rb in query.iter_mut(world) {
        rb.registered = false;
    }
}

/// Move primary cameras to their entity's transform, recompute their
/// matrices and publish the first one as the main camera. Other cameras are
/// inactive and left untouched.
pub(crate) fn update_cameras(world: &mut World) {
    let viewport = world.resource::<SceneData>().viewport;
    let aspect = if viewport.y > 0.0 {
        viewport.x / viewport.y
    } else {
        1.0
    };

    let mut main = None;
    let mut query =
        world.query::<(Entity, &mut CameraComponent, Option<&TransformComponent>)>();
    for (entity, mut component, transform) in query.iter_mut(world) {
        if !component.primary {
            continue;
        }
        if let Some(transform) = transform {
            component.camera.position = transform.position;
        }
        component.camera.recalculate();
        if main.is_none() {
            main = Some((
                entity,
                component.camera.view_matrix(),
                component.camera.projection_matrix(aspect),
            ));
        }
    }

    let mut data = world.resource_mut::<SceneData>();
    match main {
        Some((entity, view, projection)) => {
            data.main_camera = Some(entity);
            data.view = view;
            data.projection = projection;
        }
        None => data.main_camera = None,
    }
}

/// Clear the renderers and submit every drawable entity.
pub(crate) fn submit_draws(world: &mut World, renderers: &mut SceneRenderers) {
    renderers.meshes.begin();
    renderers.skinned.begin();

    let mut meshes = world.query::<(&TransformComponent, &MeshRenderer)>();
    for (t, mesh) in meshes.iter(world) {
        renderers.meshes.draw(mesh.model, t.position, t.rotation, t.scale);
    }

    let mut skinned = world.query::<(&TransformComponent, &SkinnedMeshRenderer)>();
    for (t, mesh) in skinned.iter(world) {
        renderers.skinned.draw(mesh.model, t.position, t.rotation, t.scale);
    }
}
