//! Native scripts bound to entities.
//!
//! A [`NativeScript`] component owns one boxed [`ScriptableEntity`]. While a
//! hook runs, the instance is taken out of its component and handed a
//! [`ScriptContext`] with mutable access to the whole world, then put back.

use std::any::Any;

use bevy_ecs::prelude::*;
use bevy_ecs::world::Mut;
use sge_ecs::{DestroyQueue, InputState, SpawnQueue, TimeStep};
use sge_physics::{CollisionPoints, PhysicsWorld, Ray, RaycastHit, handle_entity};
use sge_render::{Camera3D, screen_to_world_ray};

use crate::SceneData;
use crate::scene::duplicate_entity;

/// Upcast to [`Any`] for typed access to script instances.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behaviour attached to an entity.
///
/// Lifecycle: `on_create` once, `on_start` after create and on every
/// transition to play, `on_update` every playing frame, `on_destroy` when the
/// entity is removed. Every hook defaults to a no-op.
pub trait ScriptableEntity: AsAny + Send + Sync {
    /// Name used by the script registry and scene files.
    fn kind(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn on_create(&mut self, _ctx: &mut ScriptContext<'_>) {}

    fn on_start(&mut self, _ctx: &mut ScriptContext<'_>) {}

    fn on_update(&mut self, _ctx: &mut ScriptContext<'_>, _ts: TimeStep) {}

    fn on_destroy(&mut self, _ctx: &mut ScriptContext<'_>) {}

    /// Called while this entity overlaps `other`. Return `true` to stop the
    /// other entity's script from seeing the same contact.
    fn on_collision_enter(
        &mut self,
        _ctx: &mut ScriptContext<'_>,
        _points: &CollisionPoints,
        _other: Entity,
    ) -> bool {
        false
    }

    /// Called once when a contact with `other` ends.
    fn on_collision_exit(&mut self, _ctx: &mut ScriptContext<'_>, _other: Entity) {}
}

impl dyn ScriptableEntity {
    pub fn downcast_ref<T: ScriptableEntity>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: ScriptableEntity>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Component binding a script instance to its entity.
#[derive(Component)]
pub struct NativeScript {
    kind: String,
    pub(crate) instance: Option<Box<dyn ScriptableEntity>>,
    pub(crate) created: bool,
}

impl NativeScript {
    pub fn new(script: impl ScriptableEntity) -> Self {
        Self::from_boxed(Box::new(script))
    }

    pub fn from_boxed(script: Box<dyn ScriptableEntity>) -> Self {
        Self {
            kind: script.kind().to_string(),
            instance: Some(script),
            created: false,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Whether `on_create` has run.
    pub fn is_created(&self) -> bool {
        self.created
    }

    /// The instance, unless its own hook is currently running.
    pub fn instance(&self) -> Option<&dyn ScriptableEntity> {
        self.instance.as_deref()
    }

    pub fn get<T: ScriptableEntity>(&self) -> Option<&T> {
        self.instance.as_deref()?.downcast_ref::<T>()
    }

    pub fn get_mut<T: ScriptableEntity>(&mut self) -> Option<&mut T> {
        self.instance.as_deref_mut()?.downcast_mut::<T>()
    }
}

impl std::fmt::Debug for NativeScript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeScript")
            .field("kind", &self.kind)
            .field("created", &self.created)
            .field("attached", &self.instance.is_some())
            .finish()
    }
}

/// Everything a script hook may touch.
pub struct ScriptContext<'w> {
    entity: Entity,
    world: &'w mut World,
}

impl<'w> ScriptContext<'w> {
    pub(crate) fn new(entity: Entity, world: &'w mut World) -> Self {
        Self { entity, world }
    }

    /// The entity this script is attached to.
    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn world(&self) -> &World {
        &*self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut *self.world
    }

    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.world.get::<C>(entity)
    }

    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<Mut<'_, C>> {
        self.world.get_mut::<C>(entity)
    }

    /// Component on this script's own entity.
    pub fn component<C: Component>(&self) -> Option<&C> {
        self.world.get::<C>(self.entity)
    }

    pub fn component_mut<C: Component>(&mut self) -> Option<Mut<'_, C>> {
        self.world.get_mut::<C>(self.entity)
    }

    pub fn resource<R: Resource>(&self) -> Option<&R> {
        self.world.get_resource::<R>()
    }

    pub fn resource_mut<R: Resource>(&mut self) -> Option<Mut<'_, R>> {
        self.world.get_resource_mut::<R>()
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.world.get_entity(entity).is_ok()
    }

    /// Another entity's script, downcast to `T`. `None` for this script's own
    /// entity while its hook runs.
    pub fn script<T: ScriptableEntity>(&self, entity: Entity) -> Option<&T> {
        self.world.get::<NativeScript>(entity)?.get::<T>()
    }

    pub fn script_mut<T: ScriptableEntity>(&mut self, entity: Entity) -> Option<&mut T> {
        self.world
            .get_mut::<NativeScript>(entity)?
            .into_inner()
            .get_mut::<T>()
    }

    /// Cast a ray against the scene's physics world.
    ///
    /// Returns `None` while a collision is being routed, since the physics
    /// world is busy stepping.
    pub fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RaycastHit> {
        let world: &World = &*self.world;
        world.get_resource::<PhysicsWorld>()?.raycast(world, ray, max_distance)
    }

    /// Like [`raycast`](Self::raycast), resolving the hit to its entity.
    pub fn raycast_entity(&self, ray: &Ray, max_distance: f32) -> Option<(Entity, RaycastHit)> {
        let hit = self.raycast(ray, max_distance)?;
        Some((handle_entity(hit.owner)?, hit))
    }

    pub fn input(&self) -> &InputState {
        self.world.resource::<InputState>()
    }

    pub fn scene_data(&self) -> &SceneData {
        self.world.resource::<SceneData>()
    }

    /// The main camera, if the scene has one.
    pub fn main_camera(&self) -> Option<&Camera3D> {
        let entity = self.scene_data().main_camera?;
        self.world
            .get::<sge_ecs::CameraComponent>(entity)
            .map(|c| &c.camera)
    }

    /// World-space ray from the main camera through the cursor.
    pub fn cursor_ray(&self) -> Option<Ray> {
        let camera = self.main_camera()?;
        let data = self.scene_data();
        let cursor = self.input().mouse_position();
        let direction = screen_to_world_ray(cursor, data.viewport, data.projection, data.view);
        (direction != glam::Vec3::ZERO).then(|| Ray::new(camera.position, direction))
    }

    /// Queue `entity` for destruction at the end of the frame.
    pub fn remove_entity(&mut self, entity: Entity) {
        self.world.resource_mut::<DestroyQueue>().enqueue(entity);
    }

    /// Queue a bundle to be spawned at the end of the frame.
    pub fn spawn<B: Bundle + Send + Sync + 'static>(&mut self, bundle: B) {
        self.world.resource_mut::<SpawnQueue>().enqueue(bundle);
    }

    pub fn spawn_with(
        &mut self,
        spawn: impl FnOnce(&mut World) -> Entity + Send + Sync + 'static,
    ) {
        self.world.resource_mut::<SpawnQueue>().enqueue_with(spawn);
    }

    /// Queue a copy of `entity` (fresh script instance included) to be
    /// spawned at the end of the frame, after `prepare` runs on it.
    pub fn duplicate_entity(
        &mut self,
        entity: Entity,
        prepare: impl FnOnce(&mut World, Entity) + Send + Sync + 'static,
    ) {
        self.spawn_with(move |world| {
            let copy = duplicate_entity(world, entity);
            prepare(world, copy);
            copy
        });
    }
}

/// Run `f` on the script attached to `entity`.
///
/// Returns `None` when the entity has no script or its instance is already
/// checked out.
pub(crate) fn invoke_script<R>(
    world: &mut World,
    entity: Entity,
    f: impl FnOnce(&mut dyn ScriptableEntity, &mut ScriptContext<'_>) -> R,
) -> Option<R> {
    let mut instance = world.get_mut::<NativeScript>(entity)?.instance.take()?;

    let result = {
        let mut ctx = ScriptContext::new(entity, world);
        f(instance.as_mut(), &mut ctx)
    };

    match world.get_mut::<NativeScript>(entity) {
        Some(mut script) => script.instance = Some(instance),
        None => tracing::trace!("Script entity {:?} lost its script during a hook", entity),
    }
    Some(result)
}

/// Run `on_create` if it has not run yet. Returns whether it ran.
pub(crate) fn ensure_created(world: &mut World, entity: Entity) -> bool {
    {
        let Some(mut script) = world.get_mut::<NativeScript>(entity) else {
            return false;
        };
        if script.created || script.instance.is_none() {
            return false;
        }
        script.created = true;
    }
    invoke_script(world, entity, |script, ctx| script.on_create(ctx));
    true
}
