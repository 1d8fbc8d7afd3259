//! The scene: world ownership, play/pause state and the per-frame driver.

use bevy_ecs::prelude::*;
use glam::{Mat4, Vec2};
use sge_ecs::{
    CameraComponent, DestroyQueue, MeshRenderer, SkinnedMeshRenderer, Tag, TimeRes, TimeStep,
    TransformComponent, create_world, flush_spawn_queue,
};
use sge_physics::{
    CollisionEvent, PhysicsWorld, PhysicsWorldProperties, PlaneColliderComponent, RigidBody,
    SphereColliderComponent, entity_handle, handle_entity,
};
use sge_render::{InstanceRenderer, ModelLibrary, RenderBackend};

use crate::script::{ensure_created, invoke_script};
use crate::{NativeScript, ScriptRegistry, ScriptableEntity, systems};

/// Name given to entities created without one.
pub const DEFAULT_ENTITY_NAME: &str = "Entity";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneState {
    #[default]
    Pause,
    Play,
}

/// Viewport and main-camera matrices, refreshed every frame.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SceneData {
    pub main_camera: Option<Entity>,
    /// Viewport size in pixels.
    pub viewport: Vec2,
    pub view: Mat4,
    pub projection: Mat4,
}

impl Default for SceneData {
    fn default() -> Self {
        Self {
            main_camera: None,
            viewport: Vec2::new(1280.0, 720.0),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }
}

/// Instance renderers filled by the scene each frame.
#[derive(Debug, Default)]
pub struct SceneRenderers {
    pub meshes: InstanceRenderer,
    pub skinned: InstanceRenderer,
}

pub struct Scene {
    name: String,
    world: World,
    state: SceneState,
    renderers: SceneRenderers,
    models: ModelLibrary,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_physics(name, PhysicsWorldProperties::default())
    }

    pub fn with_physics(name: impl Into<String>, properties: PhysicsWorldProperties) -> Self {
        let mut world = create_world();
        world.insert_resource(PhysicsWorld::with_properties(properties));
        world.insert_resource(SceneData::default());
        world.insert_resource(ScriptRegistry::default());

        let name = name.into();
        tracing::debug!("Created scene '{}'", name);
        Self {
            name,
            world,
            state: SceneState::Pause,
            renderers: SceneRenderers::default(),
            models: ModelLibrary::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == SceneState::Play
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn physics(&self) -> &PhysicsWorld {
        self.world.resource::<PhysicsWorld>()
    }

    pub fn physics_mut(&mut self) -> Mut<'_, PhysicsWorld> {
        self.world.resource_mut::<PhysicsWorld>()
    }

    pub fn models(&self) -> &ModelLibrary {
        &self.models
    }

    pub fn models_mut(&mut self) -> &mut ModelLibrary {
        &mut self.models
    }

    pub fn renderers(&self) -> &SceneRenderers {
        &self.renderers
    }

    pub fn scene_data(&self) -> &SceneData {
        self.world.resource::<SceneData>()
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.world.resource_mut::<SceneData>().viewport = Vec2::new(width, height);
    }

    pub fn script_registry_mut(&mut self) -> Mut<'_, ScriptRegistry> {
        self.world.resource_mut::<ScriptRegistry>()
    }

    /// Make `T` available to scene files and duplication.
    pub fn register_script<T: ScriptableEntity + Default>(&mut self) {
        self.script_registry_mut().register_default::<T>();
    }

    /// Spawn an entity with a [`Tag`] and a default [`TransformComponent`].
    pub fn create_entity(&mut self, name: &str) -> Entity {
        let name = if name.is_empty() { DEFAULT_ENTITY_NAME } else { name };
        self.world
            .spawn((Tag::new(name), TransformComponent::default()))
            .id()
    }

    /// Immediately copy `entity` and its components.
    pub fn duplicate_entity(&mut self, entity: Entity) -> Entity {
        duplicate_entity(&mut self.world, entity)
    }

    /// Queue `entity` for destruction at the end of the current frame.
    pub fn remove_entity(&mut self, entity: Entity) {
        self.world.resource_mut::<DestroyQueue>().enqueue(entity);
    }

    pub fn find_entity(&mut self, name: &str) -> Option<Entity> {
        let mut query = self.world.query::<(Entity, &Tag)>();
        query
            .iter(&self.world)
            .find(|(_, tag)| tag.as_str() == name)
            .map(|(entity, _)| entity)
    }

    pub fn entity_count(&self) -> usize {
        self.world.entities().len() as usize
    }

    /// Pause → Play. Registers bodies, creates scripts that need it and
    /// starts every script.
    pub fn on_scene_play(&mut self) {
        if self.is_playing() {
            tracing::debug!("Scene '{}' is already playing", self.name);
            return;
        }

        let registered = systems::register_bodies(&mut self.world);
        self.state = SceneState::Play;
        tracing::debug!("Scene '{}' playing ({} bodies registered)", self.name, registered);

        for entity in self.script_entities() {
            ensure_created(&mut self.world, entity);
            invoke_script(&mut self.world, entity, |script, ctx| script.on_start(ctx));
        }
    }

    /// Play → Pause. Forgets every body; scripts keep their state.
    pub fn on_scene_stop(&mut self) {
        if !self.is_playing() {
            tracing::debug!("Scene '{}' is not playing", self.name);
            return;
        }

        self.state = SceneState::Pause;
        self.world.resource_mut::<PhysicsWorld>().clear();
        systems::unregister_bodies(&mut self.world);
        tracing::debug!("Scene '{}' stopped", self.name);
    }

    /// Advance one frame.
    pub fn update(&mut self, ts: TimeStep) {
        let playing = self.is_playing();
        self.world.resource_mut::<TimeRes>().advance(ts, playing);

        if playing {
            self.update_scripts(ts);
            self.step_physics(ts);
        }

        systems::update_cameras(&mut self.world);
        systems::submit_draws(&mut self.world, &mut self.renderers);

        self.destroy_pending();
        flush_spawn_queue(&mut self.world);
    }

    /// Flush the frame's draws to `backend`.
    pub fn render(&mut self, backend: &mut dyn RenderBackend) {
        self.renderers.meshes.end(backend);
        self.renderers.skinned.end(backend);
    }

    fn script_entities(&mut self) -> Vec<Entity> {
        let mut query = self.world.query_filtered::<Entity, With<NativeScript>>();
        query.iter(&self.world).collect()
    }

    fn update_scripts(&mut self, ts: TimeStep) {
        for entity in self.script_entities() {
            if ensure_created(&mut self.world, entity) {
                invoke_script(&mut self.world, entity, |script, ctx| script.on_start(ctx));
            }
            invoke_script(&mut self.world, entity, |script, ctx| script.on_update(ctx, ts));
        }
    }

    fn step_physics(&mut self, ts: TimeStep) {
        self.world
            .resource_scope(|world, mut physics: Mut<PhysicsWorld>| {
                physics.step_with(world, ts.seconds(), route_collision);
            });

        systems::register_bodies(&mut self.world);
        systems::sync_transforms(&mut self.world);
    }

    fn destroy_pending(&mut self) {
        let queued = self.world.resource_mut::<DestroyQueue>().take();
        for entity in queued {
            if self.world.get_entity(entity).is_err() {
                continue;
            }
            self.world
                .resource_mut::<PhysicsWorld>()
                .remove_body(entity_handle(entity));
            invoke_script(&mut self.world, entity, |script, ctx| script.on_destroy(ctx));
            self.world.despawn(entity);
            tracing::trace!("Destroyed entity {:?}", entity);
        }
    }
}

/// Hand a collision event to the scripts of both owners.
///
/// For an enter, `a`'s script sees it first and may consume it by returning
/// `true`; otherwise `b`'s script sees it too.
fn route_collision(world: &mut World, event: &CollisionEvent) {
    let (a, b) = event.owners();
    let (Some(a), Some(b)) = (handle_entity(a), handle_entity(b)) else {
        return;
    };

    match event {
        CollisionEvent::Enter { points, .. } => {
            let consumed = invoke_script(world, a, |script, ctx| {
                script.on_collision_enter(ctx, points, b)
            })
            .unwrap_or(false);
            if !consumed {
                invoke_script(world, b, |script, ctx| script.on_collision_enter(ctx, points, a));
            }
        }
        CollisionEvent::Exit { .. } => {
            invoke_script(world, a, |script, ctx| script.on_collision_exit(ctx, b));
            invoke_script(world, b, |script, ctx| script.on_collision_exit(ctx, a));
        }
    }
}

fn copy_component<C: Component + Clone>(world: &mut World, from: Entity, to: Entity) {
    if let Some(component) = world.get::<C>(from).cloned() {
        world.entity_mut(to).insert(component);
    }
}

/// Spawn a copy of `source` with the same tag, transform, renderers,
/// colliders and body. The body starts unregistered and the script is a
/// fresh instance of the same kind from the [`ScriptRegistry`].
pub fn duplicate_entity(world: &mut World, source: Entity) -> Entity {
    let copy = world.spawn_empty().id();
    if world.get_entity(source).is_err() {
        tracing::warn!("Duplicating missing entity {:?}", source);
        return copy;
    }

    copy_component::<Tag>(world, source, copy);
    copy_component::<TransformComponent>(world, source, copy);
    copy_component::<MeshRenderer>(world, source, copy);
    copy_component::<SkinnedMeshRenderer>(world, source, copy);
    copy_component::<PlaneColliderComponent>(world, source, copy);
    copy_component::<SphereColliderComponent>(world, source, copy);

    if let Some(camera) = world.get::<CameraComponent>(source) {
        let camera = CameraComponent {
            camera: camera.camera.clone(),
            primary: false,
        };
        world.entity_mut(copy).insert(camera);
    }

    if let Some(rb) = world.get::<RigidBody>(source) {
        let mut body = rb.body.clone();
        body.force = glam::Vec3::ZERO;
        world.entity_mut(copy).insert(RigidBody {
            body,
            registered: false,
        });
    }

    let kind = world.get::<NativeScript>(source).map(|s| s.kind().to_string());
    if let Some(kind) = kind {
        let script = world
            .get_resource::<ScriptRegistry>()
            .and_then(|registry| registry.instantiate(&kind));
        match script {
            Some(script) => {
                world.entity_mut(copy).insert(script);
            }
            None => tracing::warn!("Cannot duplicate script '{}': kind not registered", kind),
        }
    }

    copy
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
