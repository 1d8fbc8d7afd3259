//! RON scene files.
//!
//! A scene file lists entities by the components they carry. Model handles
//! are stored as paths and scripts by kind, so loading needs the models
//! re-interned and the script kinds registered.

use std::path::Path;

use bevy_ecs::prelude::*;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use sge_ecs::{CameraComponent, MeshRenderer, SkinnedMeshRenderer, Tag, TransformComponent};
use sge_physics::{
    Body, BodyType, PlaneCollider, PlaneColliderComponent, RigidBody, SphereCollider,
    SphereColliderComponent,
};
use sge_render::{Camera3D, ModelHandle, ModelLibrary};

use crate::{NativeScript, Scene, SceneError, ScriptRegistry};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    pub scene: String,
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh_renderer: Option<ModelRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skinned_mesh_renderer: Option<ModelRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rigid_body: Option<RigidBodyRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plane_collider: Option<PlaneCollider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sphere_collider: Option<SphereCollider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_script: Option<ScriptRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformRecord {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for TransformRecord {
    fn default() -> Self {
        let t = TransformComponent::default();
        Self {
            position: t.position,
            rotation: t.rotation,
            scale: t.scale,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraRecord {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub zoom: f32,
    pub primary: bool,
}

impl Default for CameraRecord {
    fn default() -> Self {
        let camera = Camera3D::default();
        Self {
            position: camera.position,
            yaw: camera.yaw,
            pitch: camera.pitch,
            zoom: camera.zoom,
            primary: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigidBodyRecord {
    pub body_type: BodyType,
    pub mass: f32,
    pub velocity: Vec3,
}

impl Default for RigidBodyRecord {
    fn default() -> Self {
        Self {
            body_type: BodyType::Static,
            mass: 1.0,
            velocity: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRecord {
    pub kind: String,
}

/// Reads and writes [`Scene`]s as RON.
pub struct SceneSerializer;

impl SceneSerializer {
    /// Snapshot `scene` into a [`SceneFile`], entities in spawn order.
    pub fn capture(scene: &Scene) -> SceneFile {
        let world = scene.world();
        let models = scene.models();

        let mut entities: Vec<Entity> = world.iter_entities().map(|e| e.id()).collect();
        entities.sort();

        SceneFile {
            scene: scene.name().to_string(),
            entities: entities
                .into_iter()
                .map(|entity| capture_entity(world, models, entity))
                .collect(),
        }
    }

    pub fn serialize_to_string(scene: &Scene) -> Result<String, SceneError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .enumerate_arrays(false);
        ron::ser::to_string_pretty(&Self::capture(scene), pretty)
            .map_err(SceneError::SerializeError)
    }

    pub fn save(scene: &Scene, path: &Path) -> Result<(), SceneError> {
        let contents = Self::serialize_to_string(scene)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(SceneError::WriteError)?;
        }
        std::fs::write(path, contents).map_err(SceneError::WriteError)?;
        tracing::info!("Saved scene '{}' to {}", scene.name(), path.display());
        Ok(())
    }

    /// Parse `source` and append its entities to `scene`, renaming the scene
    /// to the file's name. Returns how many entities were created.
    ///
    /// Every script kind is checked before anything is spawned, so an unknown
    /// kind leaves the scene untouched.
    pub fn deserialize_str(scene: &mut Scene, source: &str) -> Result<usize, SceneError> {
        let file: SceneFile = ron::from_str(source).map_err(SceneError::ParseError)?;
        Self::apply(scene, file)
    }

    pub fn apply(scene: &mut Scene, file: SceneFile) -> Result<usize, SceneError> {
        if file.scene.trim().is_empty() {
            return Err(SceneError::MissingSceneName);
        }

        let registry = scene.world().resource::<ScriptRegistry>();
        if let Some(kind) = file
            .entities
            .iter()
            .filter_map(|record| record.native_script.as_ref())
            .map(|script| script.kind.as_str())
            .find(|kind| !registry.contains(kind))
        {
            return Err(SceneError::UnknownScript(kind.to_string()));
        }
        if let Some((index, record, mass)) = file
            .entities
            .iter()
            .enumerate()
            .find_map(|(i, record)| {
                let mass = record.rigid_body?.mass;
                (!Body::is_valid_mass(mass)).then_some((i, record, mass))
            })
        {
            let entity = record.tag.clone().unwrap_or_else(|| format!("#{index}"));
            return Err(SceneError::InvalidMass { entity, mass });
        }

        scene.set_name(file.scene);
        let count = file.entities.len();
        for record in file.entities {
            let mesh = record
                .mesh_renderer
                .as_ref()
                .map(|m| scene.models_mut().load(&m.path));
            let skinned = record
                .skinned_mesh_renderer
                .as_ref()
                .map(|m| scene.models_mut().load(&m.path));
            spawn_entity(scene.world_mut(), record, mesh, skinned);
        }
        tracing::debug!("Loaded {} entities into scene '{}'", count, scene.name());
        Ok(count)
    }

    pub fn load(scene: &mut Scene, path: &Path) -> Result<usize, SceneError> {
        let contents = std::fs::read_to_string(path).map_err(SceneError::ReadError)?;
        let count = Self::deserialize_str(scene, &contents)?;
        tracing::info!("Loaded scene '{}' from {}", scene.name(), path.display());
        Ok(count)
    }
}

fn capture_entity(world: &World, models: &ModelLibrary, entity: Entity) -> EntityRecord {
    let model = |handle: ModelHandle| {
        let path = models.path(handle).unwrap_or_default();
        ModelRecord {
            path: path.to_string(),
        }
    };

    EntityRecord {
        tag: world.get::<Tag>(entity).map(|t| t.as_str().to_string()),
        transform: world.get::<TransformComponent>(entity).map(|t| TransformRecord {
            position: t.position,
            rotation: t.rotation,
            scale: t.scale,
        }),
        camera: world.get::<CameraComponent>(entity).map(|c| CameraRecord {
            position: c.camera.position,
            yaw: c.camera.yaw,
            pitch: c.camera.pitch,
            zoom: c.camera.zoom,
            primary: c.primary,
        }),
        mesh_renderer: world.get::<MeshRenderer>(entity).map(|m| model(m.model)),
        skinned_mesh_renderer: world
            .get::<SkinnedMeshRenderer>(entity)
            .map(|m| model(m.model)),
        rigid_body: world.get::<RigidBody>(entity).map(|rb| RigidBodyRecord {
            body_type: rb.body.body_type,
            mass: rb.body.mass,
            velocity: rb.body.velocity,
        }),
        plane_collider: world
            .get::<PlaneColliderComponent>(entity)
            .map(|c| c.collider),
        sphere_collider: world
            .get::<SphereColliderComponent>(entity)
            .map(|c| c.collider),
        native_script: world.get::<NativeScript>(entity).map(|s| ScriptRecord {
            kind: s.kind().to_string(),
        }),
    }
}

fn spawn_entity(
    world: &mut World,
    record: EntityRecord,
    mesh: Option<ModelHandle>,
    skinned: Option<ModelHandle>,
) -> Entity {
    let script = record.native_script.as_ref().and_then(|s| {
        world
            .resource::<ScriptRegistry>()
            .instantiate(&s.kind)
    });

    let mut entity = world.spawn_empty();
    if let Some(tag) = record.tag {
        entity.insert(Tag::new(tag));
    }
    if let Some(t) = record.transform {
        entity.insert(TransformComponent {
            position: t.position,
            rotation: t.rotation,
            scale: t.scale,
        });
    }
    if let Some(c) = record.camera {
        let mut camera = Camera3D::new(c.position);
        camera.yaw = c.yaw;
        camera.pitch = c.pitch;
        camera.zoom = c.zoom;
        camera.recalculate();
        entity.insert(CameraComponent {
            camera,
            primary: c.primary,
        });
    }
    if let Some(model) = mesh {
        entity.insert(MeshRenderer { model });
    }
    if let Some(model) = skinned {
        entity.insert(SkinnedMeshRenderer { model });
    }
    if let Some(rb) = record.rigid_body {
        let mut body = RigidBody::new(rb.body_type);
        body.body = body.body.with_mass(rb.mass).with_velocity(rb.velocity);
        entity.insert(body);
    }
    if let Some(collider) = record.plane_collider {
        entity.insert(PlaneColliderComponent { collider });
    }
    if let Some(collider) = record.sphere_collider {
        entity.insert(SphereColliderComponent { collider });
    }
    if let Some(script) = script {
        entity.insert(script);
    }
    entity.id()
}
