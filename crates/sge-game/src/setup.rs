//! Builds the DNA demo scene from the engine configuration.

use glam::{Vec2, Vec3};
use sge_config::Config;
use sge_ecs::{CameraComponent, MeshRenderer, SkinnedMeshRenderer, TransformComponent};
use sge_physics::{
    BodyType, PhysicsWorldProperties, PlaneCollider, PlaneColliderComponent, RaycastMode,
    RigidBody, SphereColliderComponent,
};
use sge_render::Camera3D;
use sge_scene::{NativeScript, Scene, SceneError, SceneSerializer};

use crate::resources::{GameRng, Population};
use crate::scripts::{Board, CameraController, Food, Unit, register_scripts};

pub const CUBE_MODEL: &str = "assets/models/cube/cube.obj";
pub const UNIT_MODEL: &str = "assets/models/Mecha/Mecha.fbx";

/// Half extent of the board plane.
pub const BOARD_SIZE: f32 = 50.0;
pub const UNIT_RADIUS: f32 = 1.0;
pub const FOOD_RADIUS: f32 = 1.0;
pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 30.0, 40.0);
pub const CAMERA_PITCH: f32 = -35.0;

pub fn physics_properties(config: &Config) -> PhysicsWorldProperties {
    PhysicsWorldProperties {
        gravity: Vec3::from_array(config.physics.gravity),
        floor_height: config.physics.floor_height,
        raycast_mode: if config.physics.nearest_hit_raycast {
            RaycastMode::Nearest
        } else {
            RaycastMode::FirstRegistered
        },
    }
}

/// An empty DNA scene: physics, RNG, population counter, script kinds and
/// viewport configured, no entities.
pub fn empty_scene(config: &Config) -> Scene {
    let mut scene = Scene::with_physics("DNA", physics_properties(config));
    scene
        .world_mut()
        .insert_resource(GameRng::seeded(config.simulation.seed));
    scene.world_mut().insert_resource(Population::default());
    register_scripts(&mut scene);
    scene.set_viewport(config.window.width as f32, config.window.height as f32);
    scene
}

/// The built-in demo: units and food on a board, watched by a fly camera.
///
/// Units and food are spawned before the board so first-hit raycasts see
/// them before the board plane.
pub fn build_demo_scene(config: &Config) -> Scene {
    let mut scene = empty_scene(config);
    let cube = scene.models_mut().load(CUBE_MODEL);
    let mecha = scene.models_mut().load(UNIT_MODEL);

    for i in 0..config.simulation.units {
        let unit = scene.create_entity(&format!("Unit_{i}"));
        scene.world_mut().entity_mut(unit).insert((
            TransformComponent::from_position(Vec3::new(0.0, config.physics.floor_height, 0.0)),
            RigidBody::new(BodyType::Dynamic),
            SphereColliderComponent::new(UNIT_RADIUS),
            SkinnedMeshRenderer { model: mecha },
            NativeScript::new(Unit::default()),
        ));
    }

    for i in 0..config.simulation.food {
        let food = scene.create_entity(&format!("Food_{i}"));
        scene.world_mut().entity_mut(food).insert((
            TransformComponent::default().with_scale(Vec3::splat(0.5)),
            RigidBody::new(BodyType::Static),
            SphereColliderComponent::new(FOOD_RADIUS),
            MeshRenderer { model: cube },
            NativeScript::new(Food::default()),
        ));
    }

    let board = scene.create_entity("MainBoard");
    scene.world_mut().entity_mut(board).insert((
        TransformComponent::default().with_scale(Vec3::new(BOARD_SIZE, 1.0, BOARD_SIZE)),
        RigidBody::new(BodyType::Static),
        PlaneColliderComponent {
            collider: PlaneCollider::new(Vec3::ZERO, Vec3::Y, Vec2::splat(BOARD_SIZE)),
        },
        MeshRenderer { model: cube },
        NativeScript::new(Board::default()),
    ));

    let mut camera = Camera3D::new(CAMERA_POSITION);
    camera.pitch = CAMERA_PITCH;
    camera.recalculate();
    let camera_entity = scene.create_entity("Camera");
    scene.world_mut().entity_mut(camera_entity).insert((
        TransformComponent::from_position(CAMERA_POSITION),
        CameraComponent::primary(camera),
        NativeScript::new(CameraController::default()),
    ));

    tracing::info!(
        "Built demo scene: {} units, {} food",
        config.simulation.units,
        config.simulation.food
    );
    scene
}

/// The configured scene file if there is one, otherwise the demo scene.
pub fn load_scene(config: &Config) -> Result<Scene, SceneError> {
    match &config.simulation.scene_path {
        Some(path) => {
            let mut scene = empty_scene(config);
            SceneSerializer::load(&mut scene, path)?;
            Ok(scene)
        }
        None => Ok(build_demo_scene(config)),
    }
}
