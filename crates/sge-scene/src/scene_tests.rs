use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use sge_ecs::TimeStep;
use sge_physics::{BodyType, Collider, CollisionPoints, Ray, SphereColliderComponent};
use sge_render::{Camera3D, HeadlessBackend};

use super::*;
use crate::{ScriptContext, SceneSerializer};

const DT: TimeStep = TimeStep(1.0 / 60.0);

#[derive(Resource, Default)]
struct CallLog(Vec<String>);

impl CallLog {
    fn count(&self, entry: &str) -> usize {
        self.0.iter().filter(|e| *e == entry).count()
    }
}

fn log(ctx: &mut ScriptContext<'_>, name: &str, event: &str) {
    if let Some(mut log) = ctx.resource_mut::<CallLog>() {
        log.0.push(format!("{name}:{event}"));
    }
}

#[derive(Default)]
struct Recorder {
    name: &'static str,
    updates: u32,
    consume: bool,
    remove_self: bool,
    clone_once: bool,
}

impl Recorder {
    fn named(name: &'static str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }
}

impl ScriptableEntity for Recorder {
    fn kind(&self) -> &'static str {
        "Recorder"
    }

    fn on_create(&mut self, ctx: &mut ScriptContext<'_>) {
        log(ctx, self.name, "create");
    }

    fn on_start(&mut self, ctx: &mut ScriptContext<'_>) {
        log(ctx, self.name, "start");
    }

    fn on_update(&mut self, ctx: &mut ScriptContext<'_>, _ts: TimeStep) {
        self.updates += 1;
        log(ctx, self.name, "update");
        if self.remove_self {
            ctx.remove_entity(ctx.entity());
        }
        if self.clone_once {
            self.clone_once = false;
            ctx.duplicate_entity(ctx.entity(), |world, copy| {
                world.entity_mut(copy).insert(Tag::new("Clone"));
            });
        }
    }

    fn on_destroy(&mut self, ctx: &mut ScriptContext<'_>) {
        log(ctx, self.name, "destroy");
    }

    fn on_collision_enter(
        &mut self,
        ctx: &mut ScriptContext<'_>,
        _points: &CollisionPoints,
        _other: Entity,
    ) -> bool {
        log(ctx, self.name, "enter");
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y);
        if ctx.raycast(&ray, 100.0).is_none() {
            log(ctx, self.name, "busy");
        }
        self.consume
    }

    fn on_collision_exit(&mut self, ctx: &mut ScriptContext<'_>, _other: Entity) {
        log(ctx, self.name, "exit");
    }
}

/// Bumps the update counter of another entity's [`Recorder`].
struct Poker {
    target: Entity,
}

impl ScriptableEntity for Poker {
    fn on_update(&mut self, ctx: &mut ScriptContext<'_>, _ts: TimeStep) {
        if let Some(recorder) = ctx.script_mut::<Recorder>(self.target) {
            recorder.updates += 100;
        }
    }
}

fn scene_with_log() -> Scene {
    let mut scene = Scene::new("Test");
    scene.world_mut().insert_resource(CallLog::default());
    scene.register_script::<Recorder>();
    scene
}

fn calls(scene: &Scene) -> Vec<String> {
    scene.world().resource::<CallLog>().0.clone()
}

fn spawn_script(scene: &mut Scene, name: &'static str, script: Recorder) -> Entity {
    let e = scene.create_entity(name);
    scene.world_mut().entity_mut(e).insert(NativeScript::new(script));
    e
}

fn spawn_sphere(scene: &mut Scene, name: &'static str, position: Vec3, body_type: BodyType) -> Entity {
    let e = scene.create_entity(name);
    scene.world_mut().entity_mut(e).insert((
        TransformComponent::from_position(position),
        RigidBody::new(body_type),
        SphereColliderComponent::new(1.0),
    ));
    e
}

fn recorder(scene: &Scene, e: Entity) -> &Recorder {
    scene
        .world()
        .get::<NativeScript>(e)
        .and_then(|s| s.get::<Recorder>())
        .unwrap()
}

#[test]
fn test_play_creates_then_starts_each_script() {
    let mut scene = scene_with_log();
    spawn_script(&mut scene, "a", Recorder::named("a"));
    spawn_script(&mut scene, "b", Recorder::named("b"));

    scene.on_scene_play();
    assert!(scene.is_playing());
    assert_eq!(calls(&scene), ["a:create", "a:start", "b:create", "b:start"]);

    scene.on_scene_play();
    assert_eq!(calls(&scene).len(), 4);
}

#[test]
fn test_stop_when_paused_is_noop() {
    let mut scene = scene_with_log();
    spawn_sphere(&mut scene, "ball", Vec3::new(0.0, 10.0, 0.0), BodyType::Dynamic);
    scene.on_scene_stop();
    assert_eq!(scene.state(), SceneState::Pause);
    assert!(scene.physics().is_empty());
}

#[test]
fn test_replay_only_restarts_scripts() {
    let mut scene = scene_with_log();
    let ball = spawn_sphere(&mut scene, "ball", Vec3::new(0.0, 10.0, 0.0), BodyType::Dynamic);
    scene
        .world_mut()
        .entity_mut(ball)
        .insert(NativeScript::new(Recorder::named("a")));

    scene.on_scene_play();
    assert_eq!(scene.physics().len(), 1);
    scene.on_scene_stop();
    assert!(scene.physics().is_empty());
    assert!(!scene.world().get::<RigidBody>(ball).unwrap().registered);

    scene.on_scene_play();
    assert_eq!(calls(&scene), ["a:create", "a:start", "a:start"]);
    assert_eq!(scene.physics().len(), 1);
}

#[test]
fn test_paused_update_runs_no_scripts_or_physics() {
    let mut scene = scene_with_log();
    let a = spawn_script(&mut scene, "a", Recorder::named("a"));
    let ball = spawn_sphere(&mut scene, "ball", Vec3::new(0.0, 10.0, 0.0), BodyType::Dynamic);

    scene.update(DT);

    assert!(calls(&scene).is_empty());
    assert!(!scene.world().get::<NativeScript>(a).unwrap().is_created());
    let t = scene.world().get::<TransformComponent>(ball).unwrap();
    assert_eq!(t.position.y, 10.0);
    assert_eq!(scene.world().resource::<TimeRes>().elapsed, 0.0);
}

#[test]
fn test_playing_update_moves_bodies_and_syncs_transforms() {
    let mut scene = scene_with_log();
    let ball = spawn_sphere(&mut scene, "ball", Vec3::new(0.0, 10.0, 0.0), BodyType::Dynamic);
    let ground = spawn_sphere(&mut scene, "ground", Vec3::new(50.0, 10.0, 0.0), BodyType::Static);

    scene.on_scene_play();
    scene.update(DT);

    let rb = scene.world().get::<RigidBody>(ball).unwrap();
    let t = scene.world().get::<TransformComponent>(ball).unwrap();
    assert!(rb.position().y < 10.0);
    assert_eq!(t.position, rb.position());

    let t = scene.world().get::<TransformComponent>(ground).unwrap();
    assert_eq!(t.position, Vec3::new(50.0, 10.0, 0.0));
}

#[test]
fn test_entity_added_while_playing_is_created_started_and_updated() {
    let mut scene = scene_with_log();
    scene.on_scene_play();

    spawn_script(&mut scene, "late", Recorder::named("late"));
    spawn_sphere(&mut scene, "ball", Vec3::new(0.0, 10.0, 0.0), BodyType::Dynamic);
    scene.update(DT);

    assert_eq!(calls(&scene), ["late:create", "late:start", "late:update"]);
    assert_eq!(scene.physics().len(), 1);

    scene.update(DT);
    assert_eq!(calls(&scene).last().map(String::as_str), Some("late:update"));
    assert_eq!(CallLog(calls(&scene)).count("late:start"), 1);
}

#[test]
fn test_removal_is_deferred_to_end_of_frame() {
    let mut scene = scene_with_log();
    let doomed = spawn_sphere(&mut scene, "doomed", Vec3::new(0.0, 10.0, 0.0), BodyType::Dynamic);
    scene.world_mut().entity_mut(doomed).insert(NativeScript::new(Recorder {
        remove_self: true,
        ..Recorder::named("doomed")
    }));
    let witness = spawn_script(&mut scene, "witness", Recorder::named("witness"));

    scene.on_scene_play();
    scene.update(DT);

    let log = calls(&scene);
    let destroyed = log.iter().position(|e| e == "doomed:destroy").unwrap();
    let witnessed = log.iter().position(|e| e == "witness:update").unwrap();
    assert!(witnessed < destroyed);
    assert!(scene.world().get_entity(doomed).is_err());
    assert!(scene.world().get_entity(witness).is_ok());
    assert!(!scene.physics().contains(entity_handle(doomed)));
}

#[test]
fn test_scene_remove_entity_waits_for_update() {
    let mut scene = scene_with_log();
    let e = scene.create_entity("gone");
    scene.remove_entity(e);
    assert!(scene.world().get_entity(e).is_ok());
    scene.update(DT);
    assert!(scene.world().get_entity(e).is_err());
    assert!(scene.find_entity("gone").is_none());
}

#[test]
fn test_collision_enter_consumed_by_first_script() {
    let mut scene = scene_with_log();
    for (name, x) in [("a", 0.0), ("b", 1.0)] {
        let e = spawn_sphere(&mut scene, name, Vec3::new(x, 5.0, 0.0), BodyType::Static);
        scene.world_mut().entity_mut(e).insert(NativeScript::new(Recorder {
            consume: true,
            ..Recorder::named(name)
        }));
    }

    scene.on_scene_play();
    scene.update(DT);

    let log = CallLog(calls(&scene));
    assert_eq!(log.count("a:enter") + log.count("b:enter"), 1);
}

#[test]
fn test_collision_enter_reaches_both_and_exit_fires_once() {
    let mut scene = scene_with_log();
    let a = spawn_sphere(&mut scene, "a", Vec3::new(0.0, 5.0, 0.0), BodyType::Static);
    let b = spawn_sphere(&mut scene, "b", Vec3::new(1.0, 5.0, 0.0), BodyType::Static);
    for (e, name) in [(a, "a"), (b, "b")] {
        scene
            .world_mut()
            .entity_mut(e)
            .insert(NativeScript::new(Recorder::named(name)));
    }

    scene.on_scene_play();
    scene.update(DT);
    scene.update(DT);
    let log = CallLog(calls(&scene));
    assert_eq!(log.count("a:enter"), 2);
    assert_eq!(log.count("b:enter"), 2);
    assert_eq!(log.count("a:busy"), 2);

    scene
        .world_mut()
        .get_mut::<RigidBody>(b)
        .unwrap()
        .set_position(Vec3::new(10.0, 5.0, 0.0));
    scene.update(DT);
    scene.update(DT);

    let log = CallLog(calls(&scene));
    assert_eq!(log.count("a:exit"), 1);
    assert_eq!(log.count("b:exit"), 1);
    assert_eq!(log.count("a:enter"), 2);
}

#[test]
fn test_removed_partner_ends_contact_with_exit() {
    let mut scene = scene_with_log();
    let a = spawn_sphere(&mut scene, "a", Vec3::new(0.0, 5.0, 0.0), BodyType::Static);
    let b = spawn_sphere(&mut scene, "b", Vec3::new(1.0, 5.0, 0.0), BodyType::Static);
    scene
        .world_mut()
        .entity_mut(a)
        .insert(NativeScript::new(Recorder::named("a")));

    scene.on_scene_play();
    scene.update(DT);
    scene.remove_entity(b);
    scene.update(DT);
    scene.update(DT);

    let log = CallLog(calls(&scene));
    assert_eq!(log.count("a:enter"), 2);
    assert_eq!(log.count("a:exit"), 1);
    assert!(scene.world().get_entity(b).is_err());
}

#[test]
fn test_script_can_reach_another_script() {
    let mut scene = scene_with_log();
    let target = spawn_script(&mut scene, "target", Recorder::named("target"));
    let poker = scene.create_entity("poker");
    scene
        .world_mut()
        .entity_mut(poker)
        .insert(NativeScript::new(Poker { target }));

    scene.on_scene_play();
    scene.update(DT);

    assert_eq!(recorder(&scene, target).updates, 101);
}

#[test]
fn test_duplicate_entity_copies_components_with_fresh_script() {
    let mut scene = scene_with_log();
    let source = spawn_sphere(&mut scene, "unit", Vec3::new(3.0, 5.0, 0.0), BodyType::Dynamic);
    scene
        .world_mut()
        .entity_mut(source)
        .insert(NativeScript::new(Recorder::named("unit")));
    scene.on_scene_play();
    scene.update(DT);

    let copy = scene.duplicate_entity(source);
    let world = scene.world();
    assert_eq!(world.get::<Tag>(copy), world.get::<Tag>(source));
    assert_eq!(
        world.get::<TransformComponent>(copy),
        world.get::<TransformComponent>(source)
    );
    assert!(world.get::<SphereColliderComponent>(copy).is_some());
    assert!(!world.get::<RigidBody>(copy).unwrap().registered);

    let script = world.get::<NativeScript>(copy).unwrap();
    assert_eq!(script.kind(), "Recorder");
    assert!(!script.is_created());
    assert_eq!(script.get::<Recorder>().unwrap().updates, 0);

    scene.update(DT);
    assert!(scene.world().get::<RigidBody>(copy).unwrap().registered);
    assert_eq!(scene.physics().len(), 2);
}

#[test]
fn test_duplicate_with_unregistered_script_kind() {
    let mut scene = Scene::new("Test");
    let source = scene.create_entity("poker");
    let target = scene.create_entity("target");
    scene
        .world_mut()
        .entity_mut(source)
        .insert(NativeScript::new(Poker { target }));

    let copy = scene.duplicate_entity(source);
    assert!(scene.world().get::<NativeScript>(copy).is_none());
    assert_eq!(scene.world().get::<Tag>(copy).map(Tag::as_str), Some("poker"));
}

#[test]
fn test_script_duplicate_is_spawned_after_the_frame() {
    let mut scene = scene_with_log();
    spawn_script(&mut scene, "parent", Recorder {
        clone_once: true,
        ..Recorder::named("parent")
    });

    scene.on_scene_play();
    scene.update(DT);

    let clone = scene.find_entity("Clone").unwrap();
    assert!(!scene.world().get::<NativeScript>(clone).unwrap().is_created());

    scene.update(DT);
    assert!(scene.world().get::<NativeScript>(clone).unwrap().is_created());
}

#[test]
fn test_draws_are_submitted_and_flushed() {
    let mut scene = scene_with_log();
    let model = scene.models_mut().load("models/unit.glb");
    for x in [0.0, 2.0] {
        let e = scene.create_entity("unit");
        scene.world_mut().entity_mut(e).insert((
            TransformComponent::from_position(Vec3::new(x, 0.0, 0.0)),
            MeshRenderer { model },
        ));
    }

    scene.update(DT);
    assert_eq!(scene.renderers().meshes.instance_count(), 2);
    assert!(scene.renderers().skinned.is_empty());

    let mut backend = HeadlessBackend::default();
    scene.render(&mut backend);
    assert_eq!(backend.draw_calls, 1);
    assert_eq!(backend.instances, 2);
    assert!(scene.renderers().meshes.is_empty());
}

#[test]
fn test_plane_normal_follows_rotation() {
    let mut scene = scene_with_log();
    let board = scene.create_entity("board");
    scene.world_mut().entity_mut(board).insert((
        TransformComponent {
            rotation: Vec3::new(0.0, 0.0, FRAC_PI_2),
            ..TransformComponent::default()
        },
        RigidBody::new(BodyType::Static),
        PlaneColliderComponent::default(),
    ));

    scene.on_scene_play();

    let rb = scene.world().get::<RigidBody>(board).unwrap();
    let Some(Collider::Plane(plane)) = rb.body.collider else {
        panic!("expected a plane collider");
    };
    assert!(plane.normal.abs_diff_eq(Vec3::NEG_X, 1e-5));
    assert_eq!(rb.body.owner(), entity_handle(board));
}

#[test]
fn test_primary_camera_becomes_main_camera() {
    let mut scene = scene_with_log();
    scene.update(DT);
    assert_eq!(scene.scene_data().main_camera, None);

    let camera = scene.create_entity("camera");
    scene
        .world_mut()
        .entity_mut(camera)
        .insert(CameraComponent::primary(Camera3D::new(Vec3::new(0.0, 5.0, 10.0))));
    scene.set_viewport(800.0, 600.0);
    scene.update(DT);

    let data = scene.scene_data();
    assert_eq!(data.main_camera, Some(camera));
    assert_ne!(data.projection, Mat4::IDENTITY);
}

#[test]
fn test_camera_follows_its_entity_transform() {
    let mut scene = scene_with_log();
    let camera = scene.create_entity("camera");
    scene
        .world_mut()
        .entity_mut(camera)
        .insert(CameraComponent::primary(Camera3D::new(Vec3::new(0.0, 5.0, 10.0))));
    scene.update(DT);
    let before = scene.scene_data().view;
    let component = scene.world().get::<CameraComponent>(camera).unwrap();
    assert_eq!(component.camera.position, Vec3::ZERO);

    let moved = Vec3::new(0.0, 50.0, 100.0);
    scene
        .world_mut()
        .get_mut::<TransformComponent>(camera)
        .unwrap()
        .position = moved;
    scene.update(DT);

    assert_ne!(scene.scene_data().view, before);
    let component = scene.world().get::<CameraComponent>(camera).unwrap();
    assert_eq!(component.camera.position, moved);
}

#[test]
fn test_inactive_camera_is_left_alone() {
    let mut scene = scene_with_log();
    let spare = scene.create_entity("spare");
    let mut camera = Camera3D::new(Vec3::new(0.0, 5.0, 10.0));
    camera.yaw = 0.0;
    scene.world_mut().entity_mut(spare).insert(CameraComponent {
        camera,
        primary: false,
    });
    scene.update(DT);

    assert_eq!(scene.scene_data().main_camera, None);
    let component = scene.world().get::<CameraComponent>(spare).unwrap();
    assert_eq!(component.camera.position, Vec3::new(0.0, 5.0, 10.0));
    assert!(component.camera.front.abs_diff_eq(Vec3::NEG_Z, 1e-5));
}

#[test]
fn test_saved_scene_loads_into_fresh_scene() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenes").join("board.ron");

    let mut scene = scene_with_log();
    scene.set_name("Board");
    let model = scene.models_mut().load("models/unit.glb");
    let unit = spawn_sphere(&mut scene, "unit", Vec3::new(1.0, 2.0, 3.0), BodyType::Dynamic);
    scene.world_mut().entity_mut(unit).insert((
        MeshRenderer { model },
        NativeScript::new(Recorder::named("unit")),
    ));
    let camera = scene.create_entity("camera");
    scene
        .world_mut()
        .entity_mut(camera)
        .insert(CameraComponent::primary(Camera3D::new(Vec3::Y)));
    SceneSerializer::save(&scene, &path).unwrap();

    let mut loaded = scene_with_log();
    let count = SceneSerializer::load(&mut loaded, &path).unwrap();
    assert_eq!(count, 2);
    assert_eq!(loaded.name(), "Board");
    assert_eq!(SceneSerializer::capture(&loaded), SceneSerializer::capture(&scene));

    let unit = loaded.find_entity("unit").unwrap();
    let script = loaded.world().get::<NativeScript>(unit).unwrap();
    assert_eq!(script.kind(), "Recorder");
    assert_eq!(loaded.models().path(model), Some("models/unit.glb"));
}
