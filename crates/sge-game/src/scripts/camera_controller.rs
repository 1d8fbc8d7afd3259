//! Fly camera: right mouse held enables mouse look and WASD/space/ctrl
//! movement.

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};
use sge_ecs::{CameraComponent, TimeStep, TransformComponent};
use sge_input::{KeyCode, MouseButton};
use sge_physics::RaycastHit;
use sge_render::Camera3D;
use sge_render::camera::PITCH_LIMIT;
use sge_scene::{ScriptContext, ScriptableEntity};

pub const DEFAULT_MOUSE_SENSITIVITY: f32 = 0.1;
pub const DEFAULT_MOVEMENT_SPEED: f32 = 50.0;

#[derive(Debug, Clone)]
pub struct CameraController {
    pub mouse_sensitivity: f32,
    pub constrain_pitch: bool,
    pub movement_speed: f32,
    first_move: bool,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            mouse_sensitivity: DEFAULT_MOUSE_SENSITIVITY,
            constrain_pitch: true,
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            first_move: true,
        }
    }
}

impl CameraController {
    /// Direction from the main camera through the cursor.
    pub fn mouse_to_world(ctx: &ScriptContext<'_>) -> Option<Vec3> {
        ctx.cursor_ray().map(|ray| ray.direction)
    }

    /// Raycast from the main camera through the cursor.
    pub fn pick(ctx: &ScriptContext<'_>, max_distance: f32) -> Option<(Entity, RaycastHit)> {
        let ray = ctx.cursor_ray()?;
        ctx.raycast_entity(&ray, max_distance)
    }

    fn look(&self, camera: &mut Camera3D, delta: Vec2) {
        camera.yaw += delta.x * self.mouse_sensitivity;
        camera.pitch -= delta.y * self.mouse_sensitivity;
        if self.constrain_pitch {
            camera.pitch = camera.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
        camera.recalculate();
    }
}

impl ScriptableEntity for CameraController {
    fn kind(&self) -> &'static str {
        "CameraController"
    }

    fn on_start(&mut self, ctx: &mut ScriptContext<'_>) {
        let Some(position) = ctx.component::<TransformComponent>().map(|t| t.position) else {
            return;
        };
        if let Some(mut component) = ctx.component_mut::<CameraComponent>() {
            component.camera.position = position;
            component.camera.recalculate();
        }
    }

    fn on_update(&mut self, ctx: &mut ScriptContext<'_>, ts: TimeStep) {
        let input = ctx.input();
        if !input.is_mouse_button_pressed(MouseButton::Right) {
            self.first_move = true;
            return;
        }

        // The first held frame only anchors the cursor.
        let delta = if self.first_move {
            Vec2::ZERO
        } else {
            input.mouse_delta()
        };
        self.first_move = false;

        let held = |key| input.is_key_pressed(key);
        let keys = [
            held(KeyCode::KeyW),
            held(KeyCode::KeyS),
            held(KeyCode::KeyD),
            held(KeyCode::KeyA),
            held(KeyCode::Space),
            held(KeyCode::ControlLeft),
        ];

        let Some(mut component) = ctx.component_mut::<CameraComponent>() else {
            return;
        };
        let camera = &mut component.camera;
        self.look(camera, delta);

        let axes = [
            camera.front,
            -camera.front,
            camera.right,
            -camera.right,
            camera.up,
            -camera.up,
        ];
        let offset: Vec3 = keys
            .iter()
            .zip(axes)
            .filter(|(pressed, _)| **pressed)
            .map(|(_, axis)| axis)
            .sum();
        if offset != Vec3::ZERO {
            camera.translate(offset * self.movement_speed * ts.seconds());
        }
        let position = camera.position;

        if let Some(mut transform) = ctx.component_mut::<TransformComponent>() {
            transform.position = position;
        }
    }
}
